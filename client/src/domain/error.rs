//! Service-level error taxonomy and the classification applied before a
//! failure reaches the user.
//!
//! Transport adapters raise a closed set of [`GraphqlTransportError`]
//! variants. Services wrap those, together with locally detected failures,
//! in [`ServiceError`]. [`classify`] then tags every failure as network,
//! authentication or operation so callers can pick a recovery path without
//! re-parsing prose.

use std::fmt;

use super::auth::CredentialValidationError;
use super::ports::{CredentialStoreError, GraphqlTransportError};

/// User-facing message for network failures.
pub const NETWORK_MESSAGE: &str = "Network error: please check your connection and try again.";

/// User-facing message for authentication failures.
pub const AUTHENTICATION_MESSAGE: &str = "Authentication failed: please log in again.";

/// Lower-case fragments marking a message as a connectivity problem.
const NETWORK_MARKERS: &[&str] = &[
    "network",
    "failed to fetch",
    "connection refused",
    "connection reset",
    "timed out",
    "dns",
];

/// Lower-case fragments marking a message as an authentication problem.
const AUTHENTICATION_MARKERS: &[&str] = &[
    "authentication",
    "unauthorized",
    "unauthenticated",
    "not authorized",
    "permission",
    "forbidden",
    "token",
    "credential",
    "jwt",
];

/// GraphQL `extensions.code` values reporting an authentication failure.
const AUTHENTICATION_CODES: &[&str] = &["UNAUTHENTICATED", "FORBIDDEN"];

/// Failure raised by a service call before classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Raised by the transport adapter.
    #[error(transparent)]
    Transport(#[from] GraphqlTransportError),
    /// The server answered `success: false`.
    #[error("{message}")]
    DomainFailure { message: String },
    /// A credential was required but none is held.
    #[error("{message}")]
    AuthenticationRequired { message: String },
    /// Input rejected before any request was sent.
    #[error("{message}")]
    Validation { message: String },
    /// Session persistence failed.
    #[error("{message}")]
    Storage { message: String },
}

impl ServiceError {
    pub fn domain_failure(message: impl Into<String>) -> Self {
        Self::DomainFailure {
            message: message.into(),
        }
    }

    pub fn authentication_required(message: impl Into<String>) -> Self {
        Self::AuthenticationRequired {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Transport error wrapped by this failure, if any.
    #[must_use]
    pub fn transport(&self) -> Option<&GraphqlTransportError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CredentialValidationError> for ServiceError {
    fn from(value: CredentialValidationError) -> Self {
        Self::validation(value.to_string())
    }
}

impl From<CredentialStoreError> for ServiceError {
    fn from(value: CredentialStoreError) -> Self {
        Self::storage(value.to_string())
    }
}

/// Recovery category attached to every failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Connectivity problem; retrying later may help.
    Network,
    /// The session is missing or rejected; the user must log in again.
    Authentication,
    /// Business or validation failure reported with its own message.
    Operation,
}

impl ErrorClass {
    /// Short lower-case label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Authentication => "authentication",
            Self::Operation => "operation",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure tagged with its [`ErrorClass`] and the message shown to the
/// user. The original [`ServiceError`] stays reachable through
/// [`std::error::Error::source`].
///
/// # Examples
/// ```
/// use lms_client::domain::{ErrorClass, ServiceError, classify};
///
/// let err = classify(ServiceError::domain_failure("Course not found"), "create section");
/// assert_eq!(err.class(), ErrorClass::Operation);
/// assert_eq!(err.to_string(), "Course not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClassifiedError {
    class: ErrorClass,
    message: String,
    #[source]
    cause: ServiceError,
}

impl ClassifiedError {
    /// Recovery category.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        self.class
    }

    /// Message intended for the user.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Unclassified failure.
    #[must_use]
    pub const fn cause(&self) -> &ServiceError {
        &self.cause
    }

    /// Consume the wrapper, keeping the unclassified failure.
    #[must_use]
    pub fn into_cause(self) -> ServiceError {
        self.cause
    }

    /// Whether the user must log in again.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        self.class == ErrorClass::Authentication
    }
}

/// Tag `cause` with its class and pick the user-facing message.
///
/// `action` completes the generic fallback `Failed to <action>` used when a
/// failure carries no message worth showing.
#[must_use]
pub fn classify(cause: ServiceError, action: &str) -> ClassifiedError {
    let class = class_of(&cause);
    let message = match class {
        ErrorClass::Network => NETWORK_MESSAGE.to_owned(),
        ErrorClass::Authentication => AUTHENTICATION_MESSAGE.to_owned(),
        ErrorClass::Operation => operation_message(&cause, action),
    };
    ClassifiedError {
        class,
        message,
        cause,
    }
}

fn class_of(cause: &ServiceError) -> ErrorClass {
    // Local failures carry their own kind; their text may mention paths or
    // session keys that look like upstream wording.
    if matches!(
        cause,
        ServiceError::Storage { .. } | ServiceError::Validation { .. }
    ) {
        return ErrorClass::Operation;
    }
    let text = cause.to_string().to_lowercase();
    if contains_any(&text, NETWORK_MARKERS) {
        return ErrorClass::Network;
    }
    match cause {
        ServiceError::Transport(GraphqlTransportError::Transport {
            status: Some(401 | 403),
            ..
        })
        | ServiceError::AuthenticationRequired { .. } => ErrorClass::Authentication,
        ServiceError::Transport(GraphqlTransportError::Transport { .. }) => ErrorClass::Network,
        ServiceError::Transport(GraphqlTransportError::Protocol {
            code: Some(code), ..
        }) if AUTHENTICATION_CODES
            .iter()
            .any(|known| code.eq_ignore_ascii_case(known)) =>
        {
            ErrorClass::Authentication
        }
        _ if contains_any(&text, AUTHENTICATION_MARKERS) => ErrorClass::Authentication,
        _ => ErrorClass::Operation,
    }
}

fn operation_message(cause: &ServiceError, action: &str) -> String {
    let fallback = || format!("Failed to {action}");
    match cause {
        ServiceError::Transport(
            GraphqlTransportError::EmptyResponse { .. }
            | GraphqlTransportError::Decode { .. }
            | GraphqlTransportError::InvalidRequest { .. },
        ) => fallback(),
        other => {
            let message = other.to_string();
            if message.trim().is_empty() {
                fallback()
            } else {
                message
            }
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests;
