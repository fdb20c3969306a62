//! Port for the single chokepoint through which every GraphQL operation is
//! sent.
//!
//! Adapters perform exactly one round-trip per call: no retries, batching
//! or caching. Outcomes are normalised into [`GraphqlTransportError`] so
//! services branch on a variant rather than on message text.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::TraceId;
use crate::domain::media::{FileUpload, UploadProgressSnapshot};
use crate::domain::operations::GraphqlRequest;

/// Failures reported by a transport adapter.
///
/// `Display` renders the human-readable message taken from the first
/// reported error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphqlTransportError {
    /// The request never completed or the server answered a non-success
    /// status.
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },
    /// The server answered with an `errors` list.
    #[error("{message}")]
    Protocol {
        message: String,
        /// `extensions.code` of the first error, when present.
        code: Option<String>,
    },
    /// Success status without a `data` payload.
    #[error("server returned no data for {operation}")]
    EmptyResponse { operation: String },
    /// The response body or payload did not match the expected shape.
    #[error("{message}")]
    Decode { message: String },
    /// The request was rejected before any I/O.
    #[error("{message}")]
    InvalidRequest { message: String },
}

impl GraphqlTransportError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            code,
        }
    }

    pub fn empty_response(operation: impl Into<String>) -> Self {
        Self::EmptyResponse {
            operation: operation.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// HTTP status attached to a transport failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Variant name, used as a stable log field.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Protocol { .. } => "protocol",
            Self::EmptyResponse { .. } => "empty_response",
            Self::Decode { .. } => "decode",
            Self::InvalidRequest { .. } => "invalid_request",
        }
    }
}

/// Per-call transport options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Attach the session credential when one is held.
    pub include_auth: bool,
    /// Correlation id forwarded as `X-Trace-Id`.
    pub trace_id: Option<TraceId>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            include_auth: true,
            trace_id: None,
        }
    }
}

impl ExecuteOptions {
    /// Never attach the credential, e.g. for login.
    #[must_use]
    pub const fn without_auth(mut self) -> Self {
        self.include_auth = false;
        self
    }

    #[must_use]
    pub const fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

/// Receives byte counts as an upload body is handed to the HTTP stack.
pub trait UploadProgress: Send + Sync {
    fn report(&self, snapshot: UploadProgressSnapshot);
}

/// Progress sink that drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreUploadProgress;

impl UploadProgress for IgnoreUploadProgress {
    fn report(&self, _snapshot: UploadProgressSnapshot) {}
}

/// Executes GraphQL requests against the remote server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Send `request` and return the response `data` object.
    async fn execute(
        &self,
        request: &GraphqlRequest,
        options: &ExecuteOptions,
    ) -> Result<Value, GraphqlTransportError>;

    /// Send `request` as a multipart upload carrying `file`.
    async fn upload(
        &self,
        request: &GraphqlRequest,
        file: FileUpload,
        progress: Arc<dyn UploadProgress>,
        options: &ExecuteOptions,
    ) -> Result<Value, GraphqlTransportError>;
}
