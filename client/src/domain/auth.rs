//! Login and registration inputs and the payload the server returns.
//!
//! Constructors validate raw strings before any request is built, so a
//! malformed email never reaches the wire.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use zeroize::Zeroizing;

use super::operations::impl_mutation_outcome;
use super::session::SessionUser;

/// Minimum accepted password length for new accounts and password changes.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Validation errors for login and registration inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email did not look like an address.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN_LENGTH`].
    PasswordTooShort { min: usize },
    /// A required name field was blank.
    EmptyName { field: &'static str },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::EmptyName { field } => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

fn normalise_email(email: &str) -> Result<String, CredentialValidationError> {
    let normalised = email.trim();
    if normalised.is_empty() {
        return Err(CredentialValidationError::EmptyEmail);
    }
    match normalised.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(normalised.to_owned())
        }
        _ => Err(CredentialValidationError::InvalidEmail),
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, non-empty and contains a local part and a domain.
/// - `password` is non-empty; caller whitespace is preserved.
///
/// # Examples
/// ```
/// use lms_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" a@b.com ", "x").unwrap();
/// assert_eq!(creds.email(), "a@b.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as entered.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[derive(Serialize)]
struct LoginWire<'a> {
    email: &'a str,
    password: &'a str,
}

impl Serialize for LoginCredentials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LoginWire {
            email: self.email(),
            password: self.password(),
        }
        .serialize(serializer)
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    first_name: String,
    last_name: String,
    email: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate registration inputs.
    pub fn try_new(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let first_name = first_name.trim();
        if first_name.is_empty() {
            return Err(CredentialValidationError::EmptyName {
                field: "first name",
            });
        }
        let last_name = last_name.trim();
        if last_name.is_empty() {
            return Err(CredentialValidationError::EmptyName { field: "last name" });
        }
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(CredentialValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationWire<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl Serialize for Registration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RegistrationWire {
            first_name: &self.first_name,
            last_name: &self.last_name,
            email: &self.email,
            password: self.password.as_str(),
        }
        .serialize(serializer)
    }
}

/// Response of `login` and `register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl_mutation_outcome!(AuthPayload);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", "pw", CredentialValidationError::EmptyEmail)]
    #[case("   ", "pw", CredentialValidationError::EmptyEmail)]
    #[case("not-an-email", "pw", CredentialValidationError::InvalidEmail)]
    #[case("@b.com", "pw", CredentialValidationError::InvalidEmail)]
    #[case("a@b.com", "", CredentialValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn credentials_serialise_as_login_variables() {
        let creds = LoginCredentials::try_from_parts("a@b.com", "x").expect("valid");
        let value = serde_json::to_value(&creds).expect("serialise");
        assert_eq!(value, json!({ "email": "a@b.com", "password": "x" }));
    }

    #[test]
    fn registration_requires_a_long_enough_password() {
        let err = Registration::try_new("Ada", "Lovelace", "ada@example.com", "short")
            .expect_err("short password");
        assert_eq!(
            err,
            CredentialValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH
            }
        );
    }

    #[test]
    fn registration_serialises_camel_case() {
        let registration =
            Registration::try_new(" Ada ", "Lovelace", "ada@example.com", "analytical")
                .expect("valid registration");
        let value = serde_json::to_value(&registration).expect("serialise");
        assert_eq!(
            value,
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "analytical",
            })
        );
    }
}
