//! Session credential primitives.
//!
//! The bearer token is the only secret this crate handles. It lives in
//! zeroizing memory, never appears in `Debug` output, and is identified in
//! logs by a truncated SHA-256 fingerprint.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of the token fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Validation errors raised when constructing a [`BearerToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    /// Token was blank once trimmed.
    Empty,
    /// Token contained whitespace, which cannot be sent in a header.
    ContainsWhitespace,
}

impl fmt::Display for TokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "token must not be empty"),
            Self::ContainsWhitespace => write!(f, "token must not contain whitespace"),
        }
    }
}

impl std::error::Error for TokenValidationError {}

/// Opaque bearer token issued by the authentication provider.
///
/// ## Invariants
/// - Non-empty and free of whitespace, so it can be placed verbatim in an
///   `Authorization` header.
///
/// # Examples
/// ```
/// use lms_client::domain::BearerToken;
///
/// let token = BearerToken::new("abc.def.ghi").unwrap();
/// assert_eq!(token.expose(), "abc.def.ghi");
/// assert_eq!(token.fingerprint().len(), 16);
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Validate and wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Result<Self, TokenValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(TokenValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(TokenValidationError::ContainsWhitespace);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw token text, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// `Bearer <token>` header value.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.expose())
    }

    /// Truncated SHA-256 fingerprint, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.expose().as_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }

    /// Expiry time when the token is a JWT carrying a numeric `exp` claim.
    ///
    /// Opaque tokens, malformed JWTs and JWTs without `exp` yield `None`.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut segments = self.expose().split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };
        let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
        let exp = claims.get("exp")?.as_i64()?;
        DateTime::from_timestamp(exp, 0)
    }

    /// Whether the token is known to have expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry <= now)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken")
            .field(&self.fingerprint())
            .finish()
    }
}

impl TryFrom<String> for BearerToken {
    type Error = TokenValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BearerToken> for String {
    fn from(value: BearerToken) -> Self {
        value.expose().to_owned()
    }
}

/// Bearer token plus the optional refresh token issued alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    /// Token attached to authenticated calls.
    pub token: BearerToken,
    /// Refresh grant consumed by the external identity provider.
    pub refresh_token: Option<BearerToken>,
}

impl SessionCredential {
    /// Credential without a refresh token.
    #[must_use]
    pub const fn new(token: BearerToken) -> Self {
        Self {
            token,
            refresh_token: None,
        }
    }
}

/// Identity summary returned by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Server-side user identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Role name such as `STUDENT` or `INSTRUCTOR`.
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionUser {
    /// Name suitable for greetings, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_owned(),
            _ => self.email.clone(),
        }
    }
}

/// Everything persisted between runs for a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    /// Tokens attached to outgoing calls.
    pub credential: SessionCredential,
    /// Cached identity, if the server returned one.
    pub user: Option<SessionUser>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn jwt_with_payload(payload: &str) -> BearerToken {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        BearerToken::new(format!("{header}.{body}.signature")).expect("valid token")
    }

    #[rstest]
    #[case("", TokenValidationError::Empty)]
    #[case("   ", TokenValidationError::Empty)]
    #[case("abc def", TokenValidationError::ContainsWhitespace)]
    fn rejects_unusable_tokens(#[case] raw: &str, #[case] expected: TokenValidationError) {
        let error = BearerToken::new(raw).expect_err("token must be rejected");
        assert_eq!(error, expected);
    }

    #[test]
    fn debug_output_hides_token_material() {
        let token = BearerToken::new("super-secret").expect("valid token");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains(&token.fingerprint()));
    }

    #[test]
    fn reads_expiry_from_jwt_claims() {
        let token = jwt_with_payload(r#"{"sub":"1","exp":1700000000}"#);
        let expiry = token.expires_at().expect("expiry present");
        assert_eq!(expiry.timestamp(), 1_700_000_000);

        let before = DateTime::from_timestamp(1_699_999_999, 0).expect("timestamp");
        let after = DateTime::from_timestamp(1_700_000_001, 0).expect("timestamp");
        assert!(!token.is_expired_at(before));
        assert!(token.is_expired_at(after));
    }

    #[rstest]
    #[case("opaque-session-token")]
    #[case("a.b")]
    #[case("a.%%%.c")]
    fn opaque_or_malformed_tokens_never_expire(#[case] raw: &str) {
        let token = BearerToken::new(raw).expect("valid token");
        assert!(token.expires_at().is_none());
        assert!(!token.is_expired_at(Utc::now()));
    }

    #[test]
    fn jwt_without_exp_claim_never_expires() {
        let token = jwt_with_payload(r#"{"sub":"1"}"#);
        assert!(token.expires_at().is_none());
    }

    #[rstest]
    #[case(Some("Ada"), Some("Lovelace"), "Ada Lovelace")]
    #[case(Some("Ada"), None, "Ada")]
    #[case(None, None, "ada@example.com")]
    fn display_name_falls_back_to_email(
        #[case] first: Option<&str>,
        #[case] last: Option<&str>,
        #[case] expected: &str,
    ) {
        let user = SessionUser {
            id: "1".to_owned(),
            email: "ada@example.com".to_owned(),
            first_name: first.map(str::to_owned),
            last_name: last.map(str::to_owned),
            role: None,
        };
        assert_eq!(user.display_name(), expected);
    }
}
