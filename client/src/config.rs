//! Client configuration loaded via OrthoConfig.
//!
//! Every field is optional so settings can come from any layer
//! (configuration file, `LMS_*` environment variables, arguments); the
//! accessors apply defaults and validate.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::context::DEFAULT_LOADING_GRACE;
use crate::outbound::graphql::DEFAULT_USER_AGENT;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/graphql";
/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_SESSION_DIR: &str = ".lms-session";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The endpoint could not be parsed as an absolute HTTP(S) URL.
    #[error("invalid GraphQL endpoint {value:?}: {reason}")]
    InvalidEndpoint { value: String, reason: String },
}

/// Configuration values for the GraphQL client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LMS")]
pub struct ClientSettings {
    /// GraphQL endpoint URL.
    pub endpoint: Option<String>,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
    /// Directory holding the persisted session.
    pub session_dir: Option<PathBuf>,
    /// Delay before the loading indicator clears, in milliseconds.
    pub loading_grace_ms: Option<u64>,
}

impl ClientSettings {
    /// Parsed endpoint, falling back to [`DEFAULT_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] when the value is not an
    /// absolute `http` or `https` URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT).trim();
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            value: raw.to_owned(),
            reason,
        };
        let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme {other}"))),
        }
    }

    /// Request timeout, falling back to [`DEFAULT_REQUEST_TIMEOUT_MS`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(
            self.request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
                .max(1),
        )
    }

    /// Configured user agent or `lms-client/<version>`.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Session directory, falling back to `.lms-session`.
    #[must_use]
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR))
    }

    /// Loading indicator grace delay.
    #[must_use]
    pub fn loading_grace(&self) -> Duration {
        self.loading_grace_ms
            .map_or(DEFAULT_LOADING_GRACE, Duration::from_millis)
    }
}
