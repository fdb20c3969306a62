//! DTOs for decoding GraphQL response envelopes.
//!
//! The adapter decodes the body into these transport DTOs first, then maps
//! the envelope into either the `data` object or a port error in one pass.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(super) struct ResponseEnvelopeDto {
    #[serde(default)]
    pub(super) data: Option<Value>,
    #[serde(default)]
    pub(super) errors: Option<Vec<ResponseErrorDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponseErrorDto {
    #[serde(default)]
    pub(super) message: String,
    #[serde(default)]
    pub(super) extensions: Option<ErrorExtensionsDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorExtensionsDto {
    #[serde(default)]
    pub(super) code: Option<String>,
}

impl ResponseEnvelopeDto {
    /// First reported error, ignoring an empty `errors` list.
    pub(super) fn first_error(&self) -> Option<&ResponseErrorDto> {
        self.errors.as_deref().and_then(<[ResponseErrorDto]>::first)
    }

    /// `data`, treating an explicit `null` as absent.
    pub(super) fn into_data(self) -> Option<Value> {
        self.data.filter(|data| !data.is_null())
    }
}

impl ResponseErrorDto {
    pub(super) fn code(&self) -> Option<String> {
        self.extensions
            .as_ref()
            .and_then(|extensions| extensions.code.clone())
    }
}
