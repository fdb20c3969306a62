//! Media library entries and file uploads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::MediaId;
use super::operations::impl_mutation_outcome;

/// Upload categories accepted by the `uploadFile` mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadKind {
    Resource,
    Video,
    Image,
    Thumbnail,
    Avatar,
    Document,
}

impl UploadKind {
    /// Schema enum name, e.g. `RESOURCE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resource => "RESOURCE",
            Self::Video => "VIDEO",
            Self::Image => "IMAGE",
            Self::Thumbnail => "THUMBNAIL",
            Self::Avatar => "AVATAR",
            Self::Document => "DOCUMENT",
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UploadKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "RESOURCE" => Ok(Self::Resource),
            "VIDEO" => Ok(Self::Video),
            "IMAGE" => Ok(Self::Image),
            "THUMBNAIL" => Ok(Self::Thumbnail),
            "AVATAR" => Ok(Self::Avatar),
            "DOCUMENT" => Ok(Self::Document),
            other => Err(format!("unknown upload kind: {other}")),
        }
    }
}

/// Item in the signed-in user's media library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: MediaId,
    pub url: String,
    pub file_name: String,
    #[serde(rename = "type")]
    pub kind: UploadKind,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// File contents handed to the upload transport.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Name reported to the server.
    pub file_name: String,
    /// MIME type of the part.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Build an upload, guessing the content type from the file extension.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Override the guessed content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the file has no contents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Response of `uploadFile`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub media_id: Option<MediaId>,
}

impl_mutation_outcome!(UploadResult);

/// Bytes handed to the HTTP stack so far for the active upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgressSnapshot {
    pub bytes_sent: u64,
    pub total_bytes: u64,
}

impl UploadProgressSnapshot {
    /// Whole-number percentage, `0` for an empty total.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total_bytes == 0 {
            return 0;
        }
        let sent = self.bytes_sent.min(self.total_bytes);
        u8::try_from(sent.saturating_mul(100) / self.total_bytes).unwrap_or(100)
    }
}
