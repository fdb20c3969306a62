//! Media library and upload operations.

use serde::Serialize;

use super::{Acknowledgement, define_operation};
use crate::domain::ids::MediaId;
use crate::domain::media::{MediaItem, UploadKind, UploadResult};

/// Variables for `myMedia`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MediaFilter {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<UploadKind>,
}

/// Variables naming one media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub media_id: MediaId,
}

/// Variables for `uploadFile`.
///
/// `file` is always `null` in the JSON; the multipart request maps the file
/// part onto `variables.file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadFileVariables {
    pub file: (),
    #[serde(rename = "type")]
    pub kind: UploadKind,
}

impl UploadFileVariables {
    /// Variables for uploading a file of `kind`.
    #[must_use]
    pub const fn new(kind: UploadKind) -> Self {
        Self { file: (), kind }
    }
}

/// Variable path the multipart map points the file part at.
pub const UPLOAD_FILE_VARIABLE_PATH: &str = "variables.file";

define_operation! {
    /// Media items owned by the signed-in user, optionally filtered by kind.
    query GetMediaLibrary {
        variables: MediaFilter,
        output: Vec<MediaItem>,
        root: "myMedia",
        declare: ["type": "UploadType"],
        selection: "(type: $type) { id url fileName type size createdAt }",
    }
}

define_operation! {
    /// Remove a media item.
    mutation DeleteMedia {
        variables: MediaRef,
        output: Acknowledgement,
        root: "deleteMedia",
        declare: ["mediaId": "Int!"],
        selection: "(mediaId: $mediaId) { success message }",
    }
}

define_operation! {
    /// Upload a file; sent as a GraphQL multipart request.
    mutation UploadFile {
        variables: UploadFileVariables,
        output: UploadResult,
        root: "uploadFile",
        declare: ["file": "Upload!", "type": "UploadType!"],
        selection: "(file: $file, type: $type) { success message url fileName size mediaId }",
    }
}
