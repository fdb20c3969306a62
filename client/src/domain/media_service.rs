//! Media library browsing.

use super::call_state::CallTracker;
use super::error::ClassifiedError;
use super::ids::MediaId;
use super::media::{MediaItem, UploadKind};
use super::operations::Acknowledgement;
use super::operations::media::{DeleteMedia, GetMediaLibrary, MediaFilter, MediaRef};
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Lists and removes media owned by the signed-in user.
#[derive(Clone)]
pub struct MediaService {
    hook: ServiceHook,
}

impl MediaService {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            hook: ServiceHook::new(context),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    /// Media items, optionally restricted to one kind.
    pub async fn media_library(
        &self,
        kind: Option<UploadKind>,
    ) -> Result<Vec<MediaItem>, ClassifiedError> {
        self.hook
            .query::<GetMediaLibrary>(
                &MediaFilter { kind },
                CallSpec::new("load media library").requires_credential(),
            )
            .await
    }

    pub async fn delete_media(
        &self,
        media_id: MediaId,
    ) -> Result<Acknowledgement, ClassifiedError> {
        self.hook
            .mutate::<DeleteMedia>(
                &MediaRef { media_id },
                CallSpec::new("delete media")
                    .requires_credential()
                    .notify_success("File deleted"),
            )
            .await
    }
}
