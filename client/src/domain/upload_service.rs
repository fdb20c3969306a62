//! File uploads with observable transfer progress.

use std::sync::Arc;

use tokio::sync::watch;

use super::call_state::CallTracker;
use super::error::{ClassifiedError, ServiceError};
use super::media::{FileUpload, UploadKind, UploadProgressSnapshot, UploadResult};
use super::operations::media::{UploadFile, UploadFileVariables};
use super::ports::UploadProgress;
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

struct WatchProgress(Arc<watch::Sender<UploadProgressSnapshot>>);

impl UploadProgress for WatchProgress {
    fn report(&self, snapshot: UploadProgressSnapshot) {
        self.0.send_replace(snapshot);
    }
}

/// Uploads files through the multipart transport.
///
/// Progress reflects bytes actually handed to the HTTP stack.
#[derive(Clone)]
pub struct UploadService {
    hook: ServiceHook,
    progress: Arc<watch::Sender<UploadProgressSnapshot>>,
}

impl UploadService {
    pub fn new(context: ServiceContext) -> Self {
        let (progress, _) = watch::channel(UploadProgressSnapshot::default());
        Self {
            hook: ServiceHook::new(context),
            progress: Arc::new(progress),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    /// Whether an upload is in flight.
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.hook.tracker().is_loading()
    }

    /// Progress of the current or most recent upload.
    #[must_use]
    pub fn progress(&self) -> UploadProgressSnapshot {
        *self.progress.borrow()
    }

    #[must_use]
    pub fn subscribe_progress(&self) -> watch::Receiver<UploadProgressSnapshot> {
        self.progress.subscribe()
    }

    /// Upload `file` into the media library as `kind`.
    pub async fn upload_file(
        &self,
        file: FileUpload,
        kind: UploadKind,
    ) -> Result<UploadResult, ClassifiedError> {
        let spec = CallSpec::new("upload file")
            .requires_credential()
            .notify_success(format!("{} uploaded", file.file_name));
        if file.file_name.trim().is_empty() {
            return Err(self
                .hook
                .reject(ServiceError::validation("File name is required"), &spec));
        }
        if file.is_empty() {
            return Err(self
                .hook
                .reject(ServiceError::validation("File is empty"), &spec));
        }

        self.progress.send_replace(UploadProgressSnapshot {
            bytes_sent: 0,
            total_bytes: file.len(),
        });
        let reporter: Arc<dyn UploadProgress> = Arc::new(WatchProgress(Arc::clone(&self.progress)));
        self.hook
            .upload::<UploadFile>(&UploadFileVariables::new(kind), file, reporter, spec)
            .await
    }
}
