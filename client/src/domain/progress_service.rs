//! Student course progress, mirrored into the progress context.

use std::sync::Arc;

use super::call_state::CallTracker;
use super::error::ClassifiedError;
use super::ids::{CourseId, LectureId};
use super::operations::lectures::LectureRef;
use super::operations::progress::{GetCourseProgress, MarkLectureComplete};
use super::operations::sections::CourseRef;
use super::progress::{CourseProgress, ProgressPayload};
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};
use crate::context::ProgressContext;

/// Reads and records course progress.
#[derive(Clone)]
pub struct ProgressService {
    hook: ServiceHook,
    progress: Arc<ProgressContext>,
}

impl ProgressService {
    pub fn new(context: ServiceContext, progress: Arc<ProgressContext>) -> Self {
        Self {
            hook: ServiceHook::new(context),
            progress,
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    /// Progress for `course_id`; `None` when the user is not enrolled.
    pub async fn course_progress(
        &self,
        course_id: CourseId,
    ) -> Result<Option<CourseProgress>, ClassifiedError> {
        let progress = self
            .hook
            .query::<GetCourseProgress>(
                &CourseRef { course_id },
                CallSpec::new("load progress").requires_credential(),
            )
            .await?;
        if let Some(progress) = &progress {
            self.progress.record(progress.clone());
        }
        Ok(progress)
    }

    pub async fn mark_lecture_complete(
        &self,
        lecture_id: LectureId,
    ) -> Result<ProgressPayload, ClassifiedError> {
        let payload = self
            .hook
            .mutate::<MarkLectureComplete>(
                &LectureRef { lecture_id },
                CallSpec::new("mark lecture complete").requires_credential(),
            )
            .await?;
        if let Some(progress) = &payload.progress {
            self.progress.record(progress.clone());
        }
        Ok(payload)
    }
}
