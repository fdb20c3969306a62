//! Lecture editing.

use super::call_state::CallTracker;
use super::curriculum::{Lecture, LecturePayload, LectureUpdate, NewLecture};
use super::error::{ClassifiedError, ServiceError};
use super::ids::{LectureId, SectionId};
use super::operations::Acknowledgement;
use super::operations::lectures::{
    CreateLecture, DeleteLecture, GetSectionLectures, LectureRef, UpdateLecture,
    UpdateLectureVariables,
};
use super::operations::sections::SectionRef;
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Reads and edits lectures.
#[derive(Clone)]
pub struct LectureService {
    hook: ServiceHook,
}

impl LectureService {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            hook: ServiceHook::new(context),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    pub async fn section_lectures(
        &self,
        section_id: SectionId,
    ) -> Result<Vec<Lecture>, ClassifiedError> {
        self.hook
            .query::<GetSectionLectures>(&SectionRef { section_id }, CallSpec::new("load lectures"))
            .await
    }

    pub async fn create_lecture(
        &self,
        lecture: NewLecture,
    ) -> Result<LecturePayload, ClassifiedError> {
        let spec = CallSpec::new("create lecture")
            .requires_credential()
            .notify_success("Lecture created");
        if lecture.title.trim().is_empty() {
            return Err(self
                .hook
                .reject(ServiceError::validation("Lecture title is required"), &spec));
        }
        if lecture.duration.is_some_and(|seconds| seconds < 0) {
            return Err(self
                .hook
                .reject(ServiceError::validation("Lecture duration cannot be negative"), &spec));
        }
        self.hook.mutate::<CreateLecture>(&lecture, spec).await
    }

    pub async fn update_lecture(
        &self,
        lecture_id: LectureId,
        changes: LectureUpdate,
    ) -> Result<LecturePayload, ClassifiedError> {
        self.hook
            .mutate::<UpdateLecture>(
                &UpdateLectureVariables {
                    lecture_id,
                    changes,
                },
                CallSpec::new("update lecture")
                    .requires_credential()
                    .notify_success("Lecture updated"),
            )
            .await
    }

    pub async fn delete_lecture(
        &self,
        lecture_id: LectureId,
    ) -> Result<Acknowledgement, ClassifiedError> {
        self.hook
            .mutate::<DeleteLecture>(
                &LectureRef { lecture_id },
                CallSpec::new("delete lecture")
                    .requires_credential()
                    .notify_success("Lecture deleted"),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::test_support::{RecordingNotifier, ScriptedTransport, signed_in_cell};

    fn service(transport: &Arc<ScriptedTransport>) -> LectureService {
        LectureService::new(ServiceContext::new(
            transport.clone(),
            Arc::new(signed_in_cell("T")),
            Arc::new(RecordingNotifier::default()),
        ))
    }

    #[tokio::test]
    async fn partial_updates_only_send_changed_fields() {
        let transport = Arc::new(ScriptedTransport::new().respond(json!({
            "updateLecture": { "success": true, "lecture": { "id": 5, "title": "New", "order": 2 } }
        })));
        let changes = LectureUpdate {
            title: Some("New".to_owned()),
            is_preview: Some(true),
            ..LectureUpdate::default()
        };

        let payload = service(&transport)
            .update_lecture(LectureId::new(5), changes)
            .await
            .expect("updated");

        assert_eq!(payload.lecture.map(|l| l.title), Some("New".to_owned()));
        assert_eq!(
            transport.requests()[0].request.variables,
            json!({ "lectureId": 5, "title": "New", "isPreview": true })
        );
    }

    #[tokio::test]
    async fn negative_durations_are_rejected_locally() {
        let transport = Arc::new(ScriptedTransport::new());
        let lecture = NewLecture {
            section_id: SectionId::new(2),
            title: "Welcome".to_owned(),
            description: None,
            order: 1,
            video_url: None,
            duration: Some(-1),
            is_preview: false,
            content: None,
        };

        let err = service(&transport)
            .create_lecture(lecture)
            .await
            .expect_err("negative duration");
        assert_eq!(err.message(), "Lecture duration cannot be negative");
        assert!(transport.requests().is_empty());
    }
}
