//! Course metadata for the course builder.

use super::call_state::CallTracker;
use super::course::{Course, CourseMetadataUpdate, CoursePayload, NewCourse};
use super::error::{ClassifiedError, ServiceError};
use super::ids::CourseId;
use super::operations::NoVariables;
use super::operations::courses::{
    CreateCourse, GetCourse, GetInstructorCourses, PublishCourse, UpdateCourseMetadata,
    UpdateCourseVariables,
};
use super::operations::sections::CourseRef;
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Reads and edits course metadata.
#[derive(Clone)]
pub struct CourseService {
    hook: ServiceHook,
}

impl CourseService {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            hook: ServiceHook::new(context),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    /// Course metadata, `None` for unknown ids.
    pub async fn course(&self, course_id: CourseId) -> Result<Option<Course>, ClassifiedError> {
        self.hook
            .query::<GetCourse>(&CourseRef { course_id }, CallSpec::new("load course"))
            .await
    }

    /// Courses owned by the signed-in instructor.
    pub async fn instructor_courses(&self) -> Result<Vec<Course>, ClassifiedError> {
        self.hook
            .query::<GetInstructorCourses>(
                &NoVariables {},
                CallSpec::new("load your courses").requires_credential(),
            )
            .await
    }

    pub async fn create_course(&self, course: NewCourse) -> Result<CoursePayload, ClassifiedError> {
        let spec = CallSpec::new("create course")
            .requires_credential()
            .notify_success("Course created");
        if course.title.trim().is_empty() {
            return Err(self
                .hook
                .reject(ServiceError::validation("Course title is required"), &spec));
        }
        if course.price.is_some_and(|price| price < 0.0 || !price.is_finite()) {
            return Err(self
                .hook
                .reject(ServiceError::validation("Price must be zero or more"), &spec));
        }
        self.hook.mutate::<CreateCourse>(&course, spec).await
    }

    pub async fn update_course_metadata(
        &self,
        course_id: CourseId,
        changes: CourseMetadataUpdate,
    ) -> Result<CoursePayload, ClassifiedError> {
        let spec = CallSpec::new("update course")
            .requires_credential()
            .notify_success("Course details saved");
        if changes.is_empty() {
            return Err(self
                .hook
                .reject(ServiceError::validation("Nothing to update"), &spec));
        }
        self.hook
            .mutate::<UpdateCourseMetadata>(&UpdateCourseVariables { course_id, changes }, spec)
            .await
    }

    pub async fn publish_course(
        &self,
        course_id: CourseId,
    ) -> Result<CoursePayload, ClassifiedError> {
        self.hook
            .mutate::<PublishCourse>(
                &CourseRef { course_id },
                CallSpec::new("publish course")
                    .requires_credential()
                    .notify_success("Course submitted for publication"),
            )
            .await
    }
}
