//! Curriculum section editing.

use super::call_state::CallTracker;
use super::curriculum::{NewSection, Section, SectionPayload, SectionUpdate};
use super::error::{ClassifiedError, ServiceError};
use super::ids::{CourseId, SectionId};
use super::operations::Acknowledgement;
use super::operations::sections::{
    CourseRef, CreateSection, DeleteSection, GetCourseSections, ReorderSections,
    ReorderSectionsVariables, SectionRef, UpdateSection, UpdateSectionVariables,
};
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Reads and edits the sections of a course.
#[derive(Clone)]
pub struct SectionService {
    hook: ServiceHook,
}

impl SectionService {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            hook: ServiceHook::new(context),
        }
    }

    /// Loading and error state of the last call.
    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    /// Sections of `course_id` with their items, in order.
    pub async fn course_sections(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Section>, ClassifiedError> {
        self.hook
            .query::<GetCourseSections>(&CourseRef { course_id }, CallSpec::new("load sections"))
            .await
    }

    /// Append a section.
    pub async fn create_section(
        &self,
        section: NewSection,
    ) -> Result<SectionPayload, ClassifiedError> {
        let spec = CallSpec::new("create section")
            .requires_credential()
            .notify_success("Section created");
        if section.title.trim().is_empty() {
            return Err(self
                .hook
                .reject(ServiceError::validation("Section title is required"), &spec));
        }
        self.hook.mutate::<CreateSection>(&section, spec).await
    }

    /// Edit a section.
    pub async fn update_section(
        &self,
        section_id: SectionId,
        changes: SectionUpdate,
    ) -> Result<SectionPayload, ClassifiedError> {
        let variables = UpdateSectionVariables {
            section_id,
            changes,
        };
        self.hook
            .mutate::<UpdateSection>(
                &variables,
                CallSpec::new("update section")
                    .requires_credential()
                    .notify_success("Section updated"),
            )
            .await
    }

    /// Remove a section.
    pub async fn delete_section(
        &self,
        section_id: SectionId,
    ) -> Result<Acknowledgement, ClassifiedError> {
        self.hook
            .mutate::<DeleteSection>(
                &SectionRef { section_id },
                CallSpec::new("delete section")
                    .requires_credential()
                    .notify_success("Section deleted"),
            )
            .await
    }

    /// Persist the order of `section_ids` within `course_id`.
    pub async fn reorder_sections(
        &self,
        course_id: CourseId,
        section_ids: Vec<SectionId>,
    ) -> Result<Acknowledgement, ClassifiedError> {
        let variables = ReorderSectionsVariables {
            course_id,
            section_ids,
        };
        self.hook
            .mutate::<ReorderSections>(
                &variables,
                CallSpec::new("reorder sections").requires_credential(),
            )
            .await
    }
}
