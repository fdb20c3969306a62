//! Assignment authoring.

use super::call_state::CallTracker;
use super::curriculum::{AssignmentPayload, AssignmentUpdate, NewAssignment};
use super::error::{ClassifiedError, ServiceError};
use super::ids::AssignmentId;
use super::operations::Acknowledgement;
use super::operations::assignments::{
    AssignmentRef, CreateAssignment, DeleteAssignment, UpdateAssignment, UpdateAssignmentVariables,
};
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Creates, edits and removes assignments.
#[derive(Clone)]
pub struct AssignmentService {
    hook: ServiceHook,
}

impl AssignmentService {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            hook: ServiceHook::new(context),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    pub async fn create_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<AssignmentPayload, ClassifiedError> {
        let spec = CallSpec::new("create assignment")
            .requires_credential()
            .notify_success("Assignment created");
        if assignment.title.trim().is_empty() {
            return Err(self
                .hook
                .reject(ServiceError::validation("Assignment title is required"), &spec));
        }
        if assignment.max_score.is_some_and(|score| score <= 0) {
            return Err(self
                .hook
                .reject(ServiceError::validation("Maximum score must be positive"), &spec));
        }
        self.hook.mutate::<CreateAssignment>(&assignment, spec).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: AssignmentId,
        changes: AssignmentUpdate,
    ) -> Result<AssignmentPayload, ClassifiedError> {
        self.hook
            .mutate::<UpdateAssignment>(
                &UpdateAssignmentVariables {
                    assignment_id,
                    changes,
                },
                CallSpec::new("update assignment")
                    .requires_credential()
                    .notify_success("Assignment updated"),
            )
            .await
    }

    pub async fn delete_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Acknowledgement, ClassifiedError> {
        self.hook
            .mutate::<DeleteAssignment>(
                &AssignmentRef { assignment_id },
                CallSpec::new("delete assignment")
                    .requires_credential()
                    .notify_success("Assignment deleted"),
            )
            .await
    }
}
