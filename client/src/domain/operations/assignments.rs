//! Assignment operations.

use serde::Serialize;

use super::{Acknowledgement, define_operation};
use crate::domain::curriculum::{AssignmentPayload, AssignmentUpdate, NewAssignment};
use crate::domain::ids::AssignmentId;

/// Variables naming one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRef {
    pub assignment_id: AssignmentId,
}

/// Variables for `updateAssignment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentVariables {
    pub assignment_id: AssignmentId,
    #[serde(flatten)]
    pub changes: AssignmentUpdate,
}

define_operation! {
    /// Add an assignment to a section.
    mutation CreateAssignment {
        variables: NewAssignment,
        output: AssignmentPayload,
        root: "createAssignment",
        declare: [
            "sectionId": "Int!",
            "title": "String!",
            "description": "String",
            "order": "Int!",
            "dueDate": "String",
            "maxScore": "Int" = "100",
            "instructions": "String",
        ],
        selection: "(sectionId: $sectionId, title: $title, description: $description, order: $order, dueDate: $dueDate, maxScore: $maxScore, instructions: $instructions) { success message assignment { id sectionId title description order dueDate maxScore instructions } }",
    }
}

define_operation! {
    /// Edit an assignment.
    mutation UpdateAssignment {
        variables: UpdateAssignmentVariables,
        output: AssignmentPayload,
        root: "updateAssignment",
        declare: [
            "assignmentId": "Int!",
            "title": "String",
            "description": "String",
            "order": "Int",
            "dueDate": "String",
            "maxScore": "Int",
            "instructions": "String",
        ],
        selection: "(assignmentId: $assignmentId, title: $title, description: $description, order: $order, dueDate: $dueDate, maxScore: $maxScore, instructions: $instructions) { success message assignment { id sectionId title description order dueDate maxScore instructions } }",
    }
}

define_operation! {
    /// Remove an assignment.
    mutation DeleteAssignment {
        variables: AssignmentRef,
        output: Acknowledgement,
        root: "deleteAssignment",
        declare: ["assignmentId": "Int!"],
        selection: "(assignmentId: $assignmentId) { success message }",
    }
}
