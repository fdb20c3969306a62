//! Section operations.

use serde::Serialize;

use super::{Acknowledgement, define_operation};
use crate::domain::curriculum::{NewSection, Section, SectionPayload, SectionUpdate};
use crate::domain::ids::{CourseId, SectionId};

/// Variables naming one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub course_id: CourseId,
}

/// Variables naming one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRef {
    pub section_id: SectionId,
}

/// Variables for `updateSection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionVariables {
    pub section_id: SectionId,
    #[serde(flatten)]
    pub changes: SectionUpdate,
}

/// Variables for `reorderSections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderSectionsVariables {
    pub course_id: CourseId,
    pub section_ids: Vec<SectionId>,
}

define_operation! {
    /// All sections of a course with their curriculum items, in order.
    query GetCourseSections {
        variables: CourseRef,
        output: Vec<Section>,
        root: "getCourseSections",
        declare: ["courseId": "Int!"],
        selection: "(courseId: $courseId) { id courseId title description order lectures { id sectionId title order duration isPreview } quizzes { id sectionId title order } assignments { id sectionId title order dueDate } }",
    }
}

define_operation! {
    /// Append a section to a course.
    mutation CreateSection {
        variables: NewSection,
        output: SectionPayload,
        root: "createSection",
        declare: [
            "courseId": "Int!",
            "title": "String!",
            "description": "String" = "\"\"",
            "order": "Int!",
        ],
        selection: "(courseId: $courseId, title: $title, description: $description, order: $order) { success message section { id courseId title description order } }",
    }
}

define_operation! {
    /// Edit a section's title, description or position.
    mutation UpdateSection {
        variables: UpdateSectionVariables,
        output: SectionPayload,
        root: "updateSection",
        declare: [
            "sectionId": "Int!",
            "title": "String",
            "description": "String",
            "order": "Int",
        ],
        selection: "(sectionId: $sectionId, title: $title, description: $description, order: $order) { success message section { id courseId title description order } }",
    }
}

define_operation! {
    /// Remove a section and its items.
    mutation DeleteSection {
        variables: SectionRef,
        output: Acknowledgement,
        root: "deleteSection",
        declare: ["sectionId": "Int!"],
        selection: "(sectionId: $sectionId) { success message }",
    }
}

define_operation! {
    /// Persist a new section order for a course.
    mutation ReorderSections {
        variables: ReorderSectionsVariables,
        output: Acknowledgement,
        root: "reorderSections",
        declare: ["courseId": "Int!", "sectionIds": "[Int!]!"],
        selection: "(courseId: $courseId, sectionIds: $sectionIds) { success message }",
    }
}
