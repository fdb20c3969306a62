//! Lecture operations.

use serde::Serialize;

use super::sections::SectionRef;
use super::{Acknowledgement, define_operation};
use crate::domain::curriculum::{Lecture, LecturePayload, LectureUpdate, NewLecture};
use crate::domain::ids::LectureId;

/// Variables naming one lecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureRef {
    pub lecture_id: LectureId,
}

/// Variables for `updateLecture`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLectureVariables {
    pub lecture_id: LectureId,
    #[serde(flatten)]
    pub changes: LectureUpdate,
}

define_operation! {
    /// Lectures of one section, in order.
    query GetSectionLectures {
        variables: SectionRef,
        output: Vec<Lecture>,
        root: "getSectionLectures",
        declare: ["sectionId": "Int!"],
        selection: "(sectionId: $sectionId) { id sectionId title description order videoUrl duration isPreview content }",
    }
}

define_operation! {
    /// Add a lecture to a section.
    mutation CreateLecture {
        variables: NewLecture,
        output: LecturePayload,
        root: "createLecture",
        declare: [
            "sectionId": "Int!",
            "title": "String!",
            "description": "String",
            "order": "Int!",
            "videoUrl": "String",
            "duration": "Int",
            "isPreview": "Boolean" = "false",
            "content": "String",
        ],
        selection: "(sectionId: $sectionId, title: $title, description: $description, order: $order, videoUrl: $videoUrl, duration: $duration, isPreview: $isPreview, content: $content) { success message lecture { id sectionId title description order videoUrl duration isPreview content } }",
    }
}

define_operation! {
    /// Edit a lecture.
    mutation UpdateLecture {
        variables: UpdateLectureVariables,
        output: LecturePayload,
        root: "updateLecture",
        declare: [
            "lectureId": "Int!",
            "title": "String",
            "description": "String",
            "order": "Int",
            "videoUrl": "String",
            "duration": "Int",
            "isPreview": "Boolean",
            "content": "String",
        ],
        selection: "(lectureId: $lectureId, title: $title, description: $description, order: $order, videoUrl: $videoUrl, duration: $duration, isPreview: $isPreview, content: $content) { success message lecture { id sectionId title description order videoUrl duration isPreview content } }",
    }
}

define_operation! {
    /// Remove a lecture.
    mutation DeleteLecture {
        variables: LectureRef,
        output: Acknowledgement,
        root: "deleteLecture",
        declare: ["lectureId": "Int!"],
        selection: "(lectureId: $lectureId) { success message }",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operations::Operation;

    const LECTURE_FIELDS: &str =
        "id sectionId title description order videoUrl duration isPreview content";

    #[test]
    fn lecture_selections_request_every_lecture_field() {
        for selection in [
            GetSectionLectures::SELECTION,
            CreateLecture::SELECTION,
            UpdateLecture::SELECTION,
        ] {
            assert!(selection.contains(LECTURE_FIELDS), "missing fields in {selection}");
        }
    }
}
