//! Course metadata operations.

use serde::Serialize;

use super::sections::CourseRef;
use super::{NoVariables, define_operation};
use crate::domain::course::{Course, CourseMetadataUpdate, CoursePayload, NewCourse};
use crate::domain::ids::CourseId;

/// Variables for `updateCourse`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseVariables {
    pub course_id: CourseId,
    #[serde(flatten)]
    pub changes: CourseMetadataUpdate,
}

define_operation! {
    /// Course metadata. Resolves to `null` for unknown courses.
    query GetCourse {
        variables: CourseRef,
        output: Option<Course>,
        root: "getCourse",
        declare: ["courseId": "Int!"],
        selection: "(courseId: $courseId) { id title subtitle description category level language price thumbnail status instructorId createdAt updatedAt }",
    }
}

define_operation! {
    /// Courses owned by the signed-in instructor.
    query GetInstructorCourses {
        variables: NoVariables,
        output: Vec<Course>,
        root: "getInstructorCourses",
        declare: [],
        selection: " { id title subtitle category level price thumbnail status updatedAt }",
    }
}

define_operation! {
    /// Start a new draft course.
    mutation CreateCourse {
        variables: NewCourse,
        output: CoursePayload,
        root: "createCourse",
        declare: [
            "title": "String!",
            "description": "String",
            "category": "String",
            "level": "CourseLevel",
            "price": "Float",
        ],
        selection: "(title: $title, description: $description, category: $category, level: $level, price: $price) { success message course { id title description category level price status } }",
    }
}

define_operation! {
    /// Edit course landing-page metadata.
    mutation UpdateCourseMetadata {
        variables: UpdateCourseVariables,
        output: CoursePayload,
        root: "updateCourse",
        declare: [
            "courseId": "Int!",
            "title": "String",
            "subtitle": "String",
            "description": "String",
            "category": "String",
            "level": "CourseLevel",
            "language": "String",
            "price": "Float",
            "thumbnail": "String",
        ],
        selection: "(courseId: $courseId, title: $title, subtitle: $subtitle, description: $description, category: $category, level: $level, language: $language, price: $price, thumbnail: $thumbnail) { success message course { id title subtitle description category level language price thumbnail status updatedAt } }",
    }
}

define_operation! {
    /// Submit a draft course for publication.
    mutation PublishCourse {
        variables: CourseRef,
        output: CoursePayload,
        root: "publishCourse",
        declare: ["courseId": "Int!"],
        selection: "(courseId: $courseId) { success message course { id title status } }",
    }
}
