//! Course progress operations.

use super::define_operation;
use super::lectures::LectureRef;
use super::sections::CourseRef;
use crate::domain::progress::{CourseProgress, ProgressPayload};

define_operation! {
    /// Completion summary for a course; `null` when not enrolled.
    query GetCourseProgress {
        variables: CourseRef,
        output: Option<CourseProgress>,
        root: "getCourseProgress",
        declare: ["courseId": "Int!"],
        selection: "(courseId: $courseId) { courseId completedLectures totalLectures percentage completedLectureIds }",
    }
}

define_operation! {
    /// Record a lecture as completed.
    mutation MarkLectureComplete {
        variables: LectureRef,
        output: ProgressPayload,
        root: "markLectureComplete",
        declare: ["lectureId": "Int!"],
        selection: "(lectureId: $lectureId) { success message progress { courseId completedLectures totalLectures percentage completedLectureIds } }",
    }
}
