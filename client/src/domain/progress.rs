//! Student progress through a course.

use serde::{Deserialize, Serialize};

use super::ids::{CourseId, LectureId};
use super::operations::impl_mutation_outcome;

/// Completion summary for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: CourseId,
    pub completed_lectures: u32,
    pub total_lectures: u32,
    pub percentage: f64,
    #[serde(default)]
    pub completed_lecture_ids: Vec<LectureId>,
}

impl CourseProgress {
    /// Whether `lecture` is recorded as completed.
    #[must_use]
    pub fn has_completed(&self, lecture: LectureId) -> bool {
        self.completed_lecture_ids.contains(&lecture)
    }
}

/// Response of `markLectureComplete`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressPayload {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub progress: Option<CourseProgress>,
}

impl_mutation_outcome!(ProgressPayload);
