//! Latest known progress per course.

use std::collections::BTreeMap;

use tokio::sync::watch;

use crate::domain::ids::CourseId;
use crate::domain::progress::CourseProgress;

/// Map of course id to the most recently observed progress.
pub type ProgressMap = BTreeMap<CourseId, CourseProgress>;

/// Publishes progress updates made by the progress service.
pub struct ProgressContext {
    courses: watch::Sender<ProgressMap>,
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressContext {
    #[must_use]
    pub fn new() -> Self {
        let (courses, _) = watch::channel(ProgressMap::new());
        Self { courses }
    }

    /// Progress recorded for `course_id`.
    #[must_use]
    pub fn get(&self, course_id: CourseId) -> Option<CourseProgress> {
        self.courses.borrow().get(&course_id).cloned()
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressMap {
        self.courses.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressMap> {
        self.courses.subscribe()
    }

    /// Store `progress`, replacing the previous entry for its course.
    pub fn record(&self, progress: CourseProgress) {
        self.courses.send_modify(|courses| {
            courses.insert(progress.course_id, progress);
        });
    }

    /// Forget everything, e.g. on logout.
    pub fn clear(&self) {
        self.courses.send_replace(ProgressMap::new());
    }
}
