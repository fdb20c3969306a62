//! Integer identifiers used by the remote schema.
//!
//! The server keys every curriculum and account record by an integer primary
//! key. Each identifier gets its own newtype so a lecture id can never be
//! passed where a section id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(i64);

            impl $name {
                /// Wrap a raw server identifier.
                #[must_use]
                pub const fn new(raw: i64) -> Self {
                    Self(raw)
                }

                /// Raw integer value sent over the wire.
                #[must_use]
                pub const fn get(self) -> i64 {
                    self.0
                }
            }

            impl From<i64> for $name {
                fn from(raw: i64) -> Self {
                    Self(raw)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

define_id! {
    /// Course primary key.
    CourseId,
    /// Section primary key.
    SectionId,
    /// Lecture primary key.
    LectureId,
    /// Quiz primary key.
    QuizId,
    /// Assignment primary key.
    AssignmentId,
    /// Media library item primary key.
    MediaId,
    /// Reminder primary key.
    ReminderId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_serialise_as_bare_integers() {
        let encoded = serde_json::to_string(&CourseId::new(42)).expect("encode id");
        assert_eq!(encoded, "42");

        let decoded: SectionId = serde_json::from_str("7").expect("decode id");
        assert_eq!(decoded.get(), 7);
    }
}
