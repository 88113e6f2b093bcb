use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when parsing an id from a string fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: value is empty")]
pub struct ParseIdError {
    kind: &'static str,
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates the id from a raw server-assigned string.
            ///
            /// # Errors
            ///
            /// Returns `ParseIdError` if the value is empty or whitespace-only.
            pub fn new(raw: impl Into<String>) -> Result<Self, ParseIdError> {
                let raw = raw.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError { kind: $kind });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Course (server-assigned).
    CourseId,
    "CourseId"
);

string_id!(
    /// Unique identifier for a Lesson within a course.
    LessonId,
    "LessonId"
);

string_id!(
    /// Unique identifier for a Badge definition.
    BadgeId,
    "BadgeId"
);

/// Unique identifier for a user account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    /// Creates a new `UserId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_trims_and_displays() {
        let id = CourseId::new("  course-1  ").unwrap();
        assert_eq!(id.as_str(), "course-1");
        assert_eq!(id.to_string(), "course-1");
    }

    #[test]
    fn course_id_rejects_empty() {
        assert!(CourseId::new("   ").is_err());
        assert!("".parse::<CourseId>().is_err());
    }

    #[test]
    fn lesson_id_from_str() {
        let id: LessonId = "l-3".parse().unwrap();
        assert_eq!(id, LessonId::new("l-3").unwrap());
    }

    #[test]
    fn badge_id_roundtrip() {
        let original = BadgeId::new("quiz_perfect").unwrap();
        let parsed: BadgeId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn user_id_value() {
        let id = UserId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
    }
}
