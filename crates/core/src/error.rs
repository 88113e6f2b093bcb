use thiserror::Error;

use crate::model::{CourseError, LessonError, ParseIdError};

/// Top-level domain error for callers that do not care which aggregate failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
