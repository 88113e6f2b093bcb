use defenzo_core::model::{BadgeId, CourseId, LessonContent, LessonId, NewsCategory};

use crate::repository::StorageError;

pub(super) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(super) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(super) fn course_id(raw: &str) -> Result<CourseId, StorageError> {
    CourseId::new(raw).map_err(ser)
}

pub(super) fn lesson_id(raw: &str) -> Result<LessonId, StorageError> {
    LessonId::new(raw).map_err(ser)
}

pub(super) fn badge_id(raw: &str) -> Result<BadgeId, StorageError> {
    BadgeId::new(raw).map_err(ser)
}

pub(super) fn news_category(raw: &str) -> Result<NewsCategory, StorageError> {
    raw.parse().map_err(ser)
}

/// Lesson content is persisted as a JSON column, the shape the server sends.
pub(super) fn content_to_json(content: &LessonContent) -> Result<String, StorageError> {
    serde_json::to_string(content).map_err(ser)
}

pub(super) fn content_from_json(raw: &str) -> Result<LessonContent, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(super) fn tags_to_json(tags: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(tags).map_err(ser)
}

pub(super) fn tags_from_json(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}
