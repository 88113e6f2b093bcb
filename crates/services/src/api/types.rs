//! Wire types for the backend API.
//!
//! The backend is lenient about shapes in a few places, so the DTOs here
//! absorb that before anything reaches the domain model: `tags` and lesson
//! `content` sometimes arrive as JSON-encoded strings, and `awarded_at`
//! comes back either as a plain timestamp or as the `{Time, Valid}` wrapper
//! the server's nullable-time column serializes to.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use defenzo_core::model::{
    Badge, Course, CourseId, CourseLevel, Lesson, LessonContent, LessonId, UserBadge,
};

use crate::error::ApiError;

//
// ─── AUTH ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdate {
    pub email: String,
    pub full_name: String,
}

//
// ─── LENIENT PAYLOAD FIELDS ────────────────────────────────────────────────────
//

/// A value the server sends either inline or JSON-encoded inside a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybeEncoded<T> {
    Inline(T),
    Encoded(String),
}

impl<T: DeserializeOwned> MaybeEncoded<T> {
    fn decode(self) -> Result<T, ApiError> {
        match self {
            MaybeEncoded::Inline(value) => Ok(value),
            MaybeEncoded::Encoded(raw) => serde_json::from_str(&raw).map_err(ApiError::payload),
        }
    }
}

/// `awarded_at` as the server sends it: a plain timestamp, or the
/// `{Time, Valid}` pair its nullable column marshals to.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NullableTime {
    Wrapped {
        #[serde(rename = "Time")]
        time: DateTime<Utc>,
        #[serde(rename = "Valid")]
        valid: bool,
    },
    Plain(DateTime<Utc>),
}

impl NullableTime {
    fn resolve(self) -> Option<DateTime<Utc>> {
        match self {
            NullableTime::Wrapped { time, valid } => valid.then_some(time),
            NullableTime::Plain(time) => Some(time),
        }
    }
}

//
// ─── COURSES ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub struct LessonDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub content: serde_json::Value,
    #[serde(default)]
    pub completed: bool,
}

impl LessonDto {
    /// Converts the wire lesson into the domain model.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Payload` when the content does not match any known
    /// lesson format or fails domain validation.
    pub fn into_lesson(self) -> Result<Lesson, ApiError> {
        let id = LessonId::new(self.id).map_err(ApiError::payload)?;
        // A JSON string is itself a valid Value, so the string-encoded case
        // has to be unwrapped by hand; `MaybeEncoded` cannot tell them apart.
        let content: LessonContent = match self.content {
            serde_json::Value::String(raw) => {
                serde_json::from_str(&raw).map_err(ApiError::payload)?
            }
            value => serde_json::from_value(value).map_err(ApiError::payload)?,
        };
        if content.lesson_type().as_str() != self.lesson_type {
            tracing::debug!(
                declared = %self.lesson_type,
                resolved = %content.lesson_type().as_str(),
                "lesson type tag disagrees with payload shape"
            );
        }
        Lesson::from_persisted(id, self.title, self.duration, content, self.completed)
            .map_err(ApiError::payload)
    }
}

#[derive(Debug, Deserialize)]
pub struct CourseDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub level: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tags: Option<MaybeEncoded<Vec<String>>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub lessons: Vec<LessonDto>,
}

impl CourseDto {
    /// Converts the wire course into the domain model.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Payload` on an unknown level, malformed tags, or a
    /// lesson that fails conversion.
    pub fn into_course(self) -> Result<Course, ApiError> {
        let id = CourseId::new(self.id).map_err(ApiError::payload)?;
        let level: CourseLevel = self.level.parse().map_err(ApiError::payload)?;
        let tags = match self.tags {
            Some(tags) => tags.decode()?,
            None => Vec::new(),
        };
        let lessons = self
            .lessons
            .into_iter()
            .map(LessonDto::into_lesson)
            .collect::<Result<Vec<_>, _>>()?;

        Course::from_persisted(
            id,
            self.title,
            self.description,
            self.category,
            level,
            self.duration,
            tags,
            self.image,
            self.progress,
            lessons,
        )
        .map_err(ApiError::payload)
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// One row of `GET /api/user/progress`.
#[derive(Debug, Deserialize)]
pub struct ProgressDto {
    pub course_id: String,
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub progress: i64,
}

/// Body of `POST /api/user/progress`.
#[derive(Debug, Serialize)]
pub struct ProgressUpdate {
    pub course_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    pub completed: bool,
    pub progress: u8,
    pub last_accessed: DateTime<Utc>,
}

//
// ─── BADGES ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub struct UserBadgeDto {
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub awarded_at: Option<NullableTime>,
    pub badge: Badge,
}

impl UserBadgeDto {
    #[must_use]
    pub fn into_user_badge(self) -> UserBadge {
        UserBadge::new(
            self.badge,
            self.progress,
            self.completed,
            self.awarded_at.and_then(NullableTime::resolve),
        )
    }
}

//
// ─── TOOLS ─────────────────────────────────────────────────────────────────────
//

/// Scan counters from the URL reputation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDetails {
    pub total_scans: u32,
    pub positive_scans: u32,
}

/// Outcome of `POST /api/scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub url: String,
    pub status: String,
    #[serde(default)]
    pub details: Option<ScanDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of `POST /api/password-check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCheckResult {
    pub score: u8,
    pub label: String,
    pub suggestions: Vec<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
