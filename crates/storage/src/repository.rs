use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use defenzo_core::model::{Course, CourseId, NewsArticle, NewsCategory, UserBadge};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// One recorded quiz attempt; scores feed the security dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResultRecord {
    pub course_id: CourseId,
    pub score: f64,
    pub taken_at: DateTime<Utc>,
}

/// Repository contract for courses with their lessons.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist or update a course, replacing its lesson list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course with lessons by ID; `Ok(None)` when missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError>;

    /// List all courses, lessons included, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;
}

/// Repository contract for the cached user-badge list.
#[async_trait]
pub trait BadgeRepository: Send + Sync {
    /// Replace the cached badge list wholesale (mirrors the server fetch).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the badges cannot be stored.
    async fn replace_user_badges(&self, badges: &[UserBadge]) -> Result<(), StorageError>;

    /// List cached badges in stored order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_user_badges(&self) -> Result<Vec<UserBadge>, StorageError>;
}

/// Repository contract for quiz attempts.
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    /// Append one quiz attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn record_quiz_result(&self, result: &QuizResultRecord) -> Result<(), StorageError>;

    /// All recorded scores, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn quiz_scores(&self) -> Result<Vec<f64>, StorageError>;
}

/// Repository contract for the news feed.
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Replace the stored feed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the articles cannot be stored.
    async fn replace_articles(&self, articles: &[NewsArticle]) -> Result<(), StorageError>;

    /// List articles, optionally filtered by category, stored order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_articles(
        &self,
        category: Option<NewsCategory>,
    ) -> Result<Vec<NewsArticle>, StorageError>;
}

/// Persisted bearer token, the device-storage analogue for the API session.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store the token, overwriting any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be stored.
    async fn save_token(&self, token: &str) -> Result<(), StorageError>;

    /// Load the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn load_token(&self) -> Result<Option<String>, StorageError>;

    /// Remove the stored token. A no-op when none is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn clear_token(&self) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    badges: Arc<Mutex<Vec<UserBadge>>>,
    quiz_results: Arc<Mutex<Vec<QuizResultRecord>>>,
    news: Arc<Mutex<Vec<NewsArticle>>>,
    token: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self.courses.lock().map_err(lock_err)?;
        guard.insert(course.id().clone(), course.clone());
        Ok(())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self.courses.lock().map_err(lock_err)?;
        Ok(guard.get(id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let guard = self.courses.lock().map_err(lock_err)?;
        let mut courses: Vec<Course> = guard.values().cloned().collect();
        courses.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(courses)
    }
}

#[async_trait]
impl BadgeRepository for InMemoryRepository {
    async fn replace_user_badges(&self, badges: &[UserBadge]) -> Result<(), StorageError> {
        let mut guard = self.badges.lock().map_err(lock_err)?;
        *guard = badges.to_vec();
        Ok(())
    }

    async fn list_user_badges(&self) -> Result<Vec<UserBadge>, StorageError> {
        let guard = self.badges.lock().map_err(lock_err)?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryRepository {
    async fn record_quiz_result(&self, result: &QuizResultRecord) -> Result<(), StorageError> {
        let mut guard = self.quiz_results.lock().map_err(lock_err)?;
        guard.push(result.clone());
        Ok(())
    }

    async fn quiz_scores(&self) -> Result<Vec<f64>, StorageError> {
        let guard = self.quiz_results.lock().map_err(lock_err)?;
        Ok(guard.iter().map(|r| r.score).collect())
    }
}

#[async_trait]
impl NewsRepository for InMemoryRepository {
    async fn replace_articles(&self, articles: &[NewsArticle]) -> Result<(), StorageError> {
        let mut guard = self.news.lock().map_err(lock_err)?;
        *guard = articles.to_vec();
        Ok(())
    }

    async fn list_articles(
        &self,
        category: Option<NewsCategory>,
    ) -> Result<Vec<NewsArticle>, StorageError> {
        let guard = self.news.lock().map_err(lock_err)?;
        Ok(guard
            .iter()
            .filter(|a| category.is_none_or(|c| a.category == c))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        let mut guard = self.token.lock().map_err(lock_err)?;
        *guard = Some(token.to_owned());
        Ok(())
    }

    async fn load_token(&self) -> Result<Option<String>, StorageError> {
        let guard = self.token.lock().map_err(lock_err)?;
        Ok(guard.clone())
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        let mut guard = self.token.lock().map_err(lock_err)?;
        *guard = None;
        Ok(())
    }
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub badges: Arc<dyn BadgeRepository>,
    pub quiz_results: Arc<dyn QuizResultRepository>,
    pub news: Arc<dyn NewsRepository>,
    pub session: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            courses: Arc::new(repo.clone()),
            badges: Arc::new(repo.clone()),
            quiz_results: Arc::new(repo.clone()),
            news: Arc::new(repo.clone()),
            session: Arc::new(repo),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
