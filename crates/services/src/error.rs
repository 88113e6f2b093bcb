//! Shared error types for the services crate.

use thiserror::Error;

use defenzo_core::model::{CourseError, CourseId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ApiClient` and the DTO conversions layered on it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("server error {0}")]
    Server(reqwest::StatusCode),
    #[error("request rejected with status {0}")]
    Status(reqwest::StatusCode),
    #[error("network error")]
    Network(#[source] reqwest::Error),
    #[error("could not decode response body")]
    Decode(#[source] reqwest::Error),
    #[error("malformed payload: {0}")]
    Payload(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub(crate) fn payload(err: impl std::fmt::Display) -> Self {
        ApiError::Payload(err.to_string())
    }
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("password too weak")]
    WeakPassword(Vec<String>),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error("course {0} not found")]
    UnknownCourse(CourseId),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `BadgeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BadgeServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SecurityService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SecurityServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ToolsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ToolsServiceError {
    #[error("invalid url")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported url scheme {0:?}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `NewsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NewsServiceError {
    #[error("article {0:?} not found")]
    UnknownArticle(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    News(#[from] NewsServiceError),
}
