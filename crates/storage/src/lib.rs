#![forbid(unsafe_code)]

//! Storage layer: repository traits, an in-memory double for tests, and the
//! `SQLite` adapter the app runs on.

pub mod repository;
pub mod sqlite;

pub use repository::{
    BadgeRepository, CourseRepository, InMemoryRepository, NewsRepository, QuizResultRecord,
    QuizResultRepository, SessionRepository, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
