#![forbid(unsafe_code)]

//! Application services: the API client, the offline-first course and badge
//! flows, the security dashboard, the standalone tools, and the news feed.

pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod badge_service;
pub mod course_service;
pub mod error;
pub mod news_service;
pub mod security_service;
pub mod tools_service;

pub use defenzo_core::Clock;

pub use api::types::{PasswordCheckResult, ScanDetails, ScanResult};
pub use api::ApiClient;
pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use badge_service::BadgeService;
pub use course_service::CourseService;
pub use error::{
    ApiError, AppServicesError, AuthError, BadgeServiceError, CourseServiceError,
    NewsServiceError, SecurityServiceError, ToolsServiceError,
};
pub use news_service::NewsService;
pub use security_service::SecurityService;
pub use tools_service::ToolsService;
