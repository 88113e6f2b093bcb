use std::sync::Arc;

use defenzo_core::Clock;
use storage::repository::Storage;

use crate::api::ApiClient;
use crate::auth_service::AuthService;
use crate::badge_service::BadgeService;
use crate::course_service::CourseService;
use crate::error::AppServicesError;
use crate::news_service::NewsService;
use crate::security_service::SecurityService;
use crate::tools_service::ToolsService;

/// Assembles the app-facing services over one storage backend and one API client.
#[derive(Clone)]
pub struct AppServices {
    auth: Arc<AuthService>,
    courses: Arc<CourseService>,
    badges: Arc<BadgeService>,
    security: Arc<SecurityService>,
    tools: Arc<ToolsService>,
    news: Arc<NewsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the news seed
    /// fails.
    pub async fn new_sqlite(
        db_url: &str,
        api_base_url: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::assemble(storage, api_base_url, clock).await
    }

    /// Build services over an already-constructed storage backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the news seed fails.
    pub async fn assemble(
        storage: Storage,
        api_base_url: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let api = Arc::new(ApiClient::new(api_base_url, Arc::clone(&storage.session)));

        let auth = Arc::new(AuthService::new(
            Arc::clone(&api),
            Arc::clone(&storage.session),
        ));
        let courses = Arc::new(CourseService::new(
            Arc::clone(&api),
            Arc::clone(&storage.courses),
            Arc::clone(&storage.quiz_results),
            clock,
        ));
        let badges = Arc::new(BadgeService::new(
            Arc::clone(&api),
            Arc::clone(&storage.badges),
        ));
        let security = Arc::new(SecurityService::new(
            Arc::clone(&storage.courses),
            Arc::clone(&storage.quiz_results),
        ));
        let tools = Arc::new(ToolsService::new(Arc::clone(&api)));
        let news = Arc::new(NewsService::new(Arc::clone(&storage.news)));

        news.ensure_seeded().await?;

        Ok(Self {
            auth,
            courses,
            badges,
            security,
            tools,
            news,
        })
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn badges(&self) -> Arc<BadgeService> {
        Arc::clone(&self.badges)
    }

    #[must_use]
    pub fn security(&self) -> Arc<SecurityService> {
        Arc::clone(&self.security)
    }

    #[must_use]
    pub fn tools(&self) -> Arc<ToolsService> {
        Arc::clone(&self.tools)
    }

    #[must_use]
    pub fn news(&self) -> Arc<NewsService> {
        Arc::clone(&self.news)
    }
}
