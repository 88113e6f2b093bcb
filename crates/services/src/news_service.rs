use std::sync::Arc;

use defenzo_core::model::{NewsArticle, NewsCategory};
use storage::repository::NewsRepository;

use crate::error::NewsServiceError;

/// The security news feed, served from local storage.
#[derive(Clone)]
pub struct NewsService {
    news: Arc<dyn NewsRepository>,
}

impl NewsService {
    #[must_use]
    pub fn new(news: Arc<dyn NewsRepository>) -> Self {
        Self { news }
    }

    /// Lists articles in feed order, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `NewsServiceError` on storage failures.
    pub async fn articles(
        &self,
        category: Option<NewsCategory>,
    ) -> Result<Vec<NewsArticle>, NewsServiceError> {
        Ok(self.news.list_articles(category).await?)
    }

    /// Fetches one article by id.
    ///
    /// # Errors
    ///
    /// Returns `NewsServiceError::UnknownArticle` when the id is not in the feed.
    pub async fn article(&self, id: &str) -> Result<NewsArticle, NewsServiceError> {
        self.news
            .list_articles(None)
            .await?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| NewsServiceError::UnknownArticle(id.to_owned()))
    }

    /// Replaces the stored feed wholesale.
    ///
    /// # Errors
    ///
    /// Returns `NewsServiceError` on storage failures.
    pub async fn replace_feed(&self, articles: &[NewsArticle]) -> Result<(), NewsServiceError> {
        self.news.replace_articles(articles).await?;
        Ok(())
    }

    /// Seeds the bundled starter feed when the store is empty, so the news
    /// tab is never blank on first launch.
    ///
    /// # Errors
    ///
    /// Returns `NewsServiceError` on storage failures.
    pub async fn ensure_seeded(&self) -> Result<(), NewsServiceError> {
        if self.news.list_articles(None).await?.is_empty() {
            self.news.replace_articles(&starter_feed()).await?;
            tracing::info!("seeded starter news feed");
        }
        Ok(())
    }
}

/// The articles bundled with the app.
fn starter_feed() -> Vec<NewsArticle> {
    vec![
        NewsArticle {
            id: "starter-phishing-wave".into(),
            title: "Phishing Wave Targets Small Businesses".into(),
            summary: "A new campaign impersonates invoice reminders to steal credentials."
                .into(),
            category: NewsCategory::Threats,
            date: "May 24, 2024".into(),
            read_time: "4 min".into(),
            image_url: None,
            likes: 128,
            comments: 32,
        },
        NewsArticle {
            id: "starter-passkeys".into(),
            title: "Getting Started with Passkeys".into(),
            summary: "Why passkeys beat passwords and how to turn them on.".into(),
            category: NewsCategory::Tips,
            date: "May 22, 2024".into(),
            read_time: "3 min".into(),
            image_url: None,
            likes: 246,
            comments: 57,
        },
        NewsArticle {
            id: "starter-ai-scams".into(),
            title: "AI Voice Cloning Scams on the Rise".into(),
            summary: "Attackers now clone voices from seconds of audio.".into(),
            category: NewsCategory::Trends,
            date: "May 20, 2024".into(),
            read_time: "5 min".into(),
            image_url: None,
            likes: 310,
            comments: 88,
        },
    ]
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn ensure_seeded_fills_empty_store_once() {
        let repo = InMemoryRepository::new();
        let svc = NewsService::new(Arc::new(repo));

        svc.ensure_seeded().await.unwrap();
        let first = svc.articles(None).await.unwrap();
        assert!(!first.is_empty());

        // A second call leaves the feed untouched.
        svc.ensure_seeded().await.unwrap();
        assert_eq!(svc.articles(None).await.unwrap(), first);
    }

    #[tokio::test]
    async fn article_lookup_and_category_filter() {
        let repo = InMemoryRepository::new();
        let svc = NewsService::new(Arc::new(repo));
        svc.ensure_seeded().await.unwrap();

        let tips = svc.articles(Some(NewsCategory::Tips)).await.unwrap();
        assert!(tips.iter().all(|a| a.category == NewsCategory::Tips));

        let found = svc.article("starter-passkeys").await.unwrap();
        assert_eq!(found.category, NewsCategory::Tips);

        let missing = svc.article("ghost").await.unwrap_err();
        assert!(matches!(missing, NewsServiceError::UnknownArticle(_)));
    }
}
