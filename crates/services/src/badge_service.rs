use std::sync::Arc;

use defenzo_core::model::{group_by_category, BadgeGroup, UserBadge};
use storage::repository::BadgeRepository;

use crate::api::types::UserBadgeDto;
use crate::api::ApiClient;
use crate::error::BadgeServiceError;

/// User badges, cached locally and grouped for the achievements screen.
///
/// Badge progress is server-computed; this service only fetches, caches and
/// arranges it.
#[derive(Clone)]
pub struct BadgeService {
    api: Arc<ApiClient>,
    badges: Arc<dyn BadgeRepository>,
}

impl BadgeService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, badges: Arc<dyn BadgeRepository>) -> Self {
        Self { api, badges }
    }

    /// Replaces the cached badge list with the server's.
    ///
    /// # Errors
    ///
    /// Returns `BadgeServiceError` on API or storage failures.
    pub async fn refresh(&self) -> Result<Vec<UserBadge>, BadgeServiceError> {
        let dtos: Vec<UserBadgeDto> = self.api.get_json("/user/badges").await?;
        let badges: Vec<UserBadge> = dtos.into_iter().map(UserBadgeDto::into_user_badge).collect();
        self.badges.replace_user_badges(&badges).await?;
        tracing::info!(count = badges.len(), "badges refreshed");
        Ok(badges)
    }

    /// Cached badges grouped by category in display order.
    ///
    /// Falls back to a refresh when the cache is empty. Badges in categories
    /// the app does not know are dropped by the grouping.
    ///
    /// # Errors
    ///
    /// Returns `BadgeServiceError` on storage failures, or API failures when
    /// a first-launch refresh is needed.
    pub async fn grouped(&self) -> Result<Vec<BadgeGroup>, BadgeServiceError> {
        let mut badges = self.badges.list_user_badges().await?;
        if badges.is_empty() {
            badges = self.refresh().await?;
        }
        for badge in &badges {
            if badge.badge().known_category().is_none() {
                tracing::debug!(badge = %badge.badge().id, category = %badge.badge().category, "badge in unknown category");
            }
        }
        Ok(group_by_category(&badges))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use defenzo_core::model::{Badge, BadgeCategory, BadgeId, BadgeRequirement};
    use storage::repository::InMemoryRepository;

    fn badge(id: &str, category: &str, completed: bool) -> UserBadge {
        UserBadge::new(
            Badge {
                id: BadgeId::new(id).unwrap(),
                name: id.to_owned(),
                description: String::new(),
                icon: "⭐".into(),
                category: category.to_owned(),
                requirement: BadgeRequirement {
                    kind: "courses_completed".into(),
                    value: Some(1),
                },
            },
            if completed { 100 } else { 10 },
            completed,
            None,
        )
    }

    #[tokio::test]
    async fn grouped_uses_cache_and_keeps_empty_groups() {
        let repo = InMemoryRepository::new();
        repo.replace_user_badges(&[
            badge("b1", "course_completion", true),
            badge("b2", "streaks", false),
        ])
        .await
        .unwrap();

        let svc = BadgeService::new(
            Arc::new(ApiClient::new(
                "http://localhost:0",
                Arc::new(repo.clone()),
            )),
            Arc::new(repo),
        );

        let groups = svc.grouped().await.unwrap();
        assert_eq!(groups.len(), BadgeCategory::ALL.len());
        assert_eq!(groups[0].category, BadgeCategory::CourseCompletion);
        assert_eq!(groups[0].badges.len(), 1);
        // The unknown "streaks" badge appears nowhere.
        let total: usize = groups.iter().map(|g| g.badges.len()).sum();
        assert_eq!(total, 1);
    }
}
