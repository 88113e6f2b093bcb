use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::course::clamp_progress;
use crate::model::ids::BadgeId;

//
// ─── CATEGORIES ────────────────────────────────────────────────────────────────
//

/// The four badge categories the server seeds.
///
/// Anything else coming over the wire is treated as unknown and dropped
/// during grouping (long-standing client behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BadgeCategory {
    CourseCompletion,
    ToolUsage,
    LearningProgress,
    QuizPerformance,
}

impl BadgeCategory {
    /// All known categories in display order.
    pub const ALL: [BadgeCategory; 4] = [
        BadgeCategory::CourseCompletion,
        BadgeCategory::ToolUsage,
        BadgeCategory::LearningProgress,
        BadgeCategory::QuizPerformance,
    ];

    /// Resolves a wire category id; `None` for unknown categories.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "course_completion" => Some(BadgeCategory::CourseCompletion),
            "tool_usage" => Some(BadgeCategory::ToolUsage),
            "learning_progress" => Some(BadgeCategory::LearningProgress),
            "quiz_performance" => Some(BadgeCategory::QuizPerformance),
            _ => None,
        }
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            BadgeCategory::CourseCompletion => "course_completion",
            BadgeCategory::ToolUsage => "tool_usage",
            BadgeCategory::LearningProgress => "learning_progress",
            BadgeCategory::QuizPerformance => "quiz_performance",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            BadgeCategory::CourseCompletion => "Course Completion",
            BadgeCategory::ToolUsage => "Security Tools",
            BadgeCategory::LearningProgress => "Learning Progress",
            BadgeCategory::QuizPerformance => "Quiz Performance",
        }
    }
}

//
// ─── BADGE ─────────────────────────────────────────────────────────────────────
//

/// Completion requirement attached to a badge definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRequirement {
    /// Requirement type tag, e.g. `courses_completed` or `perfect_score`.
    #[serde(rename = "requirement_type")]
    pub kind: String,
    /// Threshold for counted requirements; absent for one-shot ones.
    #[serde(rename = "requirement_value")]
    pub value: Option<u32>,
}

/// A server-defined achievement descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Raw category id; see [`Badge::known_category`].
    pub category: String,
    #[serde(flatten)]
    pub requirement: BadgeRequirement,
}

impl Badge {
    /// The typed category, if this badge belongs to a known one.
    #[must_use]
    pub fn known_category(&self) -> Option<BadgeCategory> {
        BadgeCategory::from_id(&self.category)
    }
}

/// A badge definition joined with one user's progress toward it.
///
/// Progress is server-computed; the client only displays it.
#[derive(Debug, Clone, PartialEq)]
pub struct UserBadge {
    badge: Badge,
    progress: u8,
    completed: bool,
    awarded_at: Option<DateTime<Utc>>,
}

impl UserBadge {
    /// Wraps a badge with the user's progress, clamping into 0..=100.
    #[must_use]
    pub fn new(
        badge: Badge,
        progress: i64,
        completed: bool,
        awarded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            badge,
            progress: clamp_progress(progress),
            completed,
            awarded_at,
        }
    }

    #[must_use]
    pub fn badge(&self) -> &Badge {
        &self.badge
    }

    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn awarded_at(&self) -> Option<DateTime<Utc>> {
        self.awarded_at
    }
}

//
// ─── GROUPING ──────────────────────────────────────────────────────────────────
//

/// Badges of one known category, in the order they were fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeGroup {
    pub category: BadgeCategory,
    pub badges: Vec<UserBadge>,
}

/// Groups user badges by the four known categories, display order.
///
/// Badges with an unknown category id are dropped. Empty groups are kept so
/// every section renders.
#[must_use]
pub fn group_by_category(badges: &[UserBadge]) -> Vec<BadgeGroup> {
    BadgeCategory::ALL
        .into_iter()
        .map(|category| BadgeGroup {
            category,
            badges: badges
                .iter()
                .filter(|ub| ub.badge().known_category() == Some(category))
                .cloned()
                .collect(),
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn badge(id: &str, category: &str) -> Badge {
        Badge {
            id: BadgeId::new(id).unwrap(),
            name: format!("Badge {id}"),
            description: String::new(),
            icon: "🏆".into(),
            category: category.into(),
            requirement: BadgeRequirement {
                kind: "courses_completed".into(),
                value: Some(5),
            },
        }
    }

    #[test]
    fn category_ids_round_trip() {
        for category in BadgeCategory::ALL {
            assert_eq!(BadgeCategory::from_id(category.id()), Some(category));
        }
        assert_eq!(BadgeCategory::from_id("streaks"), None);
    }

    #[test]
    fn user_badge_clamps_progress() {
        let ub = UserBadge::new(badge("b1", "tool_usage"), 130, false, None);
        assert_eq!(ub.progress(), 100);
        let ub = UserBadge::new(badge("b1", "tool_usage"), -3, false, None);
        assert_eq!(ub.progress(), 0);
    }

    #[test]
    fn grouping_follows_display_order_and_drops_unknowns() {
        let badges = vec![
            UserBadge::new(badge("b1", "quiz_performance"), 40, false, None),
            UserBadge::new(badge("b2", "mystery"), 10, false, None),
            UserBadge::new(badge("b3", "course_completion"), 100, true, None),
            UserBadge::new(badge("b4", "quiz_performance"), 90, false, None),
        ];

        let groups = group_by_category(&badges);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].category, BadgeCategory::CourseCompletion);
        assert_eq!(groups[0].badges.len(), 1);
        assert_eq!(groups[1].badges.len(), 0);
        assert_eq!(groups[2].badges.len(), 0);
        assert_eq!(groups[3].badges.len(), 2);

        let total: usize = groups.iter().map(|g| g.badges.len()).sum();
        // The unknown-category badge is gone.
        assert_eq!(total, 3);
    }
}
