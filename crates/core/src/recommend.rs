//! Course orderings for the home screen: what to start next and what to
//! pick back up.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::model::{Course, CourseId};

/// Bonus applied when a course category matches a learner preference.
const PREFERRED_CATEGORY_BONUS: u32 = 2;

/// How many recommendations the home screen shows.
const RECOMMENDATION_LIMIT: usize = 3;

/// Weight of completion progress in the continue-learning ordering.
const PROGRESS_WEIGHT: f64 = 0.7;
/// Weight of access recency in the continue-learning ordering.
const RECENCY_WEIGHT: f64 = 0.3;

/// What we know about the learner that shapes the orderings.
#[derive(Debug, Clone, Default)]
pub struct LearnerProfile {
    pub preferred_categories: Vec<String>,
    pub last_accessed: HashMap<CourseId, DateTime<Utc>>,
}

impl LearnerProfile {
    #[must_use]
    pub fn prefers(&self, category: &str) -> bool {
        self.preferred_categories.iter().any(|c| c == category)
    }
}

/// Picks up to three not-yet-started courses, easiest and most relevant first.
///
/// Score = level weight (Beginner 3, Intermediate 2, Advanced 1), plus 2 for
/// a preferred category. Ties keep the input order (stable sort).
#[must_use]
pub fn recommended_courses<'a>(
    courses: &'a [Course],
    profile: &LearnerProfile,
) -> Vec<&'a Course> {
    let mut candidates: Vec<&Course> = courses.iter().filter(|c| !c.is_started()).collect();

    candidates.sort_by(|a, b| {
        let score = |course: &Course| {
            let bonus = if profile.prefers(course.category()) {
                PREFERRED_CATEGORY_BONUS
            } else {
                0
            };
            course.level().weight() + bonus
        };
        score(b).cmp(&score(a))
    });

    candidates.truncate(RECOMMENDATION_LIMIT);
    candidates
}

/// Orders in-progress courses for the "continue learning" rail.
///
/// Only courses with `0 < progress < 100` qualify. The composite score blends
/// how far along the course is with how recently it was opened; courses never
/// opened get no recency credit.
#[must_use]
pub fn continue_learning_courses<'a>(
    courses: &'a [Course],
    profile: &LearnerProfile,
    now: DateTime<Utc>,
) -> Vec<&'a Course> {
    let now_ms = now.timestamp_millis();

    let score = |course: &Course| -> f64 {
        let progress = f64::from(course.progress()) / 100.0;
        let recency = profile
            .last_accessed
            .get(course.id())
            .map_or(0.0, |accessed| {
                if now_ms <= 0 {
                    return 0.0;
                }
                accessed.timestamp_millis() as f64 / now_ms as f64
            });
        progress * PROGRESS_WEIGHT + recency * RECENCY_WEIGHT
    };

    let mut candidates: Vec<&Course> = courses
        .iter()
        .filter(|c| c.is_started() && !c.is_completed())
        .collect();

    candidates.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
