use std::sync::Arc;

use defenzo_core::model::Course;
use defenzo_core::security::{calculate_security_score, SecurityDetails, SecurityMetrics};
use storage::repository::{CourseRepository, QuizResultRepository};

use crate::error::SecurityServiceError;

/// Assembles the security-score dashboard from local state.
///
/// Practical work is counted over scenario, visual, and chat-simulation
/// lessons; quizzes come from recorded attempts.
#[derive(Clone)]
pub struct SecurityService {
    courses: Arc<dyn CourseRepository>,
    quiz_results: Arc<dyn QuizResultRepository>,
}

impl SecurityService {
    #[must_use]
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        quiz_results: Arc<dyn QuizResultRepository>,
    ) -> Self {
        Self {
            courses,
            quiz_results,
        }
    }

    /// Gathers the raw counters the score is computed from.
    ///
    /// # Errors
    ///
    /// Returns `SecurityServiceError` on storage failures.
    pub async fn metrics(&self) -> Result<SecurityMetrics, SecurityServiceError> {
        let courses = self.courses.list_courses().await?;
        let quiz_scores = self.quiz_results.quiz_scores().await?;

        let (practical_done, practical_total) = practical_counts(&courses);
        let completed = courses.iter().filter(|c| c.is_completed()).count();

        Ok(SecurityMetrics {
            courses_completed: count(completed),
            total_courses: count(courses.len()),
            quiz_scores,
            practical_tasks_completed: count(practical_done),
            total_practical_tasks: count(practical_total),
        })
    }

    /// The weighted overall score with its per-metric breakdown.
    ///
    /// # Errors
    ///
    /// Returns `SecurityServiceError` on storage failures.
    pub async fn dashboard(&self) -> Result<SecurityDetails, SecurityServiceError> {
        Ok(calculate_security_score(&self.metrics().await?))
    }
}

fn practical_counts(courses: &[Course]) -> (usize, usize) {
    let mut done = 0;
    let mut total = 0;
    for lesson in courses.iter().flat_map(Course::lessons) {
        if lesson.lesson_type().is_practical() {
            total += 1;
            if lesson.completed() {
                done += 1;
            }
        }
    }
    (done, total)
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
