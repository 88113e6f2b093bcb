//! The security score: a weighted blend of course, quiz, and practical-task
//! completion, reduced to a single 0..=100 number plus a status band.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative weight of completed courses in the overall score.
pub const COURSE_WEIGHT: f64 = 0.4;
/// Relative weight of average quiz results in the overall score.
pub const QUIZ_WEIGHT: f64 = 0.4;
/// Relative weight of practical-task completion in the overall score.
pub const PRACTICAL_WEIGHT: f64 = 0.2;

//
// ─── INPUT ─────────────────────────────────────────────────────────────────────
//

/// Raw counters the score is computed from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecurityMetrics {
    pub courses_completed: u32,
    pub total_courses: u32,
    pub quiz_scores: Vec<f64>,
    pub practical_tasks_completed: u32,
    pub total_practical_tasks: u32,
}

//
// ─── OUTPUT ────────────────────────────────────────────────────────────────────
//

/// Per-metric percentages, each rounded and in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricBreakdown {
    pub courses_progress: u8,
    pub quiz_results: u8,
    pub practical_tasks: u8,
}

/// Qualitative band for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SecurityStatus {
    Critical,
    Fair,
    Good,
    Excellent,
}

impl SecurityStatus {
    /// Band thresholds: >=80 Excellent, >=60 Good, >=40 Fair, else Critical.
    #[must_use]
    pub fn for_score(overall: u8) -> Self {
        match overall {
            80.. => SecurityStatus::Excellent,
            60..=79 => SecurityStatus::Good,
            40..=59 => SecurityStatus::Fair,
            _ => SecurityStatus::Critical,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SecurityStatus::Excellent => "Excellent",
            SecurityStatus::Good => "Good",
            SecurityStatus::Fair => "Fair",
            SecurityStatus::Critical => "Critical",
        }
    }
}

impl fmt::Display for SecurityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The computed score with its breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityDetails {
    pub overall: u8,
    pub status: SecurityStatus,
    pub metrics: MetricBreakdown,
}

//
// ─── CALCULATION ───────────────────────────────────────────────────────────────
//

fn ratio_pct(done: u32, total: u32) -> f64 {
    // Zero denominators score 0 rather than poisoning the blend with NaN.
    if total == 0 {
        return 0.0;
    }
    f64::from(done) / f64::from(total) * 100.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_pct(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Computes the weighted security score.
///
/// ```
/// use defenzo_core::security::{calculate_security_score, SecurityMetrics, SecurityStatus};
///
/// let details = calculate_security_score(&SecurityMetrics {
///     courses_completed: 3,
///     total_courses: 5,
///     quiz_scores: vec![85.0, 90.0, 75.0],
///     practical_tasks_completed: 2,
///     total_practical_tasks: 5,
/// });
/// assert_eq!(details.overall, 65);
/// assert_eq!(details.status, SecurityStatus::Good);
/// ```
#[must_use]
pub fn calculate_security_score(metrics: &SecurityMetrics) -> SecurityDetails {
    let course_score = ratio_pct(metrics.courses_completed, metrics.total_courses);

    let avg_quiz = if metrics.quiz_scores.is_empty() {
        0.0
    } else {
        metrics.quiz_scores.iter().sum::<f64>() / metrics.quiz_scores.len() as f64
    };

    let practical_score = ratio_pct(
        metrics.practical_tasks_completed,
        metrics.total_practical_tasks,
    );

    let overall = round_pct(
        course_score * COURSE_WEIGHT + avg_quiz * QUIZ_WEIGHT + practical_score * PRACTICAL_WEIGHT,
    );

    SecurityDetails {
        overall,
        status: SecurityStatus::for_score(overall),
        metrics: MetricBreakdown {
            courses_progress: round_pct(course_score),
            quiz_results: round_pct(avg_quiz),
            practical_tasks: round_pct(practical_score),
        },
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_example_breakdown() {
        let details = calculate_security_score(&SecurityMetrics {
            courses_completed: 3,
            total_courses: 5,
            quiz_scores: vec![85.0, 90.0, 75.0],
            practical_tasks_completed: 2,
            total_practical_tasks: 5,
        });

        // 60*0.4 + 83.33*0.4 + 40*0.2 = 65.33 -> 65
        assert_eq!(details.metrics.courses_progress, 60);
        assert_eq!(details.metrics.quiz_results, 83);
        assert_eq!(details.metrics.practical_tasks, 40);
        assert_eq!(details.overall, 65);
    }

    #[test]
    fn empty_metrics_score_zero() {
        let details = calculate_security_score(&SecurityMetrics::default());
        assert_eq!(details.overall, 0);
        assert_eq!(details.status, SecurityStatus::Critical);
        assert_eq!(details.metrics.courses_progress, 0);
        assert_eq!(details.metrics.quiz_results, 0);
        assert_eq!(details.metrics.practical_tasks, 0);
    }

    #[test]
    fn perfect_metrics_score_one_hundred() {
        let details = calculate_security_score(&SecurityMetrics {
            courses_completed: 4,
            total_courses: 4,
            quiz_scores: vec![100.0, 100.0],
            practical_tasks_completed: 3,
            total_practical_tasks: 3,
        });
        assert_eq!(details.overall, 100);
        assert_eq!(details.status, SecurityStatus::Excellent);
    }

    #[test]
    fn overall_stays_in_range() {
        let cases = [
            SecurityMetrics {
                courses_completed: 10,
                total_courses: 3, // more done than total; still capped
                quiz_scores: vec![250.0],
                practical_tasks_completed: 9,
                total_practical_tasks: 2,
            },
            SecurityMetrics {
                courses_completed: 0,
                total_courses: 0,
                quiz_scores: vec![],
                practical_tasks_completed: 0,
                total_practical_tasks: 0,
            },
        ];
        for metrics in &cases {
            let details = calculate_security_score(metrics);
            assert!(details.overall <= 100);
        }
    }

    #[test]
    fn status_band_edges() {
        assert_eq!(SecurityStatus::for_score(100), SecurityStatus::Excellent);
        assert_eq!(SecurityStatus::for_score(80), SecurityStatus::Excellent);
        assert_eq!(SecurityStatus::for_score(79), SecurityStatus::Good);
        assert_eq!(SecurityStatus::for_score(60), SecurityStatus::Good);
        assert_eq!(SecurityStatus::for_score(59), SecurityStatus::Fair);
        assert_eq!(SecurityStatus::for_score(40), SecurityStatus::Fair);
        assert_eq!(SecurityStatus::for_score(39), SecurityStatus::Critical);
        assert_eq!(SecurityStatus::for_score(0), SecurityStatus::Critical);
    }

    #[test]
    fn quiz_average_covers_all_attempts() {
        let details = calculate_security_score(&SecurityMetrics {
            courses_completed: 0,
            total_courses: 1,
            quiz_scores: vec![50.0, 100.0],
            practical_tasks_completed: 0,
            total_practical_tasks: 1,
        });
        assert_eq!(details.metrics.quiz_results, 75);
        // 0*0.4 + 75*0.4 + 0*0.2 = 30
        assert_eq!(details.overall, 30);
    }
}
