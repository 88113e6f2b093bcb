use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId};
use crate::model::lesson::Lesson;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("course category cannot be empty")]
    EmptyCategory,

    #[error("duplicate lesson id {0}")]
    DuplicateLessonId(LessonId),

    #[error("lesson {0} not found in course")]
    UnknownLesson(LessonId),

    #[error("unknown course level {0:?}")]
    UnknownLevel(String),
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    /// Recommendation weight: easier courses rank higher for newcomers.
    #[must_use]
    pub fn weight(self) -> u32 {
        match self {
            CourseLevel::Beginner => 3,
            CourseLevel::Intermediate => 2,
            CourseLevel::Advanced => 1,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseLevel {
    type Err = CourseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(CourseLevel::Beginner),
            "Intermediate" => Ok(CourseLevel::Intermediate),
            "Advanced" => Ok(CourseLevel::Advanced),
            other => Err(CourseError::UnknownLevel(other.to_owned())),
        }
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Clamps a raw progress value into 0..=100.
///
/// Clamping happens here, once, at the point of mutation; call sites must
/// not re-clamp.
#[must_use]
pub fn clamp_progress(raw: i64) -> u8 {
    u8::try_from(raw.clamp(0, 100)).unwrap_or(0)
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course: ordered lessons plus derived completion progress.
///
/// Progress is `round(100 * completed / total)` whenever lessons are loaded,
/// recomputed on every lesson mutation. Courses fetched without their lesson
/// list carry the server-reported progress instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    category: String,
    level: CourseLevel,
    duration: String,
    tags: Vec<String>,
    image: Option<String>,
    progress: u8,
    lessons: Vec<Lesson>,
}

impl Course {
    /// Creates a course; progress is derived from the given lessons.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` for a blank title/category or duplicate lesson ids.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        level: CourseLevel,
        duration: impl Into<String>,
        tags: Vec<String>,
        image: Option<String>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        let category = category.into();
        if category.trim().is_empty() {
            return Err(CourseError::EmptyCategory);
        }

        let mut seen = std::collections::HashSet::new();
        for lesson in &lessons {
            if !seen.insert(lesson.id().clone()) {
                return Err(CourseError::DuplicateLessonId(lesson.id().clone()));
            }
        }

        let mut course = Self {
            id,
            title: title.trim().to_owned(),
            description: description.into(),
            category: category.trim().to_owned(),
            level,
            duration: duration.into(),
            tags,
            image,
            progress: 0,
            lessons,
        };
        course.recompute_progress();
        Ok(course)
    }

    /// Rebuilds a course from persisted or server state.
    ///
    /// When lessons are present the reported progress is ignored and derived
    /// instead; otherwise the reported value is clamped and kept.
    ///
    /// # Errors
    ///
    /// Same validation as [`Course::new`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        level: CourseLevel,
        duration: impl Into<String>,
        tags: Vec<String>,
        image: Option<String>,
        reported_progress: i64,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CourseError> {
        let had_lessons = !lessons.is_empty();
        let mut course = Self::new(
            id,
            title,
            description,
            category,
            level,
            duration,
            tags,
            image,
            lessons,
        )?;
        if !had_lessons {
            course.progress = clamp_progress(reported_progress);
        }
        Ok(course)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn level(&self) -> CourseLevel {
        self.level
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Completion percentage, always in 0..=100.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn completed_lessons(&self) -> usize {
        self.lessons.iter().filter(|l| l.completed()).count()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.progress > 0
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.progress == 100
    }

    /// Overrides progress for courses whose lessons are not loaded.
    ///
    /// The value is clamped into 0..=100 here. When lessons are loaded the
    /// derived value wins and this call is a no-op.
    pub fn set_progress(&mut self, raw: i64) {
        if self.lessons.is_empty() {
            self.progress = clamp_progress(raw);
        }
    }

    /// Marks a lesson (in)complete and recomputes progress.
    ///
    /// Idempotent: repeating the same call leaves the course unchanged.
    /// Returns the new progress value.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::UnknownLesson` if the lesson is not part of
    /// this course.
    pub fn set_lesson_completed(
        &mut self,
        lesson_id: &LessonId,
        completed: bool,
    ) -> Result<u8, CourseError> {
        let lesson = self
            .lessons
            .iter_mut()
            .find(|lesson| lesson.id() == lesson_id)
            .ok_or_else(|| CourseError::UnknownLesson(lesson_id.clone()))?;
        lesson.set_completed(completed);
        self.recompute_progress();
        Ok(self.progress)
    }

    fn recompute_progress(&mut self) {
        if self.lessons.is_empty() {
            return;
        }
        let total = self.lessons.len() as f64;
        let completed = self.completed_lessons() as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = (completed / total * 100.0).round() as i64;
        self.progress = clamp_progress(rounded);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lesson::{CardsContent, Flashcard, LessonContent};

    fn lesson(id: &str) -> Lesson {
        Lesson::new(
            LessonId::new(id).unwrap(),
            format!("Lesson {id}"),
            "5 min",
            LessonContent::Cards(CardsContent {
                cards: vec![Flashcard {
                    front: "VPN".into(),
                    back: "Virtual Private Network".into(),
                }],
            }),
        )
        .unwrap()
    }

    fn course_with_lessons(ids: &[&str]) -> Course {
        Course::new(
            CourseId::new("c1").unwrap(),
            "Password Security",
            "Strong credentials in practice",
            "Basics",
            CourseLevel::Beginner,
            "1h",
            vec!["passwords".into()],
            None,
            ids.iter().map(|id| lesson(id)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_empty_title() {
        let err = Course::new(
            CourseId::new("c1").unwrap(),
            "  ",
            "",
            "Basics",
            CourseLevel::Beginner,
            "1h",
            vec![],
            None,
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, CourseError::EmptyTitle);
    }

    #[test]
    fn new_rejects_duplicate_lesson_ids() {
        let err = Course::new(
            CourseId::new("c1").unwrap(),
            "T",
            "",
            "Basics",
            CourseLevel::Beginner,
            "1h",
            vec![],
            None,
            vec![lesson("l1"), lesson("l1")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CourseError::DuplicateLessonId(LessonId::new("l1").unwrap())
        );
    }

    #[test]
    fn progress_is_derived_and_rounded() {
        let mut course = course_with_lessons(&["l1", "l2", "l3"]);
        assert_eq!(course.progress(), 0);

        course
            .set_lesson_completed(&LessonId::new("l1").unwrap(), true)
            .unwrap();
        // 1/3 -> 33
        assert_eq!(course.progress(), 33);

        course
            .set_lesson_completed(&LessonId::new("l2").unwrap(), true)
            .unwrap();
        // 2/3 -> 67
        assert_eq!(course.progress(), 67);

        course
            .set_lesson_completed(&LessonId::new("l3").unwrap(), true)
            .unwrap();
        assert_eq!(course.progress(), 100);
        assert!(course.is_completed());
    }

    #[test]
    fn set_lesson_completed_is_idempotent() {
        let mut course = course_with_lessons(&["l1", "l2"]);
        let id = LessonId::new("l1").unwrap();

        let first = course.set_lesson_completed(&id, true).unwrap();
        let second = course.set_lesson_completed(&id, true).unwrap();
        assert_eq!(first, second);
        assert_eq!(course.progress(), 50);
        assert_eq!(course.completed_lessons(), 1);
    }

    #[test]
    fn set_lesson_completed_rejects_unknown_lesson() {
        let mut course = course_with_lessons(&["l1"]);
        let missing = LessonId::new("ghost").unwrap();
        let err = course.set_lesson_completed(&missing, true).unwrap_err();
        assert_eq!(err, CourseError::UnknownLesson(missing));
    }

    #[test]
    fn reported_progress_is_clamped_without_lessons() {
        let course = Course::from_persisted(
            CourseId::new("c1").unwrap(),
            "T",
            "",
            "Basics",
            CourseLevel::Advanced,
            "1h",
            vec![],
            None,
            150,
            vec![],
        )
        .unwrap();
        assert_eq!(course.progress(), 100);

        let course = Course::from_persisted(
            CourseId::new("c2").unwrap(),
            "T",
            "",
            "Basics",
            CourseLevel::Advanced,
            "1h",
            vec![],
            None,
            -20,
            vec![],
        )
        .unwrap();
        assert_eq!(course.progress(), 0);
    }

    #[test]
    fn derived_progress_wins_over_reported_value() {
        let course = Course::from_persisted(
            CourseId::new("c1").unwrap(),
            "T",
            "",
            "Basics",
            CourseLevel::Beginner,
            "1h",
            vec![],
            None,
            80,
            vec![lesson("l1"), lesson("l2")],
        )
        .unwrap();
        // No lesson is completed, so reported 80 is discarded.
        assert_eq!(course.progress(), 0);
    }

    #[test]
    fn set_progress_clamps_centrally() {
        let mut course = Course::from_persisted(
            CourseId::new("c1").unwrap(),
            "T",
            "",
            "Basics",
            CourseLevel::Beginner,
            "1h",
            vec![],
            None,
            0,
            vec![],
        )
        .unwrap();
        course.set_progress(240);
        assert_eq!(course.progress(), 100);
        course.set_progress(-5);
        assert_eq!(course.progress(), 0);
    }

    #[test]
    fn level_weights_favor_beginners() {
        assert_eq!(CourseLevel::Beginner.weight(), 3);
        assert_eq!(CourseLevel::Intermediate.weight(), 2);
        assert_eq!(CourseLevel::Advanced.weight(), 1);
        assert_eq!("Beginner".parse::<CourseLevel>().unwrap(), CourseLevel::Beginner);
        assert!("Expert".parse::<CourseLevel>().is_err());
    }
}
