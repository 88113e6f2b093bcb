use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use defenzo_core::model::{Course, CourseId, LessonId};
use defenzo_core::recommend::{continue_learning_courses, recommended_courses, LearnerProfile};
use defenzo_core::Clock;
use storage::repository::{CourseRepository, QuizResultRecord, QuizResultRepository};

use crate::api::types::{CourseDto, ProgressDto, ProgressUpdate};
use crate::api::ApiClient;
use crate::error::{ApiError, CourseServiceError};

/// Courses with offline-first reads: the local store is the source of truth
/// for the UI, the API refreshes it and receives progress pushes.
///
/// Progress pushes are best-effort. Lesson completion lands locally first and
/// a failed upload only logs a warning, so working offline never loses state.
#[derive(Clone)]
pub struct CourseService {
    api: Arc<ApiClient>,
    courses: Arc<dyn CourseRepository>,
    quiz_results: Arc<dyn QuizResultRepository>,
    clock: Clock,
    last_accessed: Arc<Mutex<HashMap<CourseId, DateTime<Utc>>>>,
}

impl CourseService {
    #[must_use]
    pub fn new(
        api: Arc<ApiClient>,
        courses: Arc<dyn CourseRepository>,
        quiz_results: Arc<dyn QuizResultRepository>,
        clock: Clock,
    ) -> Self {
        Self {
            api,
            courses,
            quiz_results,
            clock,
            last_accessed: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Pulls the course catalog and the user's server-side progress, then
    /// replaces the local copies.
    ///
    /// Server progress is merged in after the catalog: rows naming a lesson
    /// mark it completed, rows without one only carry the percentage (which
    /// matters for courses served without a lesson list).
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` on API or storage failures.
    pub async fn refresh(&self) -> Result<Vec<Course>, CourseServiceError> {
        let dtos: Vec<CourseDto> = self.api.get_json("/courses").await?;
        let mut courses = Vec::with_capacity(dtos.len());
        for dto in dtos {
            courses.push(dto.into_course()?);
        }

        let progress: Vec<ProgressDto> = self.api.get_json("/user/progress").await?;
        apply_progress(&mut courses, &progress);

        for course in &courses {
            self.courses.upsert_course(course).await?;
        }
        tracing::info!(count = courses.len(), "course catalog refreshed");
        Ok(courses)
    }

    /// Lists locally stored courses, refreshing from the API when the store
    /// is empty (first launch).
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` on storage failures, or API failures when
    /// a first-launch refresh is needed.
    pub async fn list(&self) -> Result<Vec<Course>, CourseServiceError> {
        let courses = self.courses.list_courses().await?;
        if !courses.is_empty() {
            return Ok(courses);
        }
        self.refresh().await
    }

    /// Fetches one course, preferring the local copy, and records the access
    /// time for the continue-learning ordering.
    ///
    /// A local copy without lessons (from a list payload) is upgraded via the
    /// detail endpoint when the API is reachable.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::UnknownCourse` when the course exists
    /// neither locally nor remotely.
    pub async fn course(&self, id: &CourseId) -> Result<Course, CourseServiceError> {
        let local = self.courses.get_course(id).await?;

        let course = match local {
            Some(course) if !course.lessons().is_empty() => course,
            local => match self.fetch_course(id).await {
                Ok(course) => {
                    self.courses.upsert_course(&course).await?;
                    course
                }
                Err(err) => match local {
                    Some(course) => {
                        tracing::warn!(course = %id, error = %err, "detail fetch failed, serving local copy");
                        course
                    }
                    None => return Err(map_missing(id, err)),
                },
            },
        };

        self.touch(id);
        Ok(course)
    }

    async fn fetch_course(&self, id: &CourseId) -> Result<Course, ApiError> {
        let dto: CourseDto = self.api.get_json(&format!("/courses/{id}")).await?;
        dto.into_course()
    }

    /// Marks a lesson completed and persists the recomputed progress.
    ///
    /// Completion is monotonic: completing an already-completed lesson is a
    /// no-op that returns the current progress. The update is pushed to the
    /// server best-effort.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` when the course or lesson is unknown or
    /// the local store fails.
    pub async fn complete_lesson(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<u8, CourseServiceError> {
        let mut course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or_else(|| CourseServiceError::UnknownCourse(course_id.clone()))?;

        let already_done = course
            .lesson(lesson_id)
            .is_some_and(defenzo_core::model::Lesson::completed);
        let progress = course.set_lesson_completed(lesson_id, true)?;
        if !already_done {
            self.courses.upsert_course(&course).await?;
            self.push_progress(&course, Some(lesson_id)).await;
        }
        self.touch(course_id);
        Ok(progress)
    }

    /// Records a quiz score locally and reports course progress upstream.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` on storage failures.
    pub async fn record_quiz_score(
        &self,
        course_id: &CourseId,
        score: f64,
    ) -> Result<(), CourseServiceError> {
        self.quiz_results
            .record_quiz_result(&QuizResultRecord {
                course_id: course_id.clone(),
                score,
                taken_at: self.clock.now(),
            })
            .await?;
        if let Some(course) = self.courses.get_course(course_id).await? {
            self.push_progress(&course, None).await;
        }
        Ok(())
    }

    /// Up to three unstarted courses for the home screen.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` on storage failures.
    pub async fn recommendations(
        &self,
        preferred_categories: &[String],
    ) -> Result<Vec<Course>, CourseServiceError> {
        let courses = self.courses.list_courses().await?;
        let profile = self.learner_profile(preferred_categories);
        Ok(recommended_courses(&courses, &profile)
            .into_iter()
            .cloned()
            .collect())
    }

    /// In-progress courses, most worth resuming first.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` on storage failures.
    pub async fn continue_learning(&self) -> Result<Vec<Course>, CourseServiceError> {
        let courses = self.courses.list_courses().await?;
        let profile = self.learner_profile(&[]);
        Ok(continue_learning_courses(&courses, &profile, self.clock.now())
            .into_iter()
            .cloned()
            .collect())
    }

    fn learner_profile(&self, preferred_categories: &[String]) -> LearnerProfile {
        let last_accessed = self
            .last_accessed
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        LearnerProfile {
            preferred_categories: preferred_categories.to_vec(),
            last_accessed,
        }
    }

    fn touch(&self, id: &CourseId) {
        if let Ok(mut guard) = self.last_accessed.lock() {
            guard.insert(id.clone(), self.clock.now());
        }
    }

    async fn push_progress(&self, course: &Course, lesson_id: Option<&LessonId>) {
        let update = ProgressUpdate {
            course_id: course.id().to_string(),
            lesson_id: lesson_id.map(ToString::to_string),
            completed: course.is_completed(),
            progress: course.progress(),
            last_accessed: self.clock.now(),
        };
        if let Err(err) = self.api.post_json_unit("/user/progress", &update).await {
            tracing::warn!(course = %course.id(), error = %err, "progress push failed, kept locally");
        }
    }
}

fn map_missing(id: &CourseId, err: ApiError) -> CourseServiceError {
    match err {
        ApiError::Status(status) if status == reqwest::StatusCode::NOT_FOUND => {
            CourseServiceError::UnknownCourse(id.clone())
        }
        other => CourseServiceError::Api(other),
    }
}

/// Merges server progress rows into freshly fetched courses.
fn apply_progress(courses: &mut [Course], progress: &[ProgressDto]) {
    for row in progress {
        let Some(course) = courses.iter_mut().find(|c| c.id().as_str() == row.course_id) else {
            tracing::debug!(course = %row.course_id, "progress row for unknown course");
            continue;
        };
        match row.lesson_id.as_deref() {
            Some(lesson_id) if row.completed => {
                let Ok(lesson_id) = lesson_id.parse::<LessonId>() else {
                    continue;
                };
                if course.set_lesson_completed(&lesson_id, true).is_err() {
                    tracing::debug!(course = %row.course_id, lesson = %lesson_id, "progress row for unknown lesson");
                }
            }
            Some(_) => {}
            None => course.set_progress(row.progress),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
