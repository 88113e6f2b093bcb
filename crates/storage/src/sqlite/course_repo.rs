use defenzo_core::model::{Course, CourseId, CourseLevel, Lesson};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{
    conn, content_from_json, content_to_json, course_id, lesson_id, ser, tags_from_json,
    tags_to_json,
};
use crate::repository::{CourseRepository, StorageError};

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO courses (id, title, description, category, level, duration, tags, image, progress)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                category = excluded.category,
                level = excluded.level,
                duration = excluded.duration,
                tags = excluded.tags,
                image = excluded.image,
                progress = excluded.progress
            ",
        )
        .bind(course.id().as_str())
        .bind(course.title())
        .bind(course.description())
        .bind(course.category())
        .bind(course.level().as_str())
        .bind(course.duration())
        .bind(tags_to_json(course.tags())?)
        .bind(course.image())
        .bind(i64::from(course.progress()))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // Lessons are replaced wholesale; the course owns its lesson list.
        sqlx::query("DELETE FROM lessons WHERE course_id = ?1")
            .bind(course.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, lesson) in course.lessons().iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO lessons (id, course_id, position, title, duration, lesson_type, content, completed)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
            )
            .bind(lesson.id().as_str())
            .bind(course.id().as_str())
            .bind(i64::try_from(position).map_err(ser)?)
            .bind(lesson.title())
            .bind(lesson.duration())
            .bind(lesson.lesson_type().as_str())
            .bind(content_to_json(lesson.content())?)
            .bind(i64::from(lesson.completed()))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, category, level, duration, tags, image, progress
            FROM courses WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(conn)?;

        match row {
            Some(row) => {
                let lessons = self.lessons_for(id).await?;
                course_from_row(&row, lessons).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, category, level, duration, tags, image, progress
            FROM courses
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            let id = course_id(row.try_get::<String, _>("id").map_err(ser)?.as_str())?;
            let lessons = self.lessons_for(&id).await?;
            courses.push(course_from_row(&row, lessons)?);
        }
        Ok(courses)
    }
}

impl SqliteRepository {
    async fn lessons_for(&self, course: &CourseId) -> Result<Vec<Lesson>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, duration, content, completed
            FROM lessons
            WHERE course_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(course.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        let mut lessons = Vec::with_capacity(rows.len());
        for row in rows {
            lessons.push(lesson_from_row(&row)?);
        }
        Ok(lessons)
    }
}

fn lesson_from_row(row: &SqliteRow) -> Result<Lesson, StorageError> {
    let content = content_from_json(row.try_get::<String, _>("content").map_err(ser)?.as_str())?;
    Lesson::from_persisted(
        lesson_id(row.try_get::<String, _>("id").map_err(ser)?.as_str())?,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("duration").map_err(ser)?,
        content,
        row.try_get::<i64, _>("completed").map_err(ser)? != 0,
    )
    .map_err(ser)
}

fn course_from_row(row: &SqliteRow, lessons: Vec<Lesson>) -> Result<Course, StorageError> {
    let level: CourseLevel = row
        .try_get::<String, _>("level")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;

    Course::from_persisted(
        course_id(row.try_get::<String, _>("id").map_err(ser)?.as_str())?,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
        row.try_get::<String, _>("category").map_err(ser)?,
        level,
        row.try_get::<String, _>("duration").map_err(ser)?,
        tags_from_json(row.try_get::<String, _>("tags").map_err(ser)?.as_str())?,
        row.try_get::<Option<String>, _>("image").map_err(ser)?,
        row.try_get::<i64, _>("progress").map_err(ser)?,
        lessons,
    )
    .map_err(ser)
}
