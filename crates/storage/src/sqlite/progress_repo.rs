use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{QuizResultRecord, QuizResultRepository, StorageError};

#[async_trait::async_trait]
impl QuizResultRepository for SqliteRepository {
    async fn record_quiz_result(&self, result: &QuizResultRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO quiz_results (course_id, score, taken_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(result.course_id.as_str())
        .bind(result.score)
        .bind(result.taken_at)
        .execute(self.pool())
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn quiz_scores(&self) -> Result<Vec<f64>, StorageError> {
        let rows = sqlx::query("SELECT score FROM quiz_results ORDER BY taken_at ASC, id ASC")
            .fetch_all(self.pool())
            .await
            .map_err(conn)?;

        rows.iter()
            .map(|row| row.try_get::<f64, _>("score").map_err(ser))
            .collect()
    }
}
