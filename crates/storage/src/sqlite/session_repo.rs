use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{SessionRepository, StorageError};

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO session (id, token) VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET token = excluded.token
            ",
        )
        .bind(token)
        .execute(self.pool())
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn load_token(&self) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT token FROM session WHERE id = 1")
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;

        row.map(|row| row.try_get::<String, _>("token").map_err(ser))
            .transpose()
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session WHERE id = 1")
            .execute(self.pool())
            .await
            .map_err(conn)?;
        Ok(())
    }
}
