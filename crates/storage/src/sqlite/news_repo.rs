use defenzo_core::model::{NewsArticle, NewsCategory};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{conn, news_category, ser};
use crate::repository::{NewsRepository, StorageError};

#[async_trait::async_trait]
impl NewsRepository for SqliteRepository {
    async fn replace_articles(&self, articles: &[NewsArticle]) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM news_articles")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, article) in articles.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO news_articles
                    (id, position, title, summary, category, date, read_time, image_url, likes, comments)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ",
            )
            .bind(&article.id)
            .bind(i64::try_from(position).map_err(ser)?)
            .bind(&article.title)
            .bind(&article.summary)
            .bind(article.category.as_str())
            .bind(&article.date)
            .bind(&article.read_time)
            .bind(article.image_url.as_deref())
            .bind(i64::from(article.likes))
            .bind(i64::from(article.comments))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)
    }

    async fn list_articles(
        &self,
        category: Option<NewsCategory>,
    ) -> Result<Vec<NewsArticle>, StorageError> {
        let rows = match category {
            Some(category) => {
                sqlx::query(
                    r"
                    SELECT id, title, summary, category, date, read_time, image_url, likes, comments
                    FROM news_articles
                    WHERE category = ?1
                    ORDER BY position ASC
                    ",
                )
                .bind(category.as_str())
                .fetch_all(self.pool())
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, title, summary, category, date, read_time, image_url, likes, comments
                    FROM news_articles
                    ORDER BY position ASC
                    ",
                )
                .fetch_all(self.pool())
                .await
            }
        }
        .map_err(conn)?;

        let mut articles = Vec::with_capacity(rows.len());
        for row in rows {
            articles.push(article_from_row(&row)?);
        }
        Ok(articles)
    }
}

fn article_from_row(row: &SqliteRow) -> Result<NewsArticle, StorageError> {
    let likes = u32::try_from(row.try_get::<i64, _>("likes").map_err(ser)?)
        .map_err(|_| StorageError::Serialization("likes overflow".into()))?;
    let comments = u32::try_from(row.try_get::<i64, _>("comments").map_err(ser)?)
        .map_err(|_| StorageError::Serialization("comments overflow".into()))?;

    Ok(NewsArticle {
        id: row.try_get::<String, _>("id").map_err(ser)?,
        title: row.try_get::<String, _>("title").map_err(ser)?,
        summary: row.try_get::<String, _>("summary").map_err(ser)?,
        category: news_category(row.try_get::<String, _>("category").map_err(ser)?.as_str())?,
        date: row.try_get::<String, _>("date").map_err(ser)?,
        read_time: row.try_get::<String, _>("read_time").map_err(ser)?,
        image_url: row.try_get::<Option<String>, _>("image_url").map_err(ser)?,
        likes,
        comments,
    })
}
