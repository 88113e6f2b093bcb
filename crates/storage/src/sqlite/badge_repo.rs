use defenzo_core::model::{Badge, BadgeRequirement, UserBadge};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{badge_id, conn, ser};
use crate::repository::{BadgeRepository, StorageError};

#[async_trait::async_trait]
impl BadgeRepository for SqliteRepository {
    async fn replace_user_badges(&self, badges: &[UserBadge]) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM user_badges")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, ub) in badges.iter().enumerate() {
            let badge = ub.badge();
            sqlx::query(
                r"
                INSERT INTO user_badges
                    (badge_id, name, description, icon, category,
                     requirement_type, requirement_value, position,
                     progress, completed, awarded_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ",
            )
            .bind(badge.id.as_str())
            .bind(&badge.name)
            .bind(&badge.description)
            .bind(&badge.icon)
            .bind(&badge.category)
            .bind(&badge.requirement.kind)
            .bind(badge.requirement.value.map(i64::from))
            .bind(i64::try_from(position).map_err(ser)?)
            .bind(i64::from(ub.progress()))
            .bind(i64::from(ub.completed()))
            .bind(ub.awarded_at())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)
    }

    async fn list_user_badges(&self) -> Result<Vec<UserBadge>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT badge_id, name, description, icon, category,
                   requirement_type, requirement_value, progress, completed, awarded_at
            FROM user_badges
            ORDER BY position ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        let mut badges = Vec::with_capacity(rows.len());
        for row in rows {
            badges.push(user_badge_from_row(&row)?);
        }
        Ok(badges)
    }
}

fn user_badge_from_row(row: &SqliteRow) -> Result<UserBadge, StorageError> {
    let value = row
        .try_get::<Option<i64>, _>("requirement_value")
        .map_err(ser)?
        .map(u32::try_from)
        .transpose()
        .map_err(|_| StorageError::Serialization("requirement_value overflow".into()))?;

    let badge = Badge {
        id: badge_id(row.try_get::<String, _>("badge_id").map_err(ser)?.as_str())?,
        name: row.try_get::<String, _>("name").map_err(ser)?,
        description: row.try_get::<String, _>("description").map_err(ser)?,
        icon: row.try_get::<String, _>("icon").map_err(ser)?,
        category: row.try_get::<String, _>("category").map_err(ser)?,
        requirement: BadgeRequirement {
            kind: row.try_get::<String, _>("requirement_type").map_err(ser)?,
            value,
        },
    };

    Ok(UserBadge::new(
        badge,
        row.try_get::<i64, _>("progress").map_err(ser)?,
        row.try_get::<i64, _>("completed").map_err(ser)? != 0,
        row.try_get("awarded_at").map_err(ser)?,
    ))
}
