use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::NewMessage;

/// Contact message left by a portfolio visitor.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_name: String,
    pub subject: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Message {
    pub async fn create(db: &PgPool, new: &NewMessage) -> Result<Message, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_name, subject, message)
            VALUES ($1, $2, $3)
            RETURNING id, sender_name, subject, message, created_at
            "#,
        )
        .bind(&new.sender_name)
        .bind(&new.subject)
        .bind(&new.message)
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_name, subject, message, created_at
            FROM messages
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Returns whether a row was removed.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
