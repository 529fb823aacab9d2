use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::NewTimeline;

#[derive(Debug, FromRow)]
pub struct TimelineRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub timeline_from: String,
    pub timeline_to: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// A career or education entry; `timeline.to` is absent while ongoing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub timeline: Period,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<TimelineRow> for Timeline {
    fn from(r: TimelineRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            timeline: Period {
                from: r.timeline_from,
                to: r.timeline_to,
            },
            created_at: r.created_at,
        }
    }
}

impl Timeline {
    pub async fn create(db: &PgPool, new: &NewTimeline) -> Result<Timeline, sqlx::Error> {
        let row = sqlx::query_as::<_, TimelineRow>(
            r#"
            INSERT INTO timelines (title, description, timeline_from, timeline_to)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, timeline_from, timeline_to, created_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.from)
        .bind(&new.to)
        .fetch_one(db)
        .await?;
        Ok(row.into())
    }

    pub async fn list(db: &PgPool) -> Result<Vec<Timeline>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TimelineRow>(
            r#"
            SELECT id, title, description, timeline_from, timeline_to, created_at
            FROM timelines
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Timeline::from).collect())
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM timelines WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
