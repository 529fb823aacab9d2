use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::media::Asset;

/// A tool shown in the portfolio's "software I use" section.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareApplication {
    pub id: Uuid,
    pub name: String,
    pub svg: Option<Json<Asset>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl SoftwareApplication {
    pub async fn create(
        db: &PgPool,
        name: &str,
        svg: &Asset,
    ) -> Result<SoftwareApplication, sqlx::Error> {
        sqlx::query_as::<_, SoftwareApplication>(
            r#"
            INSERT INTO software_applications (name, svg)
            VALUES ($1, $2)
            RETURNING id, name, svg, created_at
            "#,
        )
        .bind(name)
        .bind(Json(svg))
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> Result<Vec<SoftwareApplication>, sqlx::Error> {
        sqlx::query_as::<_, SoftwareApplication>(
            "SELECT id, name, svg, created_at FROM software_applications ORDER BY created_at ASC",
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Option<SoftwareApplication>, sqlx::Error> {
        sqlx::query_as::<_, SoftwareApplication>(
            "SELECT id, name, svg, created_at FROM software_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM software_applications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
