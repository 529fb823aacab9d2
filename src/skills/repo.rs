use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::NewSkill;
use crate::media::Asset;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub title: String,
    pub proficiency: String,
    pub svg: Option<Json<Asset>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Skill {
    pub async fn create(db: &PgPool, new: &NewSkill, svg: &Asset) -> Result<Skill, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (title, proficiency, svg)
            VALUES ($1, $2, $3)
            RETURNING id, title, proficiency, svg, created_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.proficiency)
        .bind(Json(svg))
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> Result<Vec<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, title, proficiency, svg, created_at
            FROM skills
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            "SELECT id, title, proficiency, svg, created_at FROM skills WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn set_proficiency(
        db: &PgPool,
        id: Uuid,
        proficiency: &str,
    ) -> Result<Option<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            r#"
            UPDATE skills SET proficiency = $2
            WHERE id = $1
            RETURNING id, title, proficiency, svg, created_at
            "#,
        )
        .bind(id)
        .bind(proficiency)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
