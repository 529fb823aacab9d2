use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{NewProject, ProjectChanges};
use crate::media::Asset;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub git_repo_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: bool,
    pub project_banner: Option<Json<Asset>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const PROJECT_COLUMNS: &str = r#"
    id, title, description, git_repo_link, project_link, technologies, stack,
    deployed, project_banner, created_at
"#;

impl Project {
    pub async fn create(
        db: &PgPool,
        new: &NewProject,
        banner: &Asset,
    ) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects
                (title, description, git_repo_link, project_link, technologies, stack,
                 deployed, project_banner)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.git_repo_link)
        .bind(&new.project_link)
        .bind(&new.technologies)
        .bind(&new.stack)
        .bind(new.deployed)
        .bind(Json(banner))
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at ASC"
        ))
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Applies the supplied fields; `None` keeps the stored value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET
                title         = COALESCE($2, title),
                description   = COALESCE($3, description),
                git_repo_link = COALESCE($4, git_repo_link),
                project_link  = COALESCE($5, project_link),
                technologies  = COALESCE($6, technologies),
                stack         = COALESCE($7, stack),
                deployed      = COALESCE($8, deployed)
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.git_repo_link)
        .bind(&changes.project_link)
        .bind(&changes.technologies)
        .bind(&changes.stack)
        .bind(changes.deployed)
        .fetch_optional(db)
        .await
    }

    /// `None` empties the banner slot. Returns whether the project exists.
    pub async fn set_banner(
        db: &PgPool,
        id: Uuid,
        banner: Option<&Asset>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET project_banner = $2 WHERE id = $1")
            .bind(id)
            .bind(banner.map(Json))
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
