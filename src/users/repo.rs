use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{NewUser, ProfileChanges};
use crate::media::Asset;

/// The portfolio owner. Only one is expected to exist.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    #[serde(rename = "portfolioURL")]
    pub portfolio_url: String,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub avatar: Option<Json<Asset>>,
    pub resume: Option<Json<Asset>>,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expires: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// File slots on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAsset {
    Avatar,
    Resume,
}

impl UserAsset {
    fn column(self) -> &'static str {
        match self {
            UserAsset::Avatar => "avatar",
            UserAsset::Resume => "resume",
        }
    }
}

const USER_COLUMNS: &str = r#"
    id, full_name, email, phone, about, password_hash, portfolio_url,
    github_url, linkedin_url, twitter_url, instagram_url, facebook_url,
    avatar, resume, reset_password_token, reset_password_expires, created_at
"#;

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// The sole admin: the earliest registered user.
    pub async fn find_sole_admin(db: &PgPool) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC LIMIT 1"
        ))
        .fetch_optional(db)
        .await
    }

    /// Lookup by reset token digest; expiry is judged by the caller.
    pub async fn find_by_reset_token(
        db: &PgPool,
        token_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE reset_password_token = $1"
        ))
        .bind(token_hash)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        new: &NewUser,
        password_hash: &str,
        avatar: &Asset,
        resume: &Asset,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                full_name, email, phone, about, password_hash, portfolio_url,
                github_url, linkedin_url, twitter_url, instagram_url, facebook_url,
                avatar, resume
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.about)
        .bind(password_hash)
        .bind(&new.portfolio_url)
        .bind(&new.links.github_url)
        .bind(&new.links.linkedin_url)
        .bind(&new.links.twitter_url)
        .bind(&new.links.instagram_url)
        .bind(&new.links.facebook_url)
        .bind(Json(avatar))
        .bind(Json(resume))
        .fetch_one(db)
        .await
    }

    /// Applies the supplied fields; `None` leaves a column untouched.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                full_name     = COALESCE($2, full_name),
                email         = COALESCE($3, email),
                phone         = COALESCE($4, phone),
                about         = COALESCE($5, about),
                portfolio_url = COALESCE($6, portfolio_url),
                github_url    = COALESCE($7, github_url),
                linkedin_url  = COALESCE($8, linkedin_url),
                twitter_url   = COALESCE($9, twitter_url),
                instagram_url = COALESCE($10, instagram_url),
                facebook_url  = COALESCE($11, facebook_url)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.full_name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.about)
        .bind(&changes.portfolio_url)
        .bind(&changes.links.github_url)
        .bind(&changes.links.linkedin_url)
        .bind(&changes.links.twitter_url)
        .bind(&changes.links.instagram_url)
        .bind(&changes.links.facebook_url)
        .fetch_optional(db)
        .await
    }

    /// Writes one asset slot; `None` empties it. Returns whether the user exists.
    pub async fn set_asset(
        db: &PgPool,
        id: Uuid,
        slot: UserAsset,
        asset: Option<&Asset>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!(
            "UPDATE users SET {} = $2 WHERE id = $1",
            slot.column()
        ))
        .bind(id)
        .bind(asset.map(Json))
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stores a new password hash and drops any pending reset token.
    pub async fn set_password(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                password_hash = $2,
                reset_password_token = NULL,
                reset_password_expires = NULL
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(db)
        .await
    }

    pub async fn set_reset_token(
        db: &PgPool,
        id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users SET reset_password_token = $2, reset_password_expires = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn clear_reset_token(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users SET reset_password_token = NULL, reset_password_expires = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }
}
