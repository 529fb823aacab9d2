use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;
use crate::email::{LettreMailer, Mailer};
use crate::media::{MediaStore, S3MediaStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub media: Arc<dyn MediaStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let media = Arc::new(
            S3MediaStore::new(&config.media)
                .await
                .context("init media store")?,
        ) as Arc<dyn MediaStore>;

        let mailer =
            Arc::new(LettreMailer::new(&config.email).context("init mailer")?) as Arc<dyn Mailer>;

        Ok(Self {
            db,
            config,
            media,
            mailer,
        })
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        media: Arc<dyn MediaStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            config,
            media,
            mailer,
        }
    }
}
