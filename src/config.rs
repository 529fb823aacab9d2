use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expires_days: i64,
}

/// S3-compatible bucket that hosts avatars, resumes, icons and banners.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub enum EmailTransportConfig {
    Smtp {
        host: String,
        port: u16,
        username: String,
        password: String,
    },
    File {
        path: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub from: String,
    pub transport: EmailTransportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cookie_expires_days: i64,
    pub dashboard_url: String,
    pub portfolio_user_id: Option<Uuid>,
    pub media: MediaConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "portfolio".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "portfolio-dashboard".into()),
            expires_days: parsed("JWT_EXPIRES_DAYS").unwrap_or(7),
        };

        let portfolio_user_id = match std::env::var("PORTFOLIO_USER_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<Uuid>()
                    .context("PORTFOLIO_USER_ID must be a uuid")?,
            ),
            _ => None,
        };

        let endpoint = required("MEDIA_ENDPOINT")?;
        let bucket = required("MEDIA_BUCKET")?;
        let public_url = std::env::var("MEDIA_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
        let media = MediaConfig {
            access_key: required("MEDIA_ACCESS_KEY")?,
            secret_key: required("MEDIA_SECRET_KEY")?,
            region: std::env::var("MEDIA_REGION").unwrap_or_else(|_| "us-east-1".into()),
            public_url: public_url.trim_end_matches('/').to_string(),
            endpoint,
            bucket,
        };

        let transport = match std::env::var("EMAIL_TRANSPORT").as_deref() {
            Ok("file") => EmailTransportConfig::File {
                path: std::env::var("EMAIL_FILE_DIR").unwrap_or_else(|_| "./emails".into()),
            },
            _ => EmailTransportConfig::Smtp {
                host: required("SMTP_HOST")?,
                port: parsed("SMTP_PORT").unwrap_or(587),
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
            },
        };
        let email = EmailConfig {
            from: required("EMAIL_FROM")?,
            transport,
        };

        Ok(Self {
            database_url,
            jwt,
            cookie_expires_days: parsed("COOKIE_EXPIRES_DAYS").unwrap_or(7),
            dashboard_url: required("DASHBOARD_URL")?
                .trim_end_matches('/')
                .to_string(),
            portfolio_user_id,
            media,
            email,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
