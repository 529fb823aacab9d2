//! Outbound mail for password recovery.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::{EmailConfig, EmailTransportConfig};

pub const RESET_SUBJECT: &str = "personal portfolio Dashboard Recovery password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()>;
}

pub fn reset_url(dashboard_url: &str, raw_token: &str) -> String {
    format!("{}/password/reset/{}", dashboard_url.trim_end_matches('/'), raw_token)
}

pub fn password_reset_email(to: &str, reset_url: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: RESET_SUBJECT.to_string(),
        body: format!(
            "Your Reset Password Token is:- \n\n {reset_url} \n\n If you haven't requested this please ignore it"
        ),
    }
}

enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

pub struct LettreMailer {
    transport: Transport,
    from: Mailbox,
}

impl LettreMailer {
    pub fn new(cfg: &EmailConfig) -> anyhow::Result<Self> {
        let from = cfg.from.parse::<Mailbox>().context("parse EMAIL_FROM")?;
        let transport = match &cfg.transport {
            EmailTransportConfig::Smtp {
                host,
                port,
                username,
                password,
            } => {
                let smtp = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .context("create SMTP transport")?
                    .port(*port)
                    .credentials(Credentials::new(username.clone(), password.clone()))
                    .build();
                Transport::Smtp(smtp)
            }
            EmailTransportConfig::File { path } => {
                let dir = Path::new(path);
                if !dir.exists() {
                    std::fs::create_dir_all(dir).context("create emails directory")?;
                }
                warn!(path = %path, "using file email transport; mail is not delivered");
                Transport::File(AsyncFileTransport::<Tokio1Executor>::new(dir))
            }
        };
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for LettreMailer {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()> {
        let to = email.to.parse::<Mailbox>().context("parse recipient")?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .context("build email message")?;

        match &self.transport {
            Transport::Smtp(smtp) => {
                smtp.send(message).await.context("send SMTP email")?;
            }
            Transport::File(file) => {
                file.send(message).await.context("write email file")?;
            }
        }
        info!(to = %email.to, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_url_joins_dashboard_base() {
        assert_eq!(
            reset_url("https://dash.example.com/", "abc123"),
            "https://dash.example.com/password/reset/abc123"
        );
    }

    #[test]
    fn reset_email_embeds_url() {
        let mail = password_reset_email("me@example.com", "https://d/password/reset/t");
        assert_eq!(mail.to, "me@example.com");
        assert_eq!(mail.subject, RESET_SUBJECT);
        assert!(mail.body.contains("https://d/password/reset/t"));
    }

    #[tokio::test]
    async fn file_transport_writes_message() {
        let dir = std::env::temp_dir().join(format!("portfolio-mail-{}", uuid::Uuid::new_v4()));
        let mailer = LettreMailer::new(&EmailConfig {
            from: "Portfolio <noreply@example.com>".into(),
            transport: EmailTransportConfig::File {
                path: dir.to_string_lossy().into_owned(),
            },
        })
        .unwrap();

        mailer
            .send(password_reset_email("me@example.com", "https://d/password/reset/t"))
            .await
            .unwrap();

        let written = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(written, 1);
        std::fs::remove_dir_all(&dir).ok();
    }
}
