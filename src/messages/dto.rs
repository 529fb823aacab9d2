use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::present;

/// Body of `POST /message/send`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendMessageRequest {
    pub sender_name: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_name: String,
    pub subject: String,
    pub message: String,
}

impl SendMessageRequest {
    pub fn validate(self) -> AppResult<NewMessage> {
        match (
            present(self.sender_name),
            present(self.subject),
            present(self.message),
        ) {
            (Some(sender_name), Some(subject), Some(message)) => Ok(NewMessage {
                sender_name,
                subject,
                message,
            }),
            _ => Err(AppError::bad_request("Please fill in all fields")),
        }
    }
}
