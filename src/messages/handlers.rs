use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::SendMessageRequest, repo::Message};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_message))
        .route("/getall", get(get_all_messages))
        .route("/delete/:id", delete(delete_message))
}

#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SendMessageRequest>,
) -> AppResult<Json<Value>> {
    let new = payload.validate()?;
    let data = Message::create(&state.db, &new).await?;
    info!(message_id = %data.id, "message received");
    Ok(Json(json!({
        "success": true,
        "message": "Message Sent",
        "data": data,
    })))
}

#[instrument(skip(state))]
pub async fn get_all_messages(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let messages = Message::list(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "messages": messages,
    })))
}

#[instrument(skip(state, _user))]
pub async fn delete_message(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    if !Message::delete(&state.db, id).await? {
        return Err(AppError::not_found("Message already deleted"));
    }
    info!(message_id = %id, "message deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Message deleted successfully",
    })))
}
