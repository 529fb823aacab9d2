use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::AddTimelineRequest, repo::Timeline};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn timeline_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_timeline))
        .route("/delete/:id", delete(delete_timeline))
        .route("/getall", get(get_all_timelines))
}

#[instrument(skip_all)]
pub async fn add_timeline(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(payload): AppJson<AddTimelineRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let new = payload.validate()?;
    let timeline = Timeline::create(&state.db, &new).await?;
    info!(timeline_id = %timeline.id, "timeline created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Timeline created successfully",
            "newTimeline": timeline,
        })),
    ))
}

#[instrument(skip(state, _user))]
pub async fn delete_timeline(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    if !Timeline::delete(&state.db, id).await? {
        return Err(AppError::not_found("Timeline not Found"));
    }
    info!(timeline_id = %id, "timeline deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Timeline deleted successfully",
    })))
}

#[instrument(skip(state))]
pub async fn get_all_timelines(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let timelines = Timeline::list(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Timelines fetched successfully",
        "timelines": timelines,
    })))
}


#[cfg(test)]
mod db_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    use crate::{app::build_app, test_utils::*, users::repo::tests_support::seed_admin};

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn timeline_lifecycle(pool: PgPool) {
        let state = state_with(
            pool.clone(),
            Arc::new(FakeMediaStore::default()),
            Arc::new(FakeMailer::default()),
        );
        let admin = seed_admin(&pool, "admin@example.com", "Secur3P@ss").await;
        let token = token_for(&state, admin.id);
        let app = build_app(state);

        let add = |body| authed(json_request("POST", "/api/v1/timeline/add", body), &token);
        let (status, body) = send(&app, add(json!({ "title": "Job" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "description required");

        let (status, body) = send(
            &app,
            add(json!({ "title": "Job", "description": "Dev", "from": "2021", "to": "2023" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["newTimeline"]["timeline"], json!({ "from": "2021", "to": "2023" }));
        let id = body["newTimeline"]["id"].as_str().unwrap().to_string();

        let (_, body) = send(&app, empty_request("GET", "/api/v1/timeline/getall")).await;
        assert_eq!(body["timelines"].as_array().unwrap().len(), 1);

        let delete = || {
            authed(
                empty_request("DELETE", &format!("/api/v1/timeline/delete/{id}")),
                &token,
            )
        };
        let (status, _) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Timeline not Found");
    }
}
