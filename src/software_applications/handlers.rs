use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::AddApplicationForm, repo::SoftwareApplication};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{AppPath, MultipartForm},
    media::{destroy_asset, discard_assets, upload_asset, APPLICATION_SVGS},
    state::AppState,
};

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/add",
            post(add_application).layer(DefaultBodyLimit::max(20 * 1024 * 1024)),
        )
        .route("/delete/:id", delete(delete_application))
        .route("/getall", get(get_all_applications))
}

#[instrument(skip_all)]
pub async fn add_application(
    State(state): State<AppState>,
    _user: AuthUser,
    form: MultipartForm,
) -> AppResult<(StatusCode, Json<Value>)> {
    let AddApplicationForm { name, svg } = AddApplicationForm::try_from(form)?;

    let svg = upload_asset(state.media.as_ref(), APPLICATION_SVGS, svg).await?;
    let application = match SoftwareApplication::create(&state.db, &name, &svg).await {
        Ok(application) => application,
        Err(e) => {
            discard_assets(state.media.as_ref(), &[&svg]).await;
            return Err(e.into());
        }
    };

    info!(application_id = %application.id, name = %application.name, "software application created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "New Software Application Added",
            "softwareApplication": application,
        })),
    ))
}

#[instrument(skip(state, _user))]
pub async fn delete_application(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    let not_found = || AppError::not_found("Software Application not found");
    let application = SoftwareApplication::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    if let Some(svg) = application.svg.as_deref() {
        destroy_asset(state.media.as_ref(), svg).await?;
    }
    if !SoftwareApplication::delete(&state.db, id).await? {
        return Err(not_found());
    }

    info!(application_id = %id, "software application deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Software Application deleted",
    })))
}

#[instrument(skip(state))]
pub async fn get_all_applications(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let applications = SoftwareApplication::list(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Software Applications fetched successfully",
        "softwareApplication": applications,
    })))
}
