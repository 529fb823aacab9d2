use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{AddProjectForm, UpdateProjectForm},
    repo::Project,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{AppPath, MultipartForm},
    media::{destroy_asset, discard_assets, replace_asset, upload_asset, PROJECT_IMAGES},
    state::AppState,
};

pub fn project_routes() -> Router<AppState> {
    let uploads = Router::new()
        .route("/add", post(add_project))
        .route("/update/:id", put(update_project))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)); // 20MB

    Router::new()
        .merge(uploads)
        .route("/delete/:id", delete(delete_project))
        .route("/getall", get(get_all_projects))
        .route("/get/:id", get(get_project))
}

fn not_found() -> AppError {
    AppError::not_found("Project not found")
}

#[instrument(skip_all)]
pub async fn add_project(
    State(state): State<AppState>,
    _user: AuthUser,
    form: MultipartForm,
) -> AppResult<(StatusCode, Json<Value>)> {
    let AddProjectForm { project, banner } = AddProjectForm::try_from(form)?;

    let banner = upload_asset(state.media.as_ref(), PROJECT_IMAGES, banner).await?;
    let project = match Project::create(&state.db, &project, &banner).await {
        Ok(project) => project,
        Err(e) => {
            discard_assets(state.media.as_ref(), &[&banner]).await;
            return Err(e.into());
        }
    };

    info!(project_id = %project.id, "project created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "project": project,
            "message": "New Project Added successfully",
        })),
    ))
}

#[instrument(skip(state, _user, form))]
pub async fn update_project(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    form: MultipartForm,
) -> AppResult<Json<Value>> {
    let UpdateProjectForm { changes, banner } = UpdateProjectForm::try_from(form)?;

    let current = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    if let Some(file) = banner {
        let db = &state.db;
        replace_asset(
            state.media.as_ref(),
            current.project_banner.as_deref(),
            PROJECT_IMAGES,
            file,
            move |asset| async move {
                if Project::set_banner(db, id, asset.as_ref()).await? {
                    Ok(())
                } else {
                    Err(not_found())
                }
            },
        )
        .await?;
    }

    let project = Project::update(&state.db, id, &changes)
        .await?
        .ok_or_else(not_found)?;

    info!(project_id = %id, "project updated");
    Ok(Json(json!({
        "success": true,
        "message": "Project updated successfully",
        "project": project,
    })))
}

#[instrument(skip(state, _user))]
pub async fn delete_project(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    if let Some(banner) = project.project_banner.as_deref() {
        destroy_asset(state.media.as_ref(), banner).await?;
    }
    if !Project::delete(&state.db, id).await? {
        return Err(not_found());
    }

    info!(project_id = %id, "project deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Project deleted successfully",
    })))
}

#[instrument(skip(state))]
pub async fn get_all_projects(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let projects = Project::list(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Projects fetched successfully",
        "project": projects,
    })))
}

#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(json!({
        "success": true,
        "message": "Project fetched successfully",
        "project": project,
    })))
}
