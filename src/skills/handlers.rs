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
    dto::{AddSkillForm, UpdateSkillRequest},
    repo::Skill,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{AppJson, AppPath, MultipartForm},
    media::{destroy_asset, discard_assets, upload_asset, SKILL_SVGS},
    state::AppState,
};

pub fn skill_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/add",
            post(add_skill).layer(DefaultBodyLimit::max(20 * 1024 * 1024)),
        )
        .route("/delete/:id", delete(delete_skill))
        .route("/update/:id", put(update_skill))
        .route("/getall", get(get_all_skills))
}

fn not_found() -> AppError {
    AppError::not_found("Skill not found")
}

#[instrument(skip_all)]
pub async fn add_skill(
    State(state): State<AppState>,
    _user: AuthUser,
    form: MultipartForm,
) -> AppResult<(StatusCode, Json<Value>)> {
    let AddSkillForm { skill, svg } = AddSkillForm::try_from(form)?;

    let svg = upload_asset(state.media.as_ref(), SKILL_SVGS, svg).await?;
    let skill = match Skill::create(&state.db, &skill, &svg).await {
        Ok(skill) => skill,
        Err(e) => {
            discard_assets(state.media.as_ref(), &[&svg]).await;
            return Err(e.into());
        }
    };

    info!(skill_id = %skill.id, title = %skill.title, "skill created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "New Skill Added",
            "skill": skill,
        })),
    ))
}

#[instrument(skip(state, _user, payload))]
pub async fn update_skill(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateSkillRequest>,
) -> AppResult<Json<Value>> {
    let proficiency = payload.validate()?;
    let skill = Skill::set_proficiency(&state.db, id, &proficiency)
        .await?
        .ok_or_else(not_found)?;

    info!(skill_id = %id, "skill updated");
    Ok(Json(json!({
        "success": true,
        "message": "Skill updated",
        "skill": skill,
    })))
}

#[instrument(skip(state, _user))]
pub async fn delete_skill(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    let skill = Skill::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    if let Some(svg) = skill.svg.as_deref() {
        destroy_asset(state.media.as_ref(), svg).await?;
    }
    if !Skill::delete(&state.db, id).await? {
        return Err(not_found());
    }

    info!(skill_id = %id, "skill deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Skill deleted",
    })))
}

#[instrument(skip(state))]
pub async fn get_all_skills(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let skills = Skill::list(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Skills fetched successfully",
        "skill": skills,
    })))
}
