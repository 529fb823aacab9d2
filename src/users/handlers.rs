use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::{
    dto::{
        ForgotPasswordRequest, LoginRequest, RegisterForm, ResetPasswordRequest,
        UpdatePasswordRequest, UpdateProfileForm,
    },
    repo::{User, UserAsset},
};
use crate::{
    auth::{
        cookie::{cleared_cookie, session_cookie},
        password::{hash_password_blocking, verify_password_blocking},
        reset::{hash_reset_token, reset_token_matches, ResetToken},
        AuthUser, JwtKeys,
    },
    email::{password_reset_email, reset_url},
    error::{AppError, AppResult},
    extract::{AppJson, AppPath, MultipartForm},
    media::{
        discard_assets, replace_asset, upload_asset, Asset, UploadedFile, AVATARS, RESUMES,
    },
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid Email or Password";

pub fn user_routes() -> Router<AppState> {
    let uploads = Router::new()
        .route("/register", post(register))
        .route("/update/me", put(update_profile))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)); // 20MB

    Router::new()
        .merge(uploads)
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/me", get(get_me))
        .route("/update/password", put(update_password))
        .route("/me/portfolio", get(get_portfolio))
        .route("/password/forgot", post(forgot_password))
        .route("/password/reset/:token", put(reset_password))
}

/// Signs a session token for `user` and returns it both as the `token`
/// cookie and in the JSON body.
fn token_response(
    state: &AppState,
    user: User,
    message: &str,
    status: StatusCode,
) -> AppResult<Response> {
    let token = JwtKeys::from_config(&state.config.jwt).sign(user.id)?;
    let cookie = session_cookie(&token, state.config.cookie_expires_days);
    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "token": token,
            "message": message,
            "user": user,
        })),
    )
        .into_response())
}

#[instrument(skip(state, form))]
pub async fn register(State(state): State<AppState>, form: MultipartForm) -> AppResult<Response> {
    let RegisterForm {
        user: new_user,
        avatar,
        resume,
    } = RegisterForm::try_from(form)?;

    let password_hash = hash_password_blocking(new_user.password.clone()).await?;

    let avatar = upload_asset(state.media.as_ref(), AVATARS, avatar).await?;
    let resume = match upload_asset(state.media.as_ref(), RESUMES, resume).await {
        Ok(asset) => asset,
        Err(e) => {
            discard_assets(state.media.as_ref(), &[&avatar]).await;
            return Err(e);
        }
    };

    let user = match User::create(&state.db, &new_user, &password_hash, &avatar, &resume).await {
        Ok(user) => user,
        Err(e) => {
            discard_assets(state.media.as_ref(), &[&avatar, &resume]).await;
            return Err(e.into());
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    token_response(&state, user, "User registered successfully", StatusCode::CREATED)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Response> {
    let creds = payload.validate()?;

    let Some(user) = User::find_by_email(&state.db, &creds.email).await? else {
        warn!(email = %creds.email, "login unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password_blocking(creds.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    info!(user_id = %user.id, "user logged in");
    token_response(&state, user, "User logged in successfully", StatusCode::OK)
}

#[instrument(skip_all)]
pub async fn logout(AuthUser(user): AuthUser) -> impl IntoResponse {
    info!(user_id = %user.id, "user logged out");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cleared_cookie())],
        Json(json!({
            "success": true,
            "message": "Logged Out",
        })),
    )
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "user": user,
    }))
}

/// Replaces one file slot of `user`, writing the slot as soon as the new
/// file is hosted.
async fn replace_user_asset(
    state: &AppState,
    user: &User,
    slot: UserAsset,
    folder: &str,
    file: UploadedFile,
) -> AppResult<Asset> {
    let previous = match slot {
        UserAsset::Avatar => user.avatar.as_deref(),
        UserAsset::Resume => user.resume.as_deref(),
    };
    let db = &state.db;
    let user_id = user.id;
    replace_asset(state.media.as_ref(), previous, folder, file, move |asset| async move {
        if User::set_asset(db, user_id, slot, asset.as_ref()).await? {
            Ok(())
        } else {
            Err(AppError::not_found("User not found"))
        }
    })
    .await
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    form: MultipartForm,
) -> AppResult<Json<serde_json::Value>> {
    let UpdateProfileForm {
        changes,
        avatar,
        resume,
    } = UpdateProfileForm::try_from(form)?;

    if let Some(file) = avatar {
        replace_user_asset(&state, &user, UserAsset::Avatar, AVATARS, file).await?;
    }
    if let Some(file) = resume {
        replace_user_asset(&state, &user, UserAsset::Resume, RESUMES, file).await?;
    }

    let updated = User::update_profile(&state.db, user.id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!("profile updated");
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": updated,
    })))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<UpdatePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let change = payload.validate()?;

    if !verify_password_blocking(change.current, user.password_hash.clone()).await? {
        return Err(AppError::bad_request("Current password is incorrect"));
    }
    if change.new != change.confirm {
        return Err(AppError::bad_request(
            "New password and confirm password do not match",
        ));
    }

    let hash = hash_password_blocking(change.new).await?;
    User::set_password(&state.db, user.id, &hash)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!("password updated");
    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully",
    })))
}

/// Public profile: the configured portfolio owner, else the sole admin.
#[instrument(skip(state))]
pub async fn get_portfolio(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let user = match state.config.portfolio_user_id {
        Some(id) => User::find_by_id(&state.db, id).await?,
        None => User::find_sole_admin(&state.db).await?,
    }
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(json!({
        "success": true,
        "user": user,
    })))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ForgotPasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let email = payload.validate()?;
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let token = ResetToken::generate(OffsetDateTime::now_utc());
    User::set_reset_token(&state.db, user.id, &token.hash, token.expires_at).await?;

    let url = reset_url(&state.config.dashboard_url, &token.raw);
    if let Err(e) = state
        .mailer
        .send(password_reset_email(&user.email, &url))
        .await
    {
        error!(error = ?e, user_id = %user.id, "reset email failed; clearing token");
        User::clear_reset_token(&state.db, user.id).await?;
        return Err(AppError::Upstream(format!("{e:#}")));
    }

    info!(user_id = %user.id, "password reset email sent");
    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Email sent to {} your account, please check your email inbox",
            user.email
        ),
    })))
}

#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    AppPath(raw_token): AppPath<String>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> AppResult<Response> {
    let password = payload.validate()?;

    let invalid = || AppError::bad_request("Reset Password Token is invalid or has expired");
    let user = User::find_by_reset_token(&state.db, &hash_reset_token(&raw_token))
        .await?
        .ok_or_else(invalid)?;
    if !reset_token_matches(
        &raw_token,
        user.reset_password_token.as_deref(),
        user.reset_password_expires,
        OffsetDateTime::now_utc(),
    ) {
        warn!(user_id = %user.id, "expired reset token presented");
        return Err(invalid());
    }

    let hash = hash_password_blocking(password).await?;
    let user = User::set_password(&state.db, user.id, &hash)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!(user_id = %user.id, "password reset");
    token_response(&state, user, "Password reset successful", StatusCode::OK)
}
