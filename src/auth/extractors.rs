use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{cookie::token_from_headers, jwt::JwtKeys};
use crate::{error::AppError, state::AppState, users::repo::User};

/// The authenticated admin, loaded from the `token` cookie.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".into()))?;

        let claims = JwtKeys::from_ref(state).verify(&token)?;

        let user = User::find_by_id(&state.db, claims.sub).await?.ok_or_else(|| {
            warn!(user_id = %claims.sub, "token for unknown user");
            AppError::Unauthorized("User not authenticated".into())
        })?;

        Ok(AuthUser(user))
    }
}
