use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::repositories::{SessionRepository, UserRepository};
use crate::session;

/// Repositories the extractor needs, injected as an `Extension` layer.
#[derive(Clone)]
pub struct AuthContext {
    pub user_repo: UserRepository,
    pub session_repo: SessionRepository,
}

/// The authenticated caller, resolved from the session cookie.
/// Rejects with 401 when the cookie is missing, unknown or expired.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError::Internal("AuthContext not installed".to_string()))?;

        let jar = CookieJar::from_headers(&parts.headers);
        let token = session::get_session_token(&jar).ok_or(AppError::Unauthorized)?;

        let user_id = ctx
            .session_repo
            .find_valid(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Session rows cascade away with their user, but guard anyway.
        let user = ctx
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
        })
    }
}
