use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateUser, LoginCredentials};
use crate::repositories::{SessionRepository, UserRepository};
use crate::session;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
    pub session_repo: SessionRepository,
}

pub async fn register(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(form): Json<CreateUser>,
) -> Result<Response> {
    let username = form.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if state.user_repo.find_by_username(username).await?.is_some() {
        return Err(AppError::Validation(
            "Username already exists".to_string(),
        ));
    }

    let user = state.user_repo.create(username, &form.password).await?;

    tracing::info!("Registered user {}", user.username);

    // Log the new account straight in
    let token = state.session_repo.create(&user.id).await?;
    let jar = jar.add(session::create_session_cookie(&token));

    Ok((StatusCode::CREATED, jar, Json(user)).into_response())
}

pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Response> {
    let user = state
        .user_repo
        .verify_password(&credentials.username, &credentials.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let token = state.session_repo.create(&user.id).await?;
    let jar = jar.add(session::create_session_cookie(&token));

    Ok((jar, Json(user)).into_response())
}

pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> Result<Response> {
    if let Some(token) = session::get_session_token(&jar) {
        state.session_repo.delete(&token).await?;
    }

    let jar = jar.add(session::remove_session_cookie());
    Ok((jar, Json(serde_json::json!({ "ok": true }))).into_response())
}

pub async fn me(State(state): State<AuthState>, auth_user: AuthUser) -> Result<Response> {
    let user = state
        .user_repo
        .find_by_id(&auth_user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(user).into_response())
}
