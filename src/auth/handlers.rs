use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::password;
use crate::auth::validation::{LoginRequest, RegisterRequest};
use crate::error::{AppError, AppResult};
use crate::extractors::{ApiJson, CurrentUser, SessionToken};
use crate::models::{NewUser, PublicUser};
use crate::state::AppState;

// -- Response types --

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Replace whatever session the client held with a new one for `user`, and
/// build the response carrying its cookie.
async fn start_session(
    state: &AppState,
    previous: Option<String>,
    user: PublicUser,
    status: StatusCode,
) -> AppResult<Response> {
    if let Some(token) = previous {
        state.sessions.destroy(&token).await?;
    }

    let session = state.sessions.create(user).await?;

    Ok((
        status,
        AppendHeaders([(
            header::SET_COOKIE,
            session_cookie(&state.config, &session.token),
        )]),
        Json(UserResponse { user: session.user }),
    )
        .into_response())
}

/// POST /api/auth/login — verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    SessionToken(previous): SessionToken,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<Response> {
    let credentials = req.validate()?;

    let Some(user) = state.users.find_by_username(&credentials.username).await? else {
        // Unknown users still pay for one bcrypt verify.
        let dummy = state.dummy_hash().await?;
        password::verify_password(credentials.password, dummy).await?;
        tracing::info!("Login failed for unknown user {}", credentials.username);
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password(credentials.password, user.password_hash.clone()).await? {
        tracing::info!("Login failed for {}: wrong password", user.username);
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!("User {} logged in", user.username);
    start_session(&state, previous, user.to_public(), StatusCode::OK).await
}

/// POST /api/auth/register — create an account and start a session
pub async fn register(
    State(state): State<AppState>,
    SessionToken(previous): SessionToken,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> AppResult<Response> {
    let registration = req.validate()?;

    // Checked before hashing; insert re-checks under its own lock.
    if state
        .users
        .find_by_username(&registration.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let password_hash =
        password::hash_password(registration.password, state.config.auth.bcrypt_cost).await?;

    let user = state
        .users
        .insert(NewUser {
            username: registration.username,
            password_hash,
            first_name: registration.first_name,
            last_name: registration.last_name,
            profile_image: registration.profile_image,
        })
        .await?;

    tracing::info!("Registered user {} (id {})", user.username, user.id);
    start_session(&state, previous, user.to_public(), StatusCode::CREATED).await
}

/// GET /api/auth/session — the user behind the session cookie
pub async fn session(current: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse { user: current.user })
}

/// POST /api/auth/logout — delete the session and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> AppResult<Response> {
    if let Some(token) = token {
        let existed = state
            .sessions
            .destroy(&token)
            .await
            .map_err(AppError::Logout)?;
        if existed {
            tracing::info!("Session ended");
        }
    }

    Ok((
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&state.config))]),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
        .into_response())
}
