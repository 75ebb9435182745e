use axum::{
    extract::{Extension, Json, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{ApiJson, AppError},
    utils::{Claims, Role, generate_token, now_ms, password_matches},
};

use super::model::{LoginRequest, LoginResponse, SessionResponse};

/// Exchanges the admin or cashier password for a one-hour session token.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = Role::from_login_type(req.login_type.as_ref());

    let Some(secret) = state.config.secret_for(role) else {
        tracing::error!(%role, "Login secret is not configured");
        return Err(AppError::ServerMisconfigured);
    };

    if !password_matches(&req.password, secret) {
        tracing::warn!(%role, "Login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let (token, expires_at) = generate_token(role, &state.config, now_ms())?;

    tracing::info!(%role, expires_at, "Login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        token,
        expires_at,
        role,
    }))
}

/// Reports the role and expiry of the bearer token; `auth_middleware` has already checked it.
#[axum::debug_handler]
pub async fn check_session(Extension(claims): Extension<Claims>) -> impl IntoResponse {
    Json(SessionResponse {
        valid: true,
        expires_at: claims.expires_at,
        role: claims.role,
    })
}
