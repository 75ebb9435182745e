use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use crate::{
    AppState,
    error::AppError,
    utils::{now_ms, verify_token},
};

/// Validates `Authorization: Bearer <token>` and hands the decoded `Claims` to the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|e| {
        tracing::debug!("Missing or malformed authorization header: {}", e);
        AppError::InvalidToken
    })?;

    let claims = verify_token(bearer.token(), &state.config, now_ms())?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
