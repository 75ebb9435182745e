use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Senha incorreta")]
    InvalidCredentials,

    #[error("Sessão inválida ou expirada")]
    InvalidToken,

    #[error("Muitas tentativas, tente novamente em {0} segundos")]
    RateLimited(u64),

    #[error("Configuração do servidor incompleta")]
    ServerMisconfigured,

    #[error("Erro interno do servidor")]
    Internal,

    #[error("Falha ao comunicar com o provedor de pagamento")]
    UpstreamError,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServerMisconfigured | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UpstreamError => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest("Corpo da requisição inválido".to_string())
    }
}

/// `Json` extractor whose rejections come back as `{"error": ...}` with status 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
