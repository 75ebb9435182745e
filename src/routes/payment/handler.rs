use axum::{
    extract::{Json, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{ApiJson, AppError},
    providers::PixPaymentRequest,
};

use super::model::{CreatePixRequest, PaymentStatusRequest};

fn mercado_pago_token(state: &AppState) -> Result<&str, AppError> {
    state
        .config
        .mercado_pago_access_token
        .as_deref()
        .ok_or_else(|| {
            tracing::error!("MERCADO_PAGO_ACCESS_TOKEN is not configured");
            AppError::ServerMisconfigured
        })
}

/// One upstream lookup per call; the storefront polls this while the PIX QR code is shown.
#[axum::debug_handler]
pub async fn payment_status(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PaymentStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payment_id = req
        .payment_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("paymentId é obrigatório".to_string()))?;

    let access_token = mercado_pago_token(&state)?;

    let status = state
        .payments
        .payment_status(access_token, payment_id)
        .await
        .inspect_err(|_| tracing::warn!(%payment_id, "Payment status lookup failed"))?;

    tracing::info!(%payment_id, status = %status.status, approved = status.approved, "Payment status checked");

    Ok(Json(status))
}

#[axum::debug_handler]
pub async fn create_pix(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePixRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Mercado Pago rejects amounts with more than two decimal places.
    let amount = (req.amount * 100.0).round() / 100.0;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::BadRequest("Valor inválido".to_string()));
    }
    if req.description.trim().is_empty() {
        return Err(AppError::BadRequest("Descrição é obrigatória".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("E-mail inválido".to_string()));
    }

    let access_token = mercado_pago_token(&state)?;

    let request = PixPaymentRequest {
        amount,
        description: req.description.trim().to_string(),
        email: req.email.trim().to_string(),
        first_name: req.first_name.filter(|n| !n.trim().is_empty()),
    };

    let pix = state
        .payments
        .create_pix_payment(access_token, &request)
        .await?;

    tracing::info!(payment_id = %pix.payment_id, amount = request.amount, "PIX payment created");

    Ok(Json(pix))
}
