use axum::{
    extract::{Json, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{ApiJson, AppError},
    providers::{CheckoutLineItem, CheckoutSessionRequest},
};

use super::model::{CartItem, CreateSessionRequest};

fn validate_items(items: Vec<CartItem>) -> Result<Vec<CheckoutLineItem>, AppError> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Carrinho vazio".to_string()));
    }

    items
        .into_iter()
        .map(|item| {
            if item.name.trim().is_empty() || item.quantity == 0 || item.unit_amount <= 0 {
                return Err(AppError::BadRequest(format!(
                    "Item inválido no carrinho: {}",
                    item.name
                )));
            }
            Ok(CheckoutLineItem {
                name: item.name,
                unit_amount: item.unit_amount,
                quantity: item.quantity,
                image: item.image.filter(|url| !url.is_empty()),
            })
        })
        .collect()
}

/// Starts a Stripe embedded checkout and returns the client secret the storefront mounts.
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let items = validate_items(req.items)?;

    let (Some(secret_key), Some(return_url)) = (
        state.config.stripe_secret_key.as_deref(),
        state.config.checkout_return_url.as_deref(),
    ) else {
        tracing::error!("STRIPE_SECRET_KEY or CHECKOUT_RETURN_URL is not configured");
        return Err(AppError::ServerMisconfigured);
    };

    let request = CheckoutSessionRequest {
        items,
        customer_email: req.customer_email.filter(|e| !e.trim().is_empty()),
        return_url: return_url.to_string(),
    };

    let session = state
        .checkout
        .create_checkout_session(secret_key, &request)
        .await?;

    tracing::info!(session_id = %session.session_id, items = request.items.len(), "Checkout session created");

    Ok(Json(session))
}
