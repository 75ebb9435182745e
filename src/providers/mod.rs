//! Thin clients for the third-party payment APIs.
//!
//! Every call is a single round trip with a bounded timeout. Nothing is retried
//! or cached; callers decide their own polling schedule.

mod mercado_pago;
mod stripe;

pub use mercado_pago::{MercadoPagoClient, PaymentStatus, PixPayment, PixPaymentRequest};
pub use stripe::{CheckoutLineItem, CheckoutSession, CheckoutSessionRequest, StripeClient};

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Joins `segments` onto `base`, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            tracing::error!("Provider base URL cannot carry a path: {}", base);
            AppError::ServerMisconfigured
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|e| {
        tracing::error!("Invalid provider base URL {:?}: {}", raw, e);
        AppError::ServerMisconfigured
    })
}

fn transport_error(provider: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        tracing::error!(provider, "Upstream request timed out: {}", e);
    } else {
        tracing::error!(provider, "Upstream request failed: {}", e);
    }
    AppError::UpstreamError
}

/// Decodes a 2xx body into `T`; anything else becomes `UpstreamError` with the body logged.
async fn read_success<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(provider, %status, body = %body, "Upstream returned an error");
        return Err(AppError::UpstreamError);
    }

    response.json::<T>().await.map_err(|e| {
        tracing::error!(provider, "Failed to decode upstream response: {}", e);
        AppError::UpstreamError
    })
}
