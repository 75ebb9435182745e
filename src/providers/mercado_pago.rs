use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{endpoint, parse_base_url, read_success, transport_error};
use crate::error::AppError;

const PROVIDER: &str = "mercado_pago";

/// Normalized view of a Mercado Pago payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub status: String,
    pub status_detail: String,
    pub approved: bool,
}

impl PaymentStatus {
    /// Only the literal `"approved"` counts as paid.
    pub fn from_raw(status: String, status_detail: Option<String>) -> Self {
        let approved = status == "approved";
        Self {
            status,
            status_detail: status_detail.unwrap_or_default(),
            approved,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PixPaymentRequest {
    pub amount: f64,
    pub description: String,
    pub email: String,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixPayment {
    pub payment_id: String,
    pub status: String,
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
    pub ticket_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPayment {
    id: serde_json::Value,
    status: String,
    status_detail: Option<String>,
    point_of_interaction: Option<RawPointOfInteraction>,
}

#[derive(Debug, Deserialize)]
struct RawPointOfInteraction {
    transaction_data: Option<RawTransactionData>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTransactionData {
    qr_code: Option<String>,
    qr_code_base64: Option<String>,
    ticket_url: Option<String>,
}

#[derive(Serialize)]
struct CreatePaymentBody<'a> {
    transaction_amount: f64,
    description: &'a str,
    payment_method_id: &'static str,
    payer: Payer<'a>,
}

#[derive(Serialize)]
struct Payer<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
}

#[derive(Clone)]
pub struct MercadoPagoClient {
    client: Client,
    base_url: String,
}

impl MercadoPagoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, AppError> {
        endpoint(&parse_base_url(&self.base_url)?, segments)
    }

    /// `GET /v1/payments/{id}`
    pub async fn payment_status(
        &self,
        access_token: &str,
        payment_id: &str,
    ) -> Result<PaymentStatus, AppError> {
        let url = self.url(&["v1", "payments", payment_id])?;

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let payment: RawPayment = read_success(PROVIDER, response).await?;
        Ok(PaymentStatus::from_raw(payment.status, payment.status_detail))
    }

    /// `POST /v1/payments` with `payment_method_id = "pix"`.
    pub async fn create_pix_payment(
        &self,
        access_token: &str,
        request: &PixPaymentRequest,
    ) -> Result<PixPayment, AppError> {
        let url = self.url(&["v1", "payments"])?;
        let body = CreatePaymentBody {
            transaction_amount: request.amount,
            description: &request.description,
            payment_method_id: "pix",
            payer: Payer {
                email: &request.email,
                first_name: request.first_name.as_deref(),
            },
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let payment: RawPayment = read_success(PROVIDER, response).await?;
        let data = payment
            .point_of_interaction
            .and_then(|poi| poi.transaction_data)
            .unwrap_or_default();

        Ok(PixPayment {
            payment_id: id_to_string(&payment.id),
            status: payment.status,
            qr_code: data.qr_code,
            qr_code_base64: data.qr_code_base64,
            ticket_url: data.ticket_url,
        })
    }
}

// Ids come back as JSON numbers; keep them as opaque strings for the storefront.
fn id_to_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
