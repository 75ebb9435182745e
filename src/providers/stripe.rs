use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{endpoint, parse_base_url, read_success, transport_error};
use crate::error::AppError;

const PROVIDER: &str = "stripe";
const CURRENCY: &str = "brl";

#[derive(Debug, Clone)]
pub struct CheckoutLineItem {
    pub name: String,
    pub unit_amount: i64, // centavos
    pub quantity: u32,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    pub items: Vec<CheckoutLineItem>,
    pub customer_email: Option<String>,
    pub return_url: String,
}

impl CheckoutSessionRequest {
    /// Stripe's bracketed form encoding for a session with inline prices.
    fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("ui_mode".to_string(), "embedded".to_string()),
            ("mode".to_string(), "payment".to_string()),
            ("return_url".to_string(), self.return_url.clone()),
        ];

        if let Some(email) = &self.customer_email {
            fields.push(("customer_email".to_string(), email.clone()));
        }

        for (i, item) in self.items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            fields.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
            fields.push((
                format!("{prefix}[price_data][currency]"),
                CURRENCY.to_string(),
            ));
            fields.push((
                format!("{prefix}[price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            fields.push((
                format!("{prefix}[price_data][product_data][name]"),
                item.name.clone(),
            ));
            if let Some(image) = &item.image {
                fields.push((
                    format!("{prefix}[price_data][product_data][images][0]"),
                    image.clone(),
                ));
            }
        }

        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub client_secret: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
struct RawSession {
    id: String,
    client_secret: Option<String>,
}

#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    base_url: String,
}

impl StripeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    /// `POST /v1/checkout/sessions`
    pub async fn create_checkout_session(
        &self,
        secret_key: &str,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, AppError> {
        let url = endpoint(&parse_base_url(&self.base_url)?, &["v1", "checkout", "sessions"])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(secret_key)
            .form(&request.form_fields())
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let session: RawSession = read_success(PROVIDER, response).await?;
        let client_secret = session.client_secret.ok_or_else(|| {
            tracing::error!(session_id = %session.id, "Checkout session has no client_secret");
            AppError::UpstreamError
        })?;

        Ok(CheckoutSession {
            client_secret,
            session_id: session.id,
        })
    }
}
