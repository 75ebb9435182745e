use std::sync::Arc;

use config::Config;
use middleware::RateLimiter;
use providers::{MercadoPagoClient, StripeClient};

pub mod config;
pub mod error;
pub mod middleware;
pub mod providers;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub payments: MercadoPagoClient,
    pub checkout: StripeClient,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let timeout = config.upstream_timeout();
        Ok(Self {
            payments: MercadoPagoClient::new(config.mercado_pago_api_url.clone(), timeout)?,
            checkout: StripeClient::new(config.stripe_api_url.clone(), timeout)?,
            limiter: Arc::new(RateLimiter::from_config(&config)),
            config: Arc::new(config),
        })
    }
}
