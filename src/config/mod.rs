use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use uuid::Uuid;

use crate::utils::Role;

/// Process-wide settings, loaded once in `main` and shared read-only through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub admin_password: Option<String>,
    pub caixa_password: Option<String>,
    pub token_secret: String,
    pub token_ttl_ms: i64,
    pub mercado_pago_access_token: Option<String>,
    pub mercado_pago_api_url: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_api_url: String,
    pub checkout_return_url: Option<String>,
    pub upstream_timeout_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            api_base_uri: "/api".to_string(),
            admin_password: None,
            caixa_password: None,
            token_secret: random_secret(),
            token_ttl_ms: 3_600_000,
            mercado_pago_access_token: None,
            mercado_pago_api_url: "https://api.mercadopago.com".to_string(),
            stripe_secret_key: None,
            stripe_api_url: "https://api.stripe.com".to_string(),
            checkout_return_url: None,
            upstream_timeout_secs: 10,
            rate_limit_window_secs: 60,
            rate_limit_requests: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Config::default();

        let token_secret = optional("TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("TOKEN_SECRET not set, tokens will not survive a restart");
            defaults.token_secret.clone()
        });

        Config {
            server_host: optional("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or("SERVER_PORT", defaults.server_port),
            api_base_uri: normalize_base_uri(
                &optional("API_BASE_URI").unwrap_or(defaults.api_base_uri),
            ),
            admin_password: optional("ADMIN_PASSWORD"),
            caixa_password: optional("CAIXA_PASSWORD"),
            token_secret,
            token_ttl_ms: positive_or("TOKEN_TTL_MS", defaults.token_ttl_ms),
            mercado_pago_access_token: optional("MERCADO_PAGO_ACCESS_TOKEN"),
            mercado_pago_api_url: optional("MERCADO_PAGO_API_URL")
                .unwrap_or(defaults.mercado_pago_api_url),
            stripe_secret_key: optional("STRIPE_SECRET_KEY"),
            stripe_api_url: optional("STRIPE_API_URL").unwrap_or(defaults.stripe_api_url),
            checkout_return_url: optional("CHECKOUT_RETURN_URL"),
            upstream_timeout_secs: parse_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout_secs),
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window_secs),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests),
        }
    }

    /// Login secret for `role`; an empty value counts as unset.
    pub fn secret_for(&self, role: Role) -> Option<&str> {
        let secret = match role {
            Role::Admin => self.admin_password.as_deref(),
            Role::Cashier => self.caixa_password.as_deref(),
        };
        secret.filter(|s| !s.is_empty())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {key} value {raw:?} ({e}), using default {default}");
            default
        }),
        None => default,
    }
}

fn positive_or(key: &str, default: i64) -> i64 {
    check_positive(key, parse_or(key, default), default)
}

fn check_positive(key: &str, value: i64, default: i64) -> i64 {
    if value > 0 {
        value
    } else {
        tracing::warn!("{key} must be positive, got {value}, using default {default}");
        default
    }
}

/// `"/api/"` -> `"/api"`, `"api"` -> `"/api"`, `"/"` -> `""` (routes mounted at the root).
fn normalize_base_uri(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn random_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_for_role() {
        let config = Config {
            admin_password: Some("admin-pw".into()),
            caixa_password: Some(String::new()),
            ..Config::default()
        };

        assert_eq!(config.secret_for(Role::Admin), Some("admin-pw"));
        assert_eq!(config.secret_for(Role::Cashier), None);
    }

    #[test]
    fn test_normalize_base_uri() {
        assert_eq!(normalize_base_uri("/api"), "/api");
        assert_eq!(normalize_base_uri("api/"), "/api");
        assert_eq!(normalize_base_uri("/v1/store/"), "/v1/store");
        assert_eq!(normalize_base_uri("/"), "");
        assert_eq!(normalize_base_uri(""), "");
    }

    #[test]
    fn test_non_positive_ttl_falls_back() {
        assert_eq!(check_positive("TOKEN_TTL_MS", 0, 3_600_000), 3_600_000);
        assert_eq!(check_positive("TOKEN_TTL_MS", -5, 3_600_000), 3_600_000);
        assert_eq!(check_positive("TOKEN_TTL_MS", 900_000, 3_600_000), 900_000);
    }

    #[test]
    fn test_default_token_secrets_differ() {
        assert_ne!(Config::default().token_secret, Config::default().token_secret);
        assert_eq!(Config::default().token_ttl_ms, 3_600_000);
    }
}
