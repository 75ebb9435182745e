use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Authorization level carried by a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "caixa")]
    Cashier,
}

impl Role {
    /// `"caixa"` selects the cashier panel; any other value, or none, means admin.
    pub fn from_login_type(login_type: Option<&Value>) -> Self {
        match login_type {
            Some(Value::String(s)) if s == "caixa" => Role::Cashier,
            _ => Role::Admin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "caixa",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub role: Role,
    pub expires_at: i64, // epoch ms
    pub nonce: Uuid,
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Signs a fresh session token for `role`, returning it with its expiry in epoch ms.
pub fn generate_token(
    role: Role,
    config: &Config,
    issued_at_ms: i64,
) -> Result<(String, i64), AppError> {
    let expires_at = issued_at_ms
        .checked_add(config.token_ttl_ms)
        .ok_or_else(|| {
            tracing::error!(ttl_ms = config.token_ttl_ms, "Token expiry out of range");
            AppError::Internal
        })?;
    let claims = Claims {
        role,
        expires_at,
        nonce: Uuid::new_v4(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.token_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!(%role, "Failed to sign session token: {}", e);
        AppError::Internal
    })?;

    Ok((token, expires_at))
}

/// A token is valid iff its signature checks out, it decodes to a known role,
/// and `now_ms < expires_at`.
pub fn verify_token(token: &str, config: &Config, now_ms: i64) -> Result<Claims, AppError> {
    // Expiry is carried in milliseconds, so the registered `exp` claim is not used.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.token_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        AppError::InvalidToken
    })?
    .claims;

    if now_ms >= claims.expires_at {
        tracing::debug!(role = %claims.role, "Token expired");
        return Err(AppError::InvalidToken);
    }

    Ok(claims)
}

/// Compares SHA-256 digests in constant time so neither content nor length leaks.
pub fn password_matches(candidate: &str, secret: &str) -> bool {
    let candidate = Sha256::digest(candidate.as_bytes());
    let secret = Sha256::digest(secret.as_bytes());
    candidate.as_slice().ct_eq(secret.as_slice()).into()
}
