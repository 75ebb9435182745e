use serde::{Deserialize, Serialize};

use crate::utils::Role;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
    /// Any JSON value; only the string `"caixa"` selects the cashier role.
    #[serde(rename = "type", default)]
    pub login_type: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: i64,
    #[serde(rename = "type")]
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub valid: bool,
    pub expires_at: i64,
    #[serde(rename = "type")]
    pub role: Role,
}
