use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    #[serde(default)]
    pub payment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePixRequest {
    pub amount: f64,
    pub description: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
}
