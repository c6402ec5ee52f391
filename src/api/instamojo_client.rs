// src/api/instamojo_client.rs
//
// Minimal client for the Instamojo payments API (https://api.instamojo.com).
// Authentication: X-Api-Key / X-Auth-Token headers, server-held only.

use std::fmt;

use serde_json::Value;

#[derive(Debug)]
pub enum InstamojoError {
    Http(reqwest::Error),
    Api { status: u16, body: Value },
}

impl fmt::Display for InstamojoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstamojoError::Http(e) => write!(f, "http error: {e}"),
            InstamojoError::Api { status, body } => {
                write!(f, "instamojo api error status={status} body={body}")
            }
        }
    }
}

impl From<reqwest::Error> for InstamojoError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Fetches the authoritative payment object for `payment_id`.
///
/// Non-2xx responses come back as `Api` with whatever body the provider
/// sent; bodies that are not JSON are wrapped as `{"raw": <text>}` so the
/// caller can still relay them.
pub async fn fetch_payment(
    api_base: &str,
    api_key: &str,
    auth_token: &str,
    payment_id: &str,
) -> Result<Value, InstamojoError> {
    let client = reqwest::Client::new();

    let encoded_id: String =
        url::form_urlencoded::byte_serialize(payment_id.as_bytes()).collect();
    let resp = client
        .get(format!("{api_base}/v2/payments/{encoded_id}"))
        .header("Content-Type", "application/json")
        .header("X-Api-Key", api_key)
        .header("X-Auth-Token", auth_token)
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    let json = serde_json::from_str::<Value>(&body)
        .unwrap_or_else(|_| serde_json::json!({ "raw": body }));

    if !status.is_success() {
        return Err(InstamojoError::Api {
            status: status.as_u16(),
            body: json,
        });
    }

    Ok(json)
}

/// Pulls the payment status out of the known response shapes: top-level
/// `status`, `payment.status`, `data.status`, or `payment.payment_status`.
pub fn extract_status(payment: &Value) -> Option<String> {
    payment
        .get("status")
        .or_else(|| payment.get("payment").and_then(|p| p.get("status")))
        .or_else(|| payment.get("data").and_then(|d| d.get("status")))
        .or_else(|| payment.get("payment").and_then(|p| p.get("payment_status")))
        .and_then(|s| s.as_str())
        .map(|s| s.to_string())
}

/// Case-insensitive substring match against the provider's "succeeded"
/// vocabulary.
pub fn status_is_successful(status: &str) -> bool {
    let status = status.to_lowercase();
    status.contains("success") || status.contains("credit") || status.contains("completed")
}
