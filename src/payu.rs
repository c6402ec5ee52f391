// src/payu.rs
//
// PayU redirect checkout: transaction IDs, the SHA-512 request hash, the
// hidden POST form descriptor and response-hash verification.
//
// The request hash covers key|txnid|amount|productinfo|firstname|email|
// udf1..udf5|salt in exactly that order; the response hash covers the same
// fields reversed with status spliced in. Reordering either list is a
// breaking wire-format change on the provider side.

use std::time::Duration;

use serde::Deserialize;
use sha2::{Digest, Sha512};
use uuid::Uuid;

use crate::config::PayUConfig;

/// Grace delay before the transient form node is discarded; the browser must
/// be given time to start the POST navigation first.
pub const FORM_CLEANUP_DELAY: Duration = Duration::from_secs(1);

/// One checkout attempt. Built per click, submitted once, never persisted.
///
/// `amount` is kept as the exact string that goes on the wire: the hash and
/// the posted field must match byte for byte, so no float round-tripping.
#[derive(Debug, Clone, Default)]
pub struct PayUPaymentData {
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub phone: String,
    /// Success redirect URL.
    pub surl: String,
    /// Failure redirect URL.
    pub furl: String,
    pub udf1: Option<String>,
    pub udf2: Option<String>,
    pub udf3: Option<String>,
    pub udf4: Option<String>,
    pub udf5: Option<String>,
}

/// Fields PayU posts back to the success/failure URL. Only the hash-covered
/// subset plus the user-facing error text is modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayUResponse {
    #[serde(default)]
    pub mihpayid: String,
    pub status: String,
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    #[serde(default)]
    pub udf1: String,
    #[serde(default)]
    pub udf2: String,
    #[serde(default)]
    pub udf3: String,
    #[serde(default)]
    pub udf4: String,
    #[serde(default)]
    pub udf5: String,
    #[serde(default, rename = "error_Message")]
    pub error_message: String,
    pub hash: String,
}

/// Unique per attempt: millisecond timestamp plus random suffix, with the
/// application prefix PayU dashboards filter on.
pub fn generate_transaction_id() -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let random: String = Uuid::new_v4().simple().to_string()[..6].to_string();
    format!("FAMECHASE_{timestamp}_{random}").to_uppercase()
}

fn sha512_hex(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Request hash over the pipe-delimited field sequence PayU recomputes with
/// the shared salt.
pub fn payment_hash(config: &PayUConfig, data: &PayUPaymentData) -> String {
    let hash_string = [
        config.merchant_key.as_str(),
        data.txnid.as_str(),
        data.amount.as_str(),
        data.productinfo.as_str(),
        data.firstname.as_str(),
        data.email.as_str(),
        data.udf1.as_deref().unwrap_or(""),
        data.udf2.as_deref().unwrap_or(""),
        data.udf3.as_deref().unwrap_or(""),
        data.udf4.as_deref().unwrap_or(""),
        data.udf5.as_deref().unwrap_or(""),
        config.salt.as_str(),
    ]
    .join("|");

    sha512_hex(&hash_string)
}

/// Recomputes the reverse-order response hash and compares it with the one
/// PayU supplied. A mismatch means the response was tampered with or signed
/// with a different salt; callers surface it as a verification failure, they
/// must not silently trust the status field.
pub fn verify_response(config: &PayUConfig, response: &PayUResponse) -> bool {
    let hash_string = [
        config.salt.as_str(),
        response.status.as_str(),
        response.udf5.as_str(),
        response.udf4.as_str(),
        response.udf3.as_str(),
        response.udf2.as_str(),
        response.udf1.as_str(),
        response.email.as_str(),
        response.firstname.as_str(),
        response.productinfo.as_str(),
        response.amount.as_str(),
        response.txnid.as_str(),
        config.merchant_key.as_str(),
    ]
    .join("|");

    sha512_hex(&hash_string) == response.hash
}

/// Descriptor of the transient hidden form that carries the checkout POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayUForm {
    pub method: &'static str,
    pub action: String,
    pub fields: Vec<(String, String)>,
}

/// Builds the POST form for `data`: every payload field as a hidden input,
/// plus the computed `hash` and the merchant `key`.
pub fn build_form(config: &PayUConfig, data: &PayUPaymentData) -> PayUForm {
    let mut fields: Vec<(String, String)> = vec![
        ("txnid".to_string(), data.txnid.clone()),
        ("amount".to_string(), data.amount.clone()),
        ("productinfo".to_string(), data.productinfo.clone()),
        ("firstname".to_string(), data.firstname.clone()),
        ("email".to_string(), data.email.clone()),
        ("phone".to_string(), data.phone.clone()),
        ("surl".to_string(), data.surl.clone()),
        ("furl".to_string(), data.furl.clone()),
    ];

    for (name, value) in [
        ("udf1", &data.udf1),
        ("udf2", &data.udf2),
        ("udf3", &data.udf3),
        ("udf4", &data.udf4),
        ("udf5", &data.udf5),
    ] {
        if let Some(value) = value {
            fields.push((name.to_string(), value.clone()));
        }
    }

    fields.push(("hash".to_string(), payment_hash(config, data)));
    fields.push(("key".to_string(), config.merchant_key.clone()));

    PayUForm {
        method: "POST",
        action: config.base_url.clone(),
        fields,
    }
}

/// Host-page capability for submitting the hidden form.
pub trait FormGateway: Send + Sync {
    /// Attaches the form to the page and submits it, starting the POST
    /// navigation. Returns a handle for the attached node.
    fn submit(&self, form: &PayUForm) -> Box<dyn SubmittedForm>;
}

pub trait SubmittedForm: Send {
    /// Removes the transient form node from the page.
    fn discard(&self);
}

/// Builds, signs and submits the checkout form, then discards the node after
/// the cleanup grace delay.
pub async fn initiate_payment(
    gateway: &dyn FormGateway,
    config: &PayUConfig,
    data: &PayUPaymentData,
) {
    let form = build_form(config, data);
    log::info!(
        "initiating PayU payment txnid={} amount={} product={}",
        data.txnid,
        data.amount,
        data.productinfo
    );
    let submitted = gateway.submit(&form);
    tokio::time::sleep(FORM_CLEANUP_DELAY).await;
    submitted.discard();
}

/// Outcome of a returned PayU response, with the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub is_valid: bool,
    pub is_success: bool,
    pub message: String,
}

/// Classifies a returned response: an invalid hash always wins over whatever
/// the status field claims.
pub fn handle_payment_response(config: &PayUConfig, response: &PayUResponse) -> PaymentOutcome {
    let is_valid = verify_response(config, response);
    let is_success = response.status == "success";

    let message = if !is_valid {
        "Payment verification failed. Please contact support.".to_string()
    } else if is_success {
        "Payment completed successfully!".to_string()
    } else if !response.error_message.is_empty() {
        response.error_message.clone()
    } else {
        "Payment failed. Please try again.".to_string()
    };

    PaymentOutcome {
        is_valid,
        is_success,
        message,
    }
}
