// src/config.rs

use std::env;

/// PayU merchant credentials and gateway endpoint.
///
/// The defaults are PayU's published sandbox credentials, same as the shop
/// has always shipped with; production deployments override them via env.
#[derive(Debug, Clone)]
pub struct PayUConfig {
    pub merchant_key: String,
    pub salt: String,
    pub base_url: String,
    pub mode: String,
}

impl PayUConfig {
    pub fn from_env() -> Self {
        Self {
            merchant_key: env::var("PAYU_MERCHANT_KEY").unwrap_or_else(|_| "WBtjxn".to_string()),
            salt: env::var("PAYU_SALT").unwrap_or_else(|_| "Ui1z2GLGDx7sUixAtCdl42".to_string()),
            base_url: env::var("PAYU_BASE_URL")
                .unwrap_or_else(|_| "https://test.payu.in/_payment".to_string()),
            mode: env::var("PAYU_MODE").unwrap_or_else(|_| "test".to_string()),
        }
    }
}

/// Instamojo server-side API credentials.
///
/// `api_key`/`auth_token` stay `None` when unset; the verification endpoint
/// reports a configuration error instead of calling upstream without them.
#[derive(Debug, Clone)]
pub struct InstamojoConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
}

impl InstamojoConfig {
    pub fn from_env() -> Self {
        Self {
            api_base: env::var("INSTAMOJO_BASE")
                .unwrap_or_else(|_| "https://api.instamojo.com".to_string()),
            api_key: env::var("INSTAMOJO_API_KEY").ok(),
            auth_token: env::var("INSTAMOJO_AUTH_TOKEN").ok(),
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.api_key.as_deref(), self.auth_token.as_deref()) {
            (Some(key), Some(token)) => Some((key, token)),
            _ => None,
        }
    }
}
