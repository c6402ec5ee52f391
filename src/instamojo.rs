// src/instamojo.rs
//
// Builds Instamojo hosted-checkout links. Pure string/URL work: the script
// loading and widget handling live in script_loader / presenter.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutMode {
    #[default]
    Popup,
    Embed,
}

/// Parameters for one hosted-checkout link.
///
/// `lock_amount` is asymmetric on purpose: anything but an explicit `false`
/// writes `data_readonly=amount`, while `false` deletes the key entirely
/// (the provider treats `data_readonly=false` as still locked).
#[derive(Debug, Clone, Default)]
pub struct CheckoutParams {
    pub amount: f64,
    pub purpose: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub redirect_url: Option<String>,
    pub notes: BTreeMap<String, String>,
    pub allow_repeated_payments: bool,
    pub lock_amount: Option<bool>,
    pub mode: CheckoutMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    InvalidBaseUrl(String),
    InvalidAmount(String),
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutError::InvalidBaseUrl(e) => write!(f, "invalid checkout base url: {e}"),
            CheckoutError::InvalidAmount(e) => write!(f, "invalid checkout amount: {e}"),
        }
    }
}

/// Ordered query-pair editor. `set` keeps the position of an existing key,
/// `remove` drops every occurrence.
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    fn set(&mut self, key: &str, value: &str) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value.to_string(),
            None => self.0.push((key.to_string(), value.to_string())),
        }
    }

    fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }
}

/// Builds the checkout URL for `params` on top of `base_url`, preserving any
/// query parameters the base already carries.
pub fn build_checkout_url(base_url: &str, params: &CheckoutParams) -> Result<Url, CheckoutError> {
    let mut url =
        Url::parse(base_url).map_err(|e| CheckoutError::InvalidBaseUrl(e.to_string()))?;

    if !params.amount.is_finite() || params.amount < 0.0 {
        return Err(CheckoutError::InvalidAmount(format!(
            "amount must be a finite non-negative number, got {}",
            params.amount
        )));
    }

    let mut pairs = QueryPairs(
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
    );

    // embed=form only when explicitly requested; popup URLs must not carry it
    if params.mode == CheckoutMode::Embed {
        pairs.set("embed", "form");
    }

    pairs.set("amount", &format!("{:.2}", params.amount));
    pairs.set("purpose", &params.purpose);

    if params.lock_amount == Some(false) {
        pairs.remove("data_readonly");
    } else {
        pairs.set("data_readonly", "amount");
    }

    pairs.set(
        "allow_repeated_payments",
        if params.allow_repeated_payments { "true" } else { "false" },
    );

    // The popup widget reads the plain keys, the hosted form reads the
    // data_-prefixed ones; both have to be present.
    if let Some(name) = &params.name {
        pairs.set("name", name);
        pairs.set("data_name", name);
    }
    if let Some(email) = &params.email {
        pairs.set("email", email);
        pairs.set("data_email", email);
    }
    if let Some(phone) = &params.phone {
        pairs.set("phone", phone);
        pairs.set("data_phone", phone);
    }
    if let Some(redirect_url) = &params.redirect_url {
        pairs.set("redirect_url", redirect_url);
    }

    for (key, value) in &params.notes {
        pairs.set(&format!("data_{key}"), value);
    }

    url.query_pairs_mut().clear().extend_pairs(pairs.0.iter());
    Ok(url)
}

/// True when the URL asks for the embedded (iframe) checkout.
pub fn is_embed_url(url: &Url) -> bool {
    url.query_pairs().any(|(k, v)| k == "embed" && v == "form")
}
