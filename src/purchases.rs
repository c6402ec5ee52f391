// src/purchases.rs
//
// Client-local purchase state and the redirect reconciler. The persisted
// purchase list in the browser's key-value store is the system of record for
// "has this browser bought this product" — a deliberate client-trusted
// model. The server-side verification endpoint (api::verify) is the only
// authority fit for fund-moving decisions; everything here is the UX
// fast-path.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::BUNDLE_PRODUCT_ID;
use crate::Navigator;

pub const PURCHASED_PRODUCTS_KEY: &str = "purchasedProducts";
pub const PENDING_PURCHASE_KEY: &str = "pendingProductPurchase";
pub const QUIZ_DATA_KEY: &str = "fameChaseQuizData";

/// Path the reconciler rewrites the location to after consuming redirect
/// parameters.
pub const CLEAN_SHOP_PATH: &str = "/shop";

/// One recorded purchase. Field names match what the storefront has always
/// written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: String,
    #[serde(rename = "purchaseDate")]
    pub purchase_date: DateTime<Utc>,
    #[serde(rename = "customerInfo", default)]
    pub customer_info: serde_json::Value,
}

/// Client-local key-value store, the localStorage contract.
pub trait ClientStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store used by tests and non-browser hosts.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }
}

/// Reads the persisted purchase list. Malformed or non-array data logs a
/// warning and reads as empty; it never blocks the page.
pub fn load_purchases(store: &dyn ClientStore) -> Vec<PurchaseRecord> {
    let Some(raw) = store.get(PURCHASED_PRODUCTS_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<PurchaseRecord>>(&raw) {
        Ok(purchases) => purchases,
        Err(e) => {
            log::warn!("unable to parse stored purchases: {e}");
            Vec::new()
        }
    }
}

pub fn save_purchases(store: &dyn ClientStore, purchases: &[PurchaseRecord]) {
    match serde_json::to_string(purchases) {
        Ok(json) => store.set(PURCHASED_PRODUCTS_KEY, &json),
        Err(e) => log::error!("unable to serialize purchases: {e}"),
    }
}

/// Whether `product_id` is unlocked: bought directly, or covered by the
/// complete-bundle wildcard.
pub fn is_purchased(purchases: &[PurchaseRecord], product_id: &str) -> bool {
    purchases.iter().any(|p| p.id == product_id)
        || (product_id != BUNDLE_PRODUCT_ID
            && purchases.iter().any(|p| p.id == BUNDLE_PRODUCT_ID))
}

/// Appends a purchase for `product_id` unless one already exists, and
/// persists the updated list. Idempotent against double-clicks and repeated
/// redirects.
pub fn record_purchase(
    store: &dyn ClientStore,
    purchases: &mut Vec<PurchaseRecord>,
    product_id: &str,
    customer_info: serde_json::Value,
) {
    if purchases.iter().any(|p| p.id == product_id) {
        return;
    }
    purchases.push(PurchaseRecord {
        id: product_id.to_string(),
        purchase_date: Utc::now(),
        customer_info,
    });
    save_purchases(store, purchases);
}

/// Stashes which product a checkout was initiated for, consumed on the next
/// successful redirect to resolve a missing product-ID parameter.
pub fn begin_checkout(store: &dyn ClientStore, product_id: &str) {
    store.set(PENDING_PURCHASE_KEY, product_id);
}

/// The quiz profile snapshot attached to new purchase records. Malformed
/// data reads as an empty object, with a warning.
pub fn quiz_snapshot(store: &dyn ClientStore) -> serde_json::Value {
    let Some(raw) = store.get(QUIZ_DATA_KEY) else {
        return serde_json::json!({});
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("unable to parse quiz data: {e}");
            serde_json::json!({})
        }
    }
}

/// Buy-gate: the stored quiz profile must carry the core fields before a
/// checkout may start.
pub fn quiz_completed(store: &dyn ClientStore) -> bool {
    let data = quiz_snapshot(store);
    ["name", "niche", "primaryPlatform", "followerCount", "goals"]
        .iter()
        .all(|field| {
            data.get(field)
                .map(|v| !v.is_null() && v.as_str() != Some(""))
                .unwrap_or(false)
        })
}

fn status_indicates_success(raw_status: &str, has_payment_id: bool) -> bool {
    matches!(raw_status, "credit" | "success" | "completed" | "paid") || has_payment_id
}

/// Page-load reconciliation of redirect query parameters against local state.
///
/// Reads the persisted list, resolves the product from the query or the
/// pending marker, records the purchase on a success status (deduplicated),
/// clears the marker and replaces the location with a clean URL. Returns the
/// product to present the success view for, if any. Reloading the same
/// success URL twice never creates a second record.
pub fn reconcile_redirect(
    store: &dyn ClientStore,
    navigator: &dyn Navigator,
    query: &str,
) -> Option<String> {
    let mut purchases = load_purchases(store);

    let params: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let param = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    let raw_status = param("payment_status")
        .or_else(|| param("status"))
        .unwrap_or("")
        .to_lowercase();
    let url_product_id = param("product_id").or_else(|| param("data_product_id"));
    let pending = store.get(PENDING_PURCHASE_KEY);
    let success = status_indicates_success(&raw_status, param("payment_id").is_some());

    let resolved_product_id = url_product_id
        .map(|s| s.to_string())
        .or(pending);

    let (Some(product_id), true) = (resolved_product_id, success) else {
        return None;
    };

    record_purchase(store, &mut purchases, &product_id, quiz_snapshot(store));

    store.remove(PENDING_PURCHASE_KEY);
    navigator.replace(CLEAN_SHOP_PATH);

    log::info!("purchase reconciled product_id={product_id}");
    Some(product_id)
}
