pub mod api;
pub mod catalog;
pub mod config;
pub mod docs;
pub mod instamojo;
pub mod payu;
pub mod presenter;
pub mod purchases;
pub mod script_loader;
pub mod upi;

use crate::config::InstamojoConfig;

#[derive(Clone)]
pub struct AppState {
    pub instamojo: InstamojoConfig,
}

/// Browser-history capability shared by the presenter, the UPI fallback and
/// the purchase reconciler. `assign` navigates to a new location, `replace`
/// rewrites the current entry without adding a history item.
pub trait Navigator: Send + Sync {
    fn assign(&self, url: &str);
    fn replace(&self, url: &str);
}
