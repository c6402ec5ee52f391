// src/script_loader.rs
//
// Single-flight loader for the Instamojo checkout script. Concurrent callers
// share one in-flight load; a failed load resets the state so the next call
// retries instead of caching the failure.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

pub const INSTAMOJO_SCRIPT_URL: &str = "https://js.instamojo.com/v1/checkout.js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    LoadFailed(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::LoadFailed(e) => write!(f, "checkout script failed to load: {e}"),
        }
    }
}

/// Host-page capability for inserting the provider script tag.
///
/// Implementations must tolerate a tag that already exists from an earlier,
/// unrelated load attempt: check its loaded marker instead of inserting a
/// second tag, and resolve once the load (or error) event fires.
#[async_trait]
pub trait ScriptHost: Send + Sync {
    async fn inject_script(&self, src: &str) -> Result<(), ScriptError>;
}

enum LoadState {
    NotLoaded,
    Loading(watch::Receiver<Option<Result<(), ScriptError>>>),
    Loaded,
}

/// One loader instance per process, constructed in `main` (or per test) and
/// passed by reference; no module-level globals.
pub struct ScriptLoader {
    host: Arc<dyn ScriptHost>,
    state: Arc<Mutex<LoadState>>,
}

impl ScriptLoader {
    pub fn new(host: Arc<dyn ScriptHost>) -> Self {
        Self {
            host,
            state: Arc::new(Mutex::new(LoadState::NotLoaded)),
        }
    }

    /// Resolves once the checkout script is loaded. Safe to call repeatedly
    /// and concurrently; at most one `inject_script` runs at a time.
    pub async fn ensure_loaded(&self) -> Result<(), ScriptError> {
        let mut rx = {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match &*state {
                LoadState::Loaded => return Ok(()),
                LoadState::Loading(rx) => rx.clone(),
                LoadState::NotLoaded => {
                    let (tx, rx) = watch::channel(None);
                    *state = LoadState::Loading(rx.clone());

                    let host = Arc::clone(&self.host);
                    let shared = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let result = host.inject_script(INSTAMOJO_SCRIPT_URL).await;
                        {
                            let mut state = shared
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner());
                            *state = match &result {
                                Ok(()) => LoadState::Loaded,
                                // reset so a later call may retry
                                Err(_) => LoadState::NotLoaded,
                            };
                        }
                        let _ = tx.send(Some(result));
                    });

                    rx
                }
            }
        };

        loop {
            if let Some(result) = rx.borrow_and_update().clone() {
                return result;
            }
            if rx.changed().await.is_err() {
                return Err(ScriptError::LoadFailed(
                    "script load task dropped before completing".to_string(),
                ));
            }
        }
    }
}
