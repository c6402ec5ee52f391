// src/presenter.rs
//
// Opens an Instamojo checkout either through the provider's popup widget or
// through an embedded overlay iframe. Every provider/script fault degrades to
// plain navigation; nothing here returns an error to the caller.

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::instamojo::is_embed_url;
use crate::script_loader::ScriptLoader;
use crate::Navigator;

type EventHandler = Box<dyn Fn() + Send + Sync>;
type ResponseHandler = Box<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Optional checkout lifecycle callbacks. All invocations are best effort:
/// the presenter never lets a handler abort the flow.
#[derive(Default)]
pub struct CheckoutHandlers {
    pub on_open: Option<EventHandler>,
    pub on_close: Option<EventHandler>,
    pub on_success: Option<ResponseHandler>,
    pub on_failure: Option<ResponseHandler>,
}

impl CheckoutHandlers {
    fn notify_open(&self) {
        if let Some(on_open) = &self.on_open {
            on_open();
        }
    }

    fn notify_close(&self) {
        if let Some(on_close) = &self.on_close {
            on_close();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    Rejected(String),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::Rejected(e) => write!(f, "provider widget rejected the call: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    OverlayFailed(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::OverlayFailed(e) => write!(f, "checkout overlay failed: {e}"),
        }
    }
}

/// The provider's global checkout handle, when the loaded script exposed one.
///
/// `Available` guarantees an `open` entry point; `configure` support is still
/// probed per call because older script builds ship without it.
pub enum ProviderApi<'a> {
    Available(&'a dyn ProviderWidget),
    Unavailable,
}

pub trait ProviderWidget {
    /// Registers lifecycle handlers with the widget. May be rejected when the
    /// script build has no `configure` entry point or dislikes the shape.
    fn configure(&self, handlers: &CheckoutHandlers) -> Result<(), WidgetError>;
    fn open(&self, url: &Url) -> Result<(), WidgetError>;
}

/// Page capabilities the presenter needs: mounting the embed overlay,
/// reaching the provider widget, and plain navigation (via [`Navigator`]).
#[async_trait]
pub trait CheckoutSurface: Navigator {
    /// Mounts the full-screen overlay with an iframe at `url` and resolves
    /// when the user dismisses it (close button, backdrop self-click, or a
    /// one-shot Escape listener). The implementation removes the overlay
    /// node before resolving.
    async fn present_overlay(&self, url: &Url) -> Result<(), SurfaceError>;

    fn provider_api(&self) -> ProviderApi<'_>;
}

/// Opens `checkout_url` on `surface`.
///
/// Embed URLs (`embed=form` in the query) render in the overlay; everything
/// else goes through the popup widget, falling back tier by tier — script
/// load, provider handle, widget `open` — to direct navigation.
pub async fn open_checkout(
    surface: &dyn CheckoutSurface,
    loader: &ScriptLoader,
    checkout_url: &Url,
    handlers: Option<&CheckoutHandlers>,
) {
    if is_embed_url(checkout_url) {
        if let Some(handlers) = handlers {
            handlers.notify_open();
        }
        match surface.present_overlay(checkout_url).await {
            Ok(()) => {
                if let Some(handlers) = handlers {
                    handlers.notify_close();
                }
            }
            Err(e) => {
                log::warn!("embed overlay failed, falling back to navigation: {e}");
                surface.assign(checkout_url.as_str());
            }
        }
        return;
    }

    if let Err(e) = loader.ensure_loaded().await {
        log::warn!("falling back to direct navigation for Instamojo: {e}");
        surface.assign(checkout_url.as_str());
        return;
    }

    match surface.provider_api() {
        ProviderApi::Available(widget) => {
            if let Some(handlers) = handlers {
                if let Err(e) = widget.configure(handlers) {
                    log::debug!("provider widget refused handler registration: {e}");
                }
            }
            if let Err(e) = widget.open(checkout_url) {
                log::warn!("provider widget open failed, navigating directly: {e}");
                surface.assign(checkout_url.as_str());
            }
        }
        ProviderApi::Unavailable => {
            // script claimed to load but never exposed the handle
            surface.assign(checkout_url.as_str());
        }
    }
}
