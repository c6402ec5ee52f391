use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use famechase_checkout::presenter::{
    open_checkout, CheckoutHandlers, CheckoutSurface, ProviderApi, ProviderWidget, SurfaceError,
    WidgetError,
};
use famechase_checkout::script_loader::{ScriptError, ScriptHost, ScriptLoader};
use famechase_checkout::Navigator;

const POPUP_URL: &str = "https://www.instamojo.com/@famechase/abc?amount=99.00";
const EMBED_URL: &str = "https://www.instamojo.com/@famechase/abc?embed=form&amount=99.00";

struct InstantHost {
    result: Result<(), ScriptError>,
}

#[async_trait]
impl ScriptHost for InstantHost {
    async fn inject_script(&self, _src: &str) -> Result<(), ScriptError> {
        self.result.clone()
    }
}

fn working_loader() -> ScriptLoader {
    ScriptLoader::new(Arc::new(InstantHost { result: Ok(()) }))
}

fn broken_loader() -> ScriptLoader {
    ScriptLoader::new(Arc::new(InstantHost {
        result: Err(ScriptError::LoadFailed("blocked by network".to_string())),
    }))
}

#[derive(Default)]
struct FakeWidget {
    configure_calls: AtomicUsize,
    opened: Mutex<Vec<String>>,
    reject_configure: bool,
    reject_open: bool,
}

impl ProviderWidget for FakeWidget {
    fn configure(&self, _handlers: &CheckoutHandlers) -> Result<(), WidgetError> {
        self.configure_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_configure {
            Err(WidgetError::Rejected("bad handler shape".to_string()))
        } else {
            Ok(())
        }
    }

    fn open(&self, url: &Url) -> Result<(), WidgetError> {
        if self.reject_open {
            return Err(WidgetError::Rejected("open unsupported".to_string()));
        }
        self.opened
            .lock()
            .expect("widget lock")
            .push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeSurface {
    widget: Option<FakeWidget>,
    overlays: Mutex<Vec<String>>,
    assigned: Mutex<Vec<String>>,
}

impl Navigator for FakeSurface {
    fn assign(&self, url: &str) {
        self.assigned.lock().expect("surface lock").push(url.to_string());
    }

    fn replace(&self, _url: &str) {}
}

#[async_trait]
impl CheckoutSurface for FakeSurface {
    async fn present_overlay(&self, url: &Url) -> Result<(), SurfaceError> {
        self.overlays
            .lock()
            .expect("surface lock")
            .push(url.to_string());
        Ok(())
    }

    fn provider_api(&self) -> ProviderApi<'_> {
        match &self.widget {
            Some(widget) => ProviderApi::Available(widget),
            None => ProviderApi::Unavailable,
        }
    }
}

fn url(s: &str) -> Url {
    Url::parse(s).expect("test url")
}

#[tokio::test]
async fn embed_url_renders_overlay_and_fires_lifecycle_handlers() {
    let surface = FakeSurface {
        widget: Some(FakeWidget::default()),
        ..Default::default()
    };
    let loader = working_loader();

    let opened = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicUsize::new(0));
    let handlers = CheckoutHandlers {
        on_open: Some(Box::new({
            let opened = Arc::clone(&opened);
            move || {
                opened.fetch_add(1, Ordering::SeqCst);
            }
        })),
        on_close: Some(Box::new({
            let closed = Arc::clone(&closed);
            move || {
                closed.fetch_add(1, Ordering::SeqCst);
            }
        })),
        ..Default::default()
    };

    open_checkout(&surface, &loader, &url(EMBED_URL), Some(&handlers)).await;

    assert_eq!(surface.overlays.lock().expect("surface lock").len(), 1);
    assert_eq!(opened.load(Ordering::SeqCst), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    // embed never touches the popup widget
    let widget = surface.widget.as_ref().expect("widget");
    assert_eq!(widget.configure_calls.load(Ordering::SeqCst), 0);
    assert!(widget.opened.lock().expect("widget lock").is_empty());
}

#[tokio::test]
async fn popup_url_goes_through_the_provider_widget() {
    let surface = FakeSurface {
        widget: Some(FakeWidget::default()),
        ..Default::default()
    };
    let loader = working_loader();
    let handlers = CheckoutHandlers::default();

    open_checkout(&surface, &loader, &url(POPUP_URL), Some(&handlers)).await;

    let widget = surface.widget.as_ref().expect("widget");
    assert_eq!(widget.configure_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *widget.opened.lock().expect("widget lock"),
        vec![POPUP_URL.to_string()]
    );
    assert!(surface.overlays.lock().expect("surface lock").is_empty());
    assert!(surface.assigned.lock().expect("surface lock").is_empty());
}

#[tokio::test]
async fn script_load_failure_falls_back_to_navigation() {
    let surface = FakeSurface {
        widget: Some(FakeWidget::default()),
        ..Default::default()
    };
    let loader = broken_loader();

    open_checkout(&surface, &loader, &url(POPUP_URL), None).await;

    assert_eq!(
        *surface.assigned.lock().expect("surface lock"),
        vec![POPUP_URL.to_string()]
    );
    let widget = surface.widget.as_ref().expect("widget");
    assert!(widget.opened.lock().expect("widget lock").is_empty());
}

#[tokio::test]
async fn missing_provider_handle_falls_back_to_navigation() {
    let surface = FakeSurface::default();
    let loader = working_loader();

    open_checkout(&surface, &loader, &url(POPUP_URL), None).await;

    assert_eq!(
        *surface.assigned.lock().expect("surface lock"),
        vec![POPUP_URL.to_string()]
    );
}

#[tokio::test]
async fn configure_rejection_is_swallowed_and_open_still_runs() {
    let surface = FakeSurface {
        widget: Some(FakeWidget {
            reject_configure: true,
            ..Default::default()
        }),
        ..Default::default()
    };
    let loader = working_loader();
    let handlers = CheckoutHandlers::default();

    open_checkout(&surface, &loader, &url(POPUP_URL), Some(&handlers)).await;

    let widget = surface.widget.as_ref().expect("widget");
    assert_eq!(
        *widget.opened.lock().expect("widget lock"),
        vec![POPUP_URL.to_string()]
    );
    assert!(surface.assigned.lock().expect("surface lock").is_empty());
}

#[tokio::test]
async fn widget_open_failure_falls_back_to_navigation() {
    let surface = FakeSurface {
        widget: Some(FakeWidget {
            reject_open: true,
            ..Default::default()
        }),
        ..Default::default()
    };
    let loader = working_loader();

    open_checkout(&surface, &loader, &url(POPUP_URL), None).await;

    assert_eq!(
        *surface.assigned.lock().expect("surface lock"),
        vec![POPUP_URL.to_string()]
    );
}
