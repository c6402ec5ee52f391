// src/upi.rs
//
// Best-effort UPI deep-link launch. The detection heuristic is inherently
// ambiguous: a context that closes quickly could mean the native app took
// over, or that the user dismissed it instantly. Callers must treat a `true`
// result as a UX hint, never as proof of payment.

use std::time::Duration;

use crate::Navigator;

/// How long we wait for the opened context to close before assuming the app
/// is not installed.
pub const APP_OPEN_TIMEOUT: Duration = Duration::from_millis(2000);

/// Poll granularity while watching for the context to close.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct UpiApp {
    pub id: &'static str,
    pub name: &'static str,
    pub app_scheme: &'static str,
    pub web_fallback: &'static str,
}

const UPI_APPS: &[UpiApp] = &[
    UpiApp {
        id: "phonepe",
        name: "PhonePe",
        app_scheme: "phonepe://",
        web_fallback: "https://phon.pe/",
    },
    UpiApp {
        id: "googlepay",
        name: "Google Pay",
        app_scheme: "tez://upi/",
        web_fallback: "https://pay.google.com/",
    },
    UpiApp {
        id: "paytm",
        name: "Paytm",
        app_scheme: "paytmmp://",
        web_fallback: "https://paytm.com/",
    },
    UpiApp {
        id: "bhim",
        name: "BHIM",
        app_scheme: "bhim://",
        web_fallback: "https://www.bhimupi.org.in/",
    },
];

pub fn upi_apps() -> &'static [UpiApp] {
    UPI_APPS
}

pub fn upi_app(id: &str) -> Option<&'static UpiApp> {
    UPI_APPS.iter().find(|app| app.id == id)
}

/// A browsing context opened for the deep link.
pub trait PaymentWindow: Send {
    fn is_closed(&self) -> bool;
    fn close(&self);
}

/// Capability for opening a new browsing context. Returns `None` when the
/// popup was blocked.
pub trait WindowOpener: Send + Sync {
    fn open_window(&self, url: &str) -> Option<Box<dyn PaymentWindow>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiAttempt {
    pub success: bool,
    pub message: String,
}

/// Opens `url` in a new context and watches whether it closes within the
/// timeout. Closed-before-timeout reads as "a native app intercepted the
/// scheme"; a timeout closes the leftover context and reads as "app not
/// installed".
pub async fn attempt_app_open(opener: &dyn WindowOpener, url: &str) -> bool {
    let Some(window) = opener.open_window(url) else {
        // popup blocked
        return false;
    };
    if window.is_closed() {
        return false;
    }

    let deadline = tokio::time::Instant::now() + APP_OPEN_TIMEOUT;
    loop {
        if window.is_closed() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            window.close();
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Tries to hand `payment_url` to the named UPI app, falling back to a plain
/// web redirect when the app is unavailable.
pub async fn handle_upi_app_payment(
    opener: &dyn WindowOpener,
    navigator: &dyn Navigator,
    app_id: &str,
    payment_url: &str,
) -> UpiAttempt {
    let Some(app) = upi_app(app_id) else {
        log::error!("unknown UPI app requested: {app_id}");
        return UpiAttempt {
            success: false,
            message:
                "Failed to open payment app. Please try again or use a different payment method."
                    .to_string(),
        };
    };

    log::info!("attempting to open {}", app.name);

    if attempt_app_open(opener, payment_url).await {
        UpiAttempt {
            success: true,
            message: format!("Opening {}...", app.name),
        }
    } else {
        log::info!("{} app not available, using web fallback", app.name);
        navigator.assign(payment_url);
        UpiAttempt {
            success: true,
            message: "Redirecting to payment page...".to_string(),
        }
    }
}
