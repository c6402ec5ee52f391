use std::sync::Mutex;

use famechase_checkout::Navigator;

/// Records every navigation so tests can assert on fallback behaviour.
#[derive(Default)]
pub struct RecordingNavigator {
    pub assigned: Mutex<Vec<String>>,
    pub replaced: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assigned_urls(&self) -> Vec<String> {
        self.assigned.lock().expect("navigator lock").clone()
    }

    pub fn replaced_urls(&self) -> Vec<String> {
        self.replaced.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn assign(&self, url: &str) {
        self.assigned.lock().expect("navigator lock").push(url.to_string());
    }

    fn replace(&self, url: &str) {
        self.replaced.lock().expect("navigator lock").push(url.to_string());
    }
}
