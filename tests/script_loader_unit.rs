use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use famechase_checkout::script_loader::{ScriptError, ScriptHost, ScriptLoader};

/// Host whose injection blocks until the test fires the "load event".
struct GatedHost {
    injections: AtomicUsize,
    release: watch::Receiver<Option<Result<(), ScriptError>>>,
}

#[async_trait]
impl ScriptHost for GatedHost {
    async fn inject_script(&self, _src: &str) -> Result<(), ScriptError> {
        self.injections.fetch_add(1, Ordering::SeqCst);
        let mut release = self.release.clone();
        loop {
            if let Some(result) = release.borrow_and_update().clone() {
                return result;
            }
            release.changed().await.expect("release channel closed");
        }
    }
}

/// Host that fails its first injection and succeeds afterwards.
struct FlakyHost {
    injections: AtomicUsize,
}

#[async_trait]
impl ScriptHost for FlakyHost {
    async fn inject_script(&self, _src: &str) -> Result<(), ScriptError> {
        if self.injections.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(ScriptError::LoadFailed("network error".to_string()))
        } else {
            Ok(())
        }
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_a_single_injection() {
    let (release_tx, release_rx) = watch::channel(None);
    let host = Arc::new(GatedHost {
        injections: AtomicUsize::new(0),
        release: release_rx,
    });
    let loader = ScriptLoader::new(host.clone());

    let all = async {
        tokio::join!(
            loader.ensure_loaded(),
            loader.ensure_loaded(),
            loader.ensure_loaded(),
            loader.ensure_loaded(),
            loader.ensure_loaded(),
        )
    };
    tokio::pin!(all);

    // give the loader time to start; nothing may resolve before the load event
    tokio::select! {
        _ = &mut all => panic!("callers resolved before the script load event"),
        _ = tokio::time::sleep(Duration::from_millis(50)) => {}
    }
    assert_eq!(host.injections.load(Ordering::SeqCst), 1);

    release_tx.send(Some(Ok(()))).expect("release load event");

    let (r1, r2, r3, r4, r5) = all.await;
    for result in [r1, r2, r3, r4, r5] {
        assert!(result.is_ok());
    }
    assert_eq!(host.injections.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn loaded_state_short_circuits_later_calls() {
    let (release_tx, release_rx) = watch::channel(Some(Ok(())));
    let host = Arc::new(GatedHost {
        injections: AtomicUsize::new(0),
        release: release_rx,
    });
    let loader = ScriptLoader::new(host.clone());

    loader.ensure_loaded().await.expect("first load");
    loader.ensure_loaded().await.expect("second load");
    loader.ensure_loaded().await.expect("third load");

    drop(release_tx);
    assert_eq!(host.injections.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_load_resets_state_so_the_next_call_retries() {
    let host = Arc::new(FlakyHost {
        injections: AtomicUsize::new(0),
    });
    let loader = ScriptLoader::new(host.clone());

    let first = loader.ensure_loaded().await;
    assert!(matches!(first, Err(ScriptError::LoadFailed(_))));

    loader.ensure_loaded().await.expect("retry succeeds");
    assert_eq!(host.injections.load(Ordering::SeqCst), 2);
}
