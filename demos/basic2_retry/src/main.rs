use crate::tracing_setup::tracing_init;
use easeview::{EaseViewStreamExt, HostLiveness, StreamAdapter};
use futures::{FutureExt, StreamExt};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

mod tracing_setup;

/// Fails on the first attempt, succeeds afterwards. Earlier attempts are slower.
fn flaky_factory() -> impl Fn() -> futures::future::BoxFuture<'static, Result<u64, String>>
       + Send
       + Sync
       + 'static {
    let attempts = Arc::new(AtomicU32::new(0));
    move || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
        async move {
            debug!("Worker | attempt {} running", attempt);
            sleep(Duration::from_millis(300 / u64::from(attempt + 1))).await;
            if attempt == 0 {
                Err(format!("attempt {attempt} failed"))
            } else {
                Ok(u64::from(attempt) * 100)
            }
        }
        .boxed()
    }
}

#[tokio::main]
async fn main() {
    tracing_init();
    let liveness = HostLiveness::new();

    let adapter = StreamAdapter::<(), String, u64, String>::builder(flaky_factory())
        .idle(|_, _| "press retry".to_string())
        .busy(|_| "working...".to_string())
        .data(|_, value| format!("value: {value}"))
        .on_data(|value| info!("  Callback | on_data: {}", value))
        .on_error(|error, _| warn!("  Callback | on_error: {}", error))
        .liveness(liveness.clone())
        .build();

    info!("==========================================");
    warn!("A. Failure falls back to the idle builder");
    if let Err(error) = adapter.mount() {
        warn!("mount failed: {}", error);
        return;
    }
    wait_complete(&adapter).await;
    info!("  Main | paint: {}", adapter.render(&()));

    info!("==========================================");
    warn!("B. Retry twice; the first retry is superseded");
    let retry = adapter.retry_trigger();
    retry.fire();
    sleep(Duration::from_millis(20)).await;
    retry.fire();
    wait_complete(&adapter).await;
    info!("  Main | paint: {}", adapter.render(&()));

    info!("==========================================");
    warn!("C. Settling in the background updates status without callbacks");
    liveness.set_foreground(false);
    retry.fire();
    wait_complete(&adapter).await;
    info!("  Main | paint: {}", adapter.render(&()));

    liveness.unmount();
    adapter.unmount();
    info!("  Main | retry after unmount: {:?}", adapter.start());
}

async fn wait_complete(adapter: &StreamAdapter<(), String, u64, String>) {
    adapter
        .to_stream()
        .stop_if(|status| status.is_complete())
        .for_each(|status| async move {
            debug!("  Main | status: {:?}", status);
        })
        .await;
}
