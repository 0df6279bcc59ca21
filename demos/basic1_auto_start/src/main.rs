use crate::tracing_setup::tracing_init;
use easeview::{EaseViewStreamExt, StreamAdapter};
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

mod tracing_setup;

#[derive(Debug, Clone)]
struct Profile {
    id: u32,
    name: String,
}

async fn fetch_profile() -> Result<Profile, String> {
    sleep(Duration::from_millis(300)).await;
    Ok(Profile {
        id: 1,
        name: "ease".to_string(),
    })
}

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("Auto start: busy, then data");

    let adapter = StreamAdapter::<&str, String, Profile, String>::builder(fetch_profile)
        .busy(|screen| format!("[{screen}] fetching profile..."))
        .data(|screen, profile| format!("[{screen}] #{} {}", profile.id, profile.name))
        .on_data(|profile| info!("  Callback | on_data: {:?}", profile))
        .render_host(|| info!("  Host | render requested"))
        .build();

    if let Err(error) = adapter.mount() {
        warn!("mount failed: {}", error);
        return;
    }

    adapter
        .render_signal("profile")
        .to_stream()
        .stop_if(|node| !node.ends_with("..."))
        .for_each(|node| async move {
            info!("  Main | paint: {}", node);
        })
        .await;

    info!("  Main | final status: {:?}", adapter.status());
}
