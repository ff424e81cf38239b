//! Headless photowall runner.
//!
//! Wires the display service to in-memory demo collaborators and runs it
//! until ctrl-c. Useful for watching the reconciliation and effect
//! behavior from the log stream without a renderer attached.

mod demo;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use photowall_core::DisplayService;

#[derive(Parser)]
#[command(version, about = "photowall display service")]
struct Args {
    /// Settings row id to follow
    #[arg(long, default_value = "default")]
    settings_id: String,

    /// Poll fallback cadence in seconds
    #[arg(long, default_value_t = 30)]
    poll_secs: u64,

    /// Number of photos to seed the demo store with
    #[arg(long, default_value_t = 5)]
    seed: usize,

    /// Push a demo insert every N seconds (omit to disable)
    #[arg(long)]
    insert_secs: Option<u64>,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let args = Args::parse();

    let settings_source = demo::DemoSettingsSource;
    let photo_source = demo::DemoPhotoSource::seeded(args.seed);

    let (effect_tx, effect_rx) = mpsc::channel(64);
    let (service, handle) = DisplayService::new(
        settings_source,
        photo_source.clone(),
        args.settings_id,
        effect_tx,
    );
    let service = service.with_poll_interval(Duration::from_secs(args.poll_secs));
    let service_task = tokio::spawn(service.run());

    handle
        .attach_surface(Arc::new(demo::LoggingSurface::new()))
        .await
        .ok();

    tokio::spawn(demo::log_effect_updates(effect_rx));

    if let Some(every) = args.insert_secs {
        tokio::spawn(demo::push_inserts(
            photo_source.clone(),
            Duration::from_secs(every),
        ));
    }

    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
    handle.shutdown().await.ok();
    service_task.await.ok();
}
