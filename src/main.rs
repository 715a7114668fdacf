use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use fxmirror::config::AppConfig;
use fxmirror::notify::{BroadcastSink, Dashboard};
use fxmirror::runner::Runner;
use fxmirror::sim::Simulation;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(config.runtime.json_logs);

    info!(config = %config, "[RUNNER] Configuration loaded");

    let (core_rng, ui_rng) = match config.sim.seed {
        Some(seed) => (
            StdRng::seed_from_u64(seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => (StdRng::from_entropy(), StdRng::from_entropy()),
    };

    let epoch_secs = chrono::Utc::now().timestamp();
    let sim = Simulation::new(&config, epoch_secs, core_rng);
    let dashboard = Dashboard::new(&config.notifications, sim.instrument(), ui_rng);

    let broadcaster = BroadcastSink::new(config.runtime.broadcast_capacity);
    let mut rx = broadcaster.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(payload) => debug!(%payload, "[RUNNER] Event"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "[RUNNER] Event subscriber lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut runner = Runner::new(&config, sim, (dashboard, broadcaster));
    let summary = runner.run(shutdown_signal()).await;

    let (dashboard, _) = runner.sink();
    info!(
        sim_ms = summary.sim_ms,
        frames = summary.frames,
        notifications = dashboard.feed().total(),
        toasts = dashboard.toasts().len(),
        "[RUNNER] Session finished"
    );
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
