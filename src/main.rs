//! ThreatWatch - Main Entry Point
//!
//! Headless runner: polls the classifier and logs a one-line summary for
//! every published snapshot.

use threatwatch_core::constants::{APP_NAME, APP_VERSION};
use threatwatch_core::{Config, ConfiguredSource, DashboardService, DashboardSnapshot, StatusCell};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = Config::from_env();
    log::info!("   Endpoint: {}", config.predict_url());
    log::info!("   Source: {:?}", config.source);
    log::info!("   Poll interval: {}s", config.poll_interval.as_secs());

    let status = StatusCell::default();
    let source = match ConfiguredSource::from_config(&config, status.clone()) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Failed to initialize event source: {}", e);
            return;
        }
    };

    let handle = DashboardService::spawn(&config, source, status);
    let mut snapshots = handle.subscribe();

    loop {
        let changed = tokio::select! {
            changed = snapshots.changed() => changed.is_ok(),
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down...");
                false
            }
        };
        if !changed {
            break;
        }

        let snapshot = snapshots.borrow_and_update().clone();
        log_summary(&snapshot);
    }

    handle.shutdown().await;
}

fn log_summary(snapshot: &DashboardSnapshot) {
    let view = &snapshot.view;
    log::info!(
        "[{}] {} {} ({:.1}%) | total={} threats={} ({:.1}%) rate={:.1}/s | alerts={}",
        snapshot.connection_text,
        view.current.headline,
        view.current.label,
        view.current.confidence * 100.0,
        view.stats.total,
        view.stats.threat_count,
        view.stats.threat_ratio,
        view.stats.rate,
        view.alerts.len(),
    );
}
