//! Dashboard Service - Polling loop
//!
//! Owns the dashboard state in a single task:
//! fetch -> apply -> publish snapshot, once per tick, never overlapping.
//! Alert timers and user dismissals come back in through the command
//! channel so every mutation goes through the same path.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::aggregator::{AggregatorConfig, DashboardState, DashboardView};
use super::event::{ClassificationEvent, EventId};
use super::expiry::ExpiryScheduler;
use super::source::{ConnectionStatus, EventSource, StatusCell};
use crate::config::Config;

/// Messages serialised with event application
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// User closed an alert
    Dismiss(EventId),
    /// Alert dwell elapsed
    Expire(EventId),
    /// Stop polling and cancel alert timers
    Shutdown,
}

enum Wake {
    Tick,
    Command(Option<Command>),
}

/// What the presentation layer receives
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub connection: ConnectionStatus,
    pub connection_text: &'static str,
    #[serde(flatten)]
    pub view: DashboardView,
}

pub struct DashboardService<S> {
    poll_interval: Duration,
    source: S,
    state: DashboardState,
    status: StatusCell,
    scheduler: ExpiryScheduler,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<DashboardSnapshot>,
}

/// Handle held by the presentation layer
pub struct DashboardHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<DashboardSnapshot>,
    task: JoinHandle<()>,
}

impl<S: EventSource + 'static> DashboardService<S> {
    /// Start a session now and spawn the polling loop
    pub fn spawn(config: &Config, source: S, status: StatusCell) -> DashboardHandle {
        Self::spawn_with(config, AggregatorConfig::default(), source, status)
    }

    pub fn spawn_with(
        config: &Config,
        limits: AggregatorConfig,
        source: S,
        status: StatusCell,
    ) -> DashboardHandle {
        let session_start = Utc::now();
        let state = DashboardState::with_config(limits, session_start);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let initial = snapshot_of(&state, &status, session_start);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let dwell = limits.alert_dwell.to_std().unwrap_or(Duration::ZERO);
        let service = Self {
            poll_interval: config.poll_interval,
            source,
            state,
            status,
            scheduler: ExpiryScheduler::new(dwell, command_tx.downgrade()),
            commands: command_rx,
            snapshots: snapshot_tx,
        };

        log::info!(
            "Dashboard session started (poll every {}s)",
            config.poll_interval.as_secs_f64()
        );

        DashboardHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task: tokio::spawn(service.run()),
        }
    }

    async fn run(mut self) {
        let mut ticker = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        // A slow fetch skips ticks instead of queueing them
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let wake = tokio::select! {
                _ = ticker.tick() => Wake::Tick,
                command = self.commands.recv() => Wake::Command(command),
            };

            match wake {
                Wake::Tick => self.poll_once().await,
                Wake::Command(Some(Command::Shutdown)) | Wake::Command(None) => break,
                Wake::Command(Some(command)) => self.handle_command(command),
            }
        }

        self.scheduler.cancel_all();
        log::info!("Dashboard session stopped after {} events", self.state.stats().total);
    }

    async fn poll_once(&mut self) {
        match self.source.fetch_next().await {
            Ok(event) => self.ingest(event),
            Err(e) => log::error!("Poll failed: {}", e),
        }
        self.publish();
    }

    fn ingest(&mut self, event: ClassificationEvent) {
        let event_id = event.id.clone();
        match self.state.apply(event, Utc::now()) {
            Ok(outcome) => {
                for id in &outcome.evicted_alerts {
                    self.scheduler.cancel(id);
                }
                if let Some(alert) = outcome.alert {
                    log::warn!(
                        "Threat detected: {} ({:.1}% confidence)",
                        alert.label,
                        alert.confidence * 100.0
                    );
                    self.scheduler.schedule(alert.id);
                } else {
                    log::debug!("Event {} classified {}", event_id, outcome.label);
                }
            }
            Err(e) => log::warn!("Skipping event {}: {}", event_id, e),
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Dismiss(id) => {
                self.scheduler.cancel(&id);
                if self.state.dismiss_alert(&id) {
                    log::debug!("Alert {} dismissed", id);
                }
            }
            Command::Expire(id) => {
                self.scheduler.fired(&id);
                self.state.dismiss_alert(&id);
            }
            Command::Shutdown => {}
        }
        self.publish();
    }

    fn publish(&mut self) {
        let now = Utc::now();
        for id in self.state.expire_alerts(now) {
            self.scheduler.cancel(&id);
        }
        self.snapshots
            .send_replace(snapshot_of(&self.state, &self.status, now));
    }
}

fn snapshot_of(state: &DashboardState, status: &StatusCell, now: DateTime<Utc>) -> DashboardSnapshot {
    let connection = status.get();
    DashboardSnapshot {
        generated_at: now,
        connection,
        connection_text: connection.display_text(),
        view: state.view(now),
    }
}

impl DashboardHandle {
    /// New receiver for snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn dismiss(&self, id: EventId) {
        let _ = self.commands.send(Command::Dismiss(id));
    }

    /// Stop polling, cancel alert timers and wait for the loop to exit
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            log::error!("Dashboard task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DashboardError, DashboardResult};
    use crate::logic::event::fixtures::event;
    use crate::logic::labels::ThreatLabel;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<ClassificationEvent>);

    impl EventSource for Scripted {
        async fn fetch_next(&mut self) -> DashboardResult<ClassificationEvent> {
            self.0
                .pop_front()
                .ok_or_else(|| DashboardError::SourceUnavailable("script exhausted".to_string()))
        }
    }

    fn config(poll_secs: u64) -> Config {
        Config {
            poll_interval: Duration::from_secs(poll_secs),
            ..Config::default()
        }
    }

    async fn next(rx: &mut watch::Receiver<DashboardSnapshot>) -> DashboardSnapshot {
        rx.changed().await.unwrap();
        rx.borrow_and_update().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_applies_and_publishes() {
        let source = Scripted(VecDeque::from(vec![
            event("1", ThreatLabel::Benign, 0.9),
            event("2", ThreatLabel::Benign, 0.9),
        ]));
        let handle = DashboardService::spawn(&config(5), source, StatusCell::default());
        let mut rx = handle.subscribe();

        let initial = handle.snapshot();
        assert_eq!(initial.view.stats.total, 0);
        assert_eq!(initial.connection, ConnectionStatus::Connecting);

        let started = Instant::now();
        let first = next(&mut rx).await;
        assert_eq!(first.view.stats.total, 1);
        assert!(started.elapsed() >= Duration::from_secs(5));

        let second = next(&mut rx).await;
        assert_eq!(second.view.stats.total, 2);
        assert_eq!(second.view.feed[0].id.as_str(), "2");

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_event_skipped() {
        let mut bad = event("bad", ThreatLabel::Bot, 0.9);
        bad.label = "Malware".to_string();
        let source = Scripted(VecDeque::from(vec![bad, event("good", ThreatLabel::Bot, 0.9)]));
        let handle = DashboardService::spawn(&config(5), source, StatusCell::default());
        let mut rx = handle.subscribe();

        let first = next(&mut rx).await;
        assert_eq!(first.view.stats.total, 0);

        let second = next(&mut rx).await;
        assert_eq!(second.view.stats.total, 1);
        assert_eq!(second.view.histogram[&ThreatLabel::Bot], 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_timer_expires_alert() {
        let source = Scripted(VecDeque::from(vec![event("t", ThreatLabel::DDoS, 0.92)]));
        let handle = DashboardService::spawn(&config(600), source, StatusCell::default());
        let mut rx = handle.subscribe();

        let applied = next(&mut rx).await;
        assert_eq!(applied.view.alerts.len(), 1);
        let raised = Instant::now();

        let expired = next(&mut rx).await;
        assert!(expired.view.alerts.is_empty());
        assert!(raised.elapsed() >= Duration::from_secs(5));
        assert_eq!(expired.view.stats.threat_count, 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_removes_alert() {
        let source = Scripted(VecDeque::from(vec![event("t", ThreatLabel::DoS, 0.9)]));
        let handle = DashboardService::spawn(&config(600), source, StatusCell::default());
        let mut rx = handle.subscribe();

        let applied = next(&mut rx).await;
        assert_eq!(applied.view.alerts.len(), 1);

        handle.dismiss(EventId::new("t"));
        let dismissed = next(&mut rx).await;
        assert!(dismissed.view.alerts.is_empty());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_error_keeps_polling() {
        let status = StatusCell::default();
        let handle = DashboardService::spawn(&config(5), Scripted(VecDeque::new()), status);
        let mut rx = handle.subscribe();

        // Each failed tick still publishes; the loop stays alive
        for _ in 0..3 {
            let snapshot = next(&mut rx).await;
            assert_eq!(snapshot.view.stats.total, 0);
        }

        handle.shutdown().await;
    }
}
