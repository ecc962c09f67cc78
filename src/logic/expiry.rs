//! Alert Expiry Scheduler
//!
//! One cancellable timer per alert. A timer never touches dashboard state:
//! it only posts `Command::Expire(id)` back into the service's command
//! channel, where it is serialised with event application.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;

use super::event::EventId;
use super::service::Command;

pub struct ExpiryScheduler {
    dwell: Duration,
    commands: WeakUnboundedSender<Command>,
    timers: HashMap<EventId, JoinHandle<()>>,
}

impl ExpiryScheduler {
    pub fn new(dwell: Duration, commands: WeakUnboundedSender<Command>) -> Self {
        Self {
            dwell,
            commands,
            timers: HashMap::new(),
        }
    }

    /// Start the dwell timer for `id`, replacing any timer already running for it
    pub fn schedule(&mut self, id: EventId) {
        self.cancel(&id);

        let dwell = self.dwell;
        let commands = self.commands.clone();
        let timer_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(dwell).await;
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(Command::Expire(timer_id));
            }
        });

        self.timers.insert(id, handle);
    }

    /// Cancel one timer (manual dismiss or truncation). Others keep running.
    pub fn cancel(&mut self, id: &EventId) -> bool {
        match self.timers.remove(id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Forget a timer that has already fired
    pub fn fired(&mut self, id: &EventId) {
        self.timers.remove(id);
    }

    /// Teardown: abort every pending timer
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for ExpiryScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_timer_posts_expire() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ExpiryScheduler::new(Duration::from_secs(5), tx.downgrade());

        let started = tokio::time::Instant::now();
        scheduler.schedule(EventId::new("a"));

        match rx.recv().await {
            Some(Command::Expire(id)) => assert_eq!(id.as_str(), "a"),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_only_target() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ExpiryScheduler::new(Duration::from_secs(5), tx.downgrade());

        scheduler.schedule(EventId::new("a"));
        scheduler.schedule(EventId::new("b"));
        assert!(scheduler.cancel(&EventId::new("a")));
        assert_eq!(scheduler.pending(), 1);

        match rx.recv().await {
            Some(Command::Expire(id)) => assert_eq!(id.as_str(), "b"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_silences_timers() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
        let mut scheduler = ExpiryScheduler::new(Duration::from_secs(5), tx.downgrade());

        scheduler.schedule(EventId::new("a"));
        scheduler.schedule(EventId::new("b"));
        scheduler.cancel_all();
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }
}
