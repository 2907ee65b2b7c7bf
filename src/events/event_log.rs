use crate::events::{EventKind, SimulationEvent};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Append-only, totally ordered trace of every actor transition.
///
/// # Architecture Note
/// The log is cheap to clone (it is an `Arc`) and is handed to every actor and
/// resource at construction. An append takes the lock, stamps the event with
/// its position and its offset from the epoch, and pushes it, so the position
/// order, the timestamp order and the real append order are the same order.
///
/// Timestamps come from `tokio::time`, so tests running with paused time see
/// virtual, fully reproducible offsets.
#[derive(Clone)]
pub struct EventLog {
    inner: Arc<LogInner>,
}

struct LogInner {
    epoch: Instant,
    events: Mutex<Vec<SimulationEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LogInner {
                epoch: Instant::now(),
                events: Mutex::new(Vec::new()),
            }),
        }
    }

    // A panic while holding the lock cannot leave a half-pushed event behind,
    // so a poisoned log is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<SimulationEvent>> {
        self.inner
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `kind` and returns the timestamp it was recorded with.
    pub fn record(&self, kind: EventKind) -> Duration {
        let mut events = self.lock();
        let at = self.inner.epoch.elapsed();
        let seq = events.len() as u64;
        debug!(seq, at_ms = at.as_millis() as u64, "{}", kind);
        events.push(SimulationEvent { seq, at, kind });
        at
    }

    /// Time since the log was created.
    pub fn elapsed(&self) -> Duration {
        self.inner.epoch.elapsed()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A copy of everything appended so far, in log order.
    pub fn snapshot(&self) -> Vec<SimulationEvent> {
        self.lock().clone()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
