//! Tokio-backed timer service
//!
//! Each armed timer is a spawned task that sleeps and then sends a [`Fired`]
//! message to the driver. The driver must pass every received message through
//! [`TokioTimers::accept`] before dispatching it: a timer cancelled after its
//! task already sent is dropped there.

use super::{Fired, TimerEvent, TimerHandle, TimerService};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

struct Armed {
    task: JoinHandle<()>,
    periodic: bool,
}

/// Timer service running on the tokio runtime
///
/// Must be created inside a runtime (timers are spawned tasks).
pub struct TokioTimers {
    origin: Instant,
    next_id: u64,
    armed: HashMap<TimerHandle, Armed>,
    tx: mpsc::UnboundedSender<Fired>,
}

impl TokioTimers {
    /// Create the service and the receiver fired timers arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Fired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timers = Self {
            origin: Instant::now(),
            next_id: 0,
            armed: HashMap::new(),
            tx,
        };
        (timers, rx)
    }

    /// Check a received message against the armed set
    ///
    /// Returns `false` for timers cancelled after they were sent. One-shot
    /// timers are retired here.
    pub fn accept(&mut self, fired: &Fired) -> bool {
        match self.armed.get(&fired.handle) {
            None => {
                debug!("Discarding {} ({:?}): cancelled", fired.handle, fired.event);
                false
            }
            Some(armed) if armed.periodic => true,
            Some(_) => {
                self.armed.remove(&fired.handle);
                true
            }
        }
    }

    fn next_handle(&mut self) -> TimerHandle {
        self.next_id += 1;
        TimerHandle::new(self.next_id)
    }

    fn elapsed_ms(origin: Instant) -> u64 {
        origin.elapsed().as_millis() as u64
    }
}

impl TimerService for TokioTimers {
    fn now_ms(&self) -> u64 {
        Self::elapsed_ms(self.origin)
    }

    fn after(&mut self, delay_ms: u64, event: TimerEvent) -> TimerHandle {
        let handle = self.next_handle();
        let tx = self.tx.clone();
        let origin = self.origin;

        let task = tokio::spawn(async move {
            time::sleep(Duration::from_millis(delay_ms)).await;
            let _ = tx.send(Fired {
                handle,
                event,
                at_ms: Self::elapsed_ms(origin),
            });
        });

        self.armed.insert(handle, Armed { task, periodic: false });
        handle
    }

    fn every(&mut self, interval_ms: u64, event: TimerEvent) -> TimerHandle {
        let handle = self.next_handle();
        let tx = self.tx.clone();
        let origin = self.origin;
        let period = Duration::from_millis(interval_ms.max(1));

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let fired = Fired {
                    handle,
                    event,
                    at_ms: Self::elapsed_ms(origin),
                };
                if tx.send(fired).is_err() {
                    break;
                }
            }
        });

        self.armed.insert(handle, Armed { task, periodic: true });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(armed) = self.armed.remove(&handle) {
            armed.task.abort();
        }
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.armed.contains_key(&handle)
    }

    fn pending_count(&self) -> usize {
        self.armed.len()
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for (_, armed) in self.armed.drain() {
            armed.task.abort();
        }
    }
}
