//! Timer service
//!
//! The only source of time-based events. Timers do not carry closures: each
//! one carries a [`TimerEvent`] that is handed back, together with its
//! [`TimerHandle`], when it fires. The owner of the timer service dispatches
//! fired events on its own task, which keeps every state mutation on a single
//! logical thread.
//!
//! Two implementations:
//! - [`ManualTimers`]: virtual clock advanced explicitly (tests)
//! - [`TokioTimers`]: tokio sleeps feeding an mpsc channel (runtime)

mod manual;
mod tokio_timers;

pub use manual::ManualTimers;
pub use tokio_timers::TokioTimers;

/// Identifies one armed timer
///
/// Handles are never reused, so a stale handle can always be told apart
/// from the currently armed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw handle id
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// What a timer means when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Slide time budget exhausted
    AutoAdvance,
    /// Periodic progress fill update
    ProgressTick,
    /// Exit animation done; swap the active slide
    TransitionSwap,
    /// Enter animation done; leave `Transitioning`
    TransitionSettle,
    /// Touch held long enough to count as a long-press
    LongPress,
    /// Restore the share control label after "link copied"
    ShareLabelRestore,
}

/// A timer that has come due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub event: TimerEvent,
    /// Clock reading when the timer fired
    pub at_ms: u64,
}

/// Monotonic clock plus cancellable delayed and periodic timers
///
/// No operation blocks. Cancelling a handle that already fired, or
/// cancelling twice, is a no-op.
pub trait TimerService {
    /// Milliseconds since the service was created
    fn now_ms(&self) -> u64;

    /// Fire `event` once after `delay_ms`
    fn after(&mut self, delay_ms: u64, event: TimerEvent) -> TimerHandle;

    /// Fire `event` every `interval_ms` until cancelled
    fn every(&mut self, interval_ms: u64, event: TimerEvent) -> TimerHandle;

    /// Cancel a timer; unknown or already-fired handles are ignored
    fn cancel(&mut self, handle: TimerHandle);

    /// Whether `handle` is still armed
    fn is_pending(&self, handle: TimerHandle) -> bool;

    /// Number of armed timers
    fn pending_count(&self) -> usize;
}
