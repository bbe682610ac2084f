//! Virtual-time timer service

use super::{Fired, TimerEvent, TimerHandle, TimerService};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Entry {
    event: TimerEvent,
    deadline_ms: u64,
    /// Set for periodic timers
    interval_ms: Option<u64>,
}

/// Deterministic timer service driven by an explicit virtual clock
///
/// Time only moves when the owner calls [`pop_due`](Self::pop_due) or
/// [`set_now`](Self::set_now). Due timers come out one at a time in deadline
/// order (ties in arming order), so a handler may arm or cancel timers before
/// the next one is popped.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now_ms: u64,
    next_id: u64,
    entries: BTreeMap<TimerHandle, Entry>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the earliest timer due at or before `until_ms`
    ///
    /// Moves the clock to the timer's deadline. Periodic timers are re-armed
    /// one interval later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let (handle, deadline_ms) = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline_ms <= until_ms)
            .min_by_key(|(handle, entry)| (entry.deadline_ms, **handle))
            .map(|(handle, entry)| (*handle, entry.deadline_ms))?;

        self.now_ms = self.now_ms.max(deadline_ms);

        let event = match self.entries.get_mut(&handle) {
            Some(entry) => match entry.interval_ms {
                Some(interval) => {
                    entry.deadline_ms += interval;
                    entry.event
                }
                None => {
                    let event = entry.event;
                    self.entries.remove(&handle);
                    event
                }
            },
            None => return None,
        };

        Some(Fired {
            handle,
            event,
            at_ms: self.now_ms,
        })
    }

    /// Move the clock forward without firing anything
    ///
    /// The clock never runs backward; earlier readings are ignored.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Deadline of an armed timer
    pub fn deadline(&self, handle: TimerHandle) -> Option<u64> {
        self.entries.get(&handle).map(|entry| entry.deadline_ms)
    }

    /// Armed timers carrying `event`
    pub fn pending_with(&self, event: TimerEvent) -> Vec<TimerHandle> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.event == event)
            .map(|(handle, _)| *handle)
            .collect()
    }

    fn arm(&mut self, delay_ms: u64, event: TimerEvent, interval_ms: Option<u64>) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        self.entries.insert(
            handle,
            Entry {
                event,
                deadline_ms: self.now_ms + delay_ms,
                interval_ms,
            },
        );
        handle
    }
}

impl TimerService for ManualTimers {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn after(&mut self, delay_ms: u64, event: TimerEvent) -> TimerHandle {
        self.arm(delay_ms, event, None)
    }

    fn every(&mut self, interval_ms: u64, event: TimerEvent) -> TimerHandle {
        // a zero period would fire forever without time moving
        let interval_ms = interval_ms.max(1);
        self.arm(interval_ms, event, Some(interval_ms))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.entries.remove(&handle);
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    fn pending_count(&self) -> usize {
        self.entries.len()
    }
}
