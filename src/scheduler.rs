//! Deterministic scheduling primitives.
//!
//! The pill never reads a wall clock. The host advances time explicitly, which
//! keeps frame ticks and label timers reproducible in tests.

use log::trace;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<E> {
    handle: TimerHandle,
    deadline: Duration,
    event: E,
}

/// One-shot timers on a virtual clock.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, after: Duration, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            deadline: self.now + after,
            event,
        });
        handle
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        before != self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves the clock forward and pops the next timer due within `elapsed`.
    ///
    /// Timers fire one at a time so that a callback scheduling a follow-up
    /// timer sees the clock at the firing deadline, not at the end of the step.
    /// Call [`TimerQueue::finish_advance`] once this returns `None`.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, E)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(_, p)| (p.deadline, p.handle.0))
            .map(|(i, _)| i)?;
        let fired = self.pending.remove(idx);
        self.now = self.now.max(fired.deadline);
        trace!("Timer {:?} fired at {:?}", fired.handle, self.now);
        Some((fired.handle, fired.event))
    }

    pub fn finish_advance(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

/// Running flag for the self-rescheduling frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLoop {
    Running,
    Stopped,
}

impl FrameLoop {
    pub fn is_running(self) -> bool {
        matches!(self, FrameLoop::Running)
    }
}
