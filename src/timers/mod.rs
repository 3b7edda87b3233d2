//! Delay and reveal scheduling
//!
//! Provides:
//! - delay_seconds: one pending wall-clock timeout at a time
//! - end_delay: cancel a pending timeout early (keypress skips a reveal)
//! - poll: fire a due timeout exactly once

use std::time::{Duration, Instant};

use tracing::debug;

/// A one-shot delay that fires after a number of seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delay {
    /// When the delay should fire
    pub fire_at: Instant,
}

impl Delay {
    /// Create a new delay starting at `now`
    pub fn new(now: Instant, seconds: u32) -> Self {
        Self {
            fire_at: now + Duration::from_secs(u64::from(seconds)),
        }
    }

    /// Check if delay is due to fire
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.fire_at
    }
}

/// Cooperative single-slot timer driving the combat reveals.
///
/// Scheduling a new delay replaces the pending one. The owner is expected to
/// call [`DelayScheduler::poll`] from its dispatch loop and run its timeout
/// handler whenever it returns `true`.
#[derive(Debug, Default)]
pub struct DelayScheduler {
    pending: Option<Delay>,
    fired: u64,
}

impl DelayScheduler {
    /// Create a scheduler with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timeout `seconds` from now
    pub fn delay_seconds(&mut self, seconds: u32) {
        self.delay_seconds_at(Instant::now(), seconds);
    }

    /// Schedule a timeout `seconds` after `now`
    pub fn delay_seconds_at(&mut self, now: Instant, seconds: u32) {
        if self.pending.is_some() {
            debug!("replacing pending delay with {}s delay", seconds);
        } else {
            debug!("scheduling {}s delay", seconds);
        }
        self.pending = Some(Delay::new(now, seconds));
    }

    /// Cancel the pending delay. Returns whether one was active.
    pub fn end_delay(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether a delay is pending
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    /// Fire the pending delay if it is due. Returns `true` exactly once per delay.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(delay) if delay.is_due(now) => {
                self.pending = None;
                self.fired += 1;
                true
            }
            _ => false,
        }
    }

    /// Number of delays that ran to completion
    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}
