//! Timed-phase primitive shared by the conversion and channel-switch state
//! machines.
//!
//! Both machines follow the same shape: enter a phase, remember when, and on
//! every poll ask "has the phase's settle threshold elapsed yet?". The timer
//! is a plain value type so state-machine enums can carry one in their
//! waiting variants.
//!
//! Timestamps are `u32` milliseconds from a monotonic source; comparison uses
//! wrapping subtraction, so the timer keeps working across counter overflow
//! (a little under 50 days for a millisecond tick).

/// One armed settle/conversion wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTimer {
    started_ms: u32,
    threshold_ms: u32,
}

impl SettleTimer {
    /// Arm a timer at `now_ms` that elapses after `threshold_ms`.
    pub const fn start(now_ms: u32, threshold_ms: u32) -> Self {
        Self {
            started_ms: now_ms,
            threshold_ms,
        }
    }

    /// True once `threshold_ms` has passed since arming.
    pub const fn elapsed(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.started_ms) >= self.threshold_ms
    }

    /// The threshold this timer was armed with.
    pub const fn threshold_ms(&self) -> u32 {
        self.threshold_ms
    }
}
