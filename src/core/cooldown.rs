#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A countdown timer that gates how often a discrete action may recur.
///
/// The timer is "hot" while it is above zero. `heat` re-arms it for the full
/// duration and `cool` drains it with elapsed time, never below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Cooldown {
    timer: f64,
    duration: f64,
}

impl Cooldown {
    /// Creates a cooldown with an initial timer and a fixed re-arm duration.
    ///
    /// Negative inputs are floored at zero.
    pub fn new(timer: f64, duration: f64) -> Self {
        Self {
            timer: timer.max(0.0),
            duration: duration.max(0.0),
        }
    }

    /// Creates a cold cooldown that re-arms for `duration`
    pub fn with_duration(duration: f64) -> Self {
        Self::new(0.0, duration)
    }

    /// Re-arms the timer for the full duration
    pub fn heat(&mut self) {
        self.timer = self.duration;
    }

    /// Drains the timer by `dt`, clamped at zero
    pub fn cool(&mut self, dt: f64) {
        debug_assert!(dt >= 0.0, "cooldown cannot run backwards (dt = {})", dt);
        if self.timer <= 0.0 {
            return;
        }
        self.timer = (self.timer - dt.max(0.0)).max(0.0);
    }

    /// Returns true while the timer has not run out
    pub fn is_hot(&self) -> bool {
        self.timer > 0.0
    }

    /// Remaining time before the cooldown is cold again
    pub fn remaining(&self) -> f64 {
        self.timer
    }

    /// The duration `heat` re-arms to
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::with_duration(0.0)
    }
}
