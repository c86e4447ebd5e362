use std::fmt;

use serde::Serialize;

/// Synthetic replay time. It only moves forward within a replay and goes back
/// to zero on reset.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[serde(transparent)]
pub struct SimulationClock(f64);

impl SimulationClock {
    pub const ZERO: SimulationClock = SimulationClock(0.0);

    /// `None` for negative or non-finite values.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(SimulationClock(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whole time units elapsed, as sent to the solver and shown to the user.
    pub fn floored(&self) -> i64 {
        self.0.floor() as i64
    }

    /// Clock after one tick of `increment`, capped at `horizon`. Never earlier
    /// than the current value, even when `horizon` is.
    pub fn advanced(&self, increment: f64, horizon: f64) -> Self {
        SimulationClock((self.0 + increment).min(horizon).max(self.0))
    }

    pub fn has_reached(&self, time: f64) -> bool {
        self.0 >= time
    }
}

impl fmt::Display for SimulationClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.floored())
    }
}
