use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opening hours of a node on the synthetic clock, `[start, end]`.
///
/// A window is valid when `start >= 0` and `end > start`. Windows read from
/// external input are not checked on construction; callers validate them with
/// [`TimeWindow::validate`] before they are admitted or sent to the solver.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeWindowError {
    #[error("time window must be two integers separated by a space, got {0:?}")]
    Malformed(String),

    #[error("time window [{start}, {end}] must satisfy 0 <= start < end")]
    Invalid { start: i64, end: i64 },
}

impl TimeWindow {
    pub const fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn try_new(start: i64, end: i64) -> Result<Self, TimeWindowError> {
        let window = TimeWindow::new(start, end);
        window.validate()?;
        Ok(window)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start >= 0 && self.end > self.start
    }

    pub fn validate(&self) -> Result<(), TimeWindowError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(TimeWindowError::Invalid {
                start: self.start,
                end: self.end,
            })
        }
    }
}

impl From<[i64; 2]> for TimeWindow {
    fn from([start, end]: [i64; 2]) -> Self {
        TimeWindow::new(start, end)
    }
}

impl From<TimeWindow> for [i64; 2] {
    fn from(window: TimeWindow) -> Self {
        [window.start, window.end]
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.start, self.end)
    }
}

impl FromStr for TimeWindow {
    type Err = TimeWindowError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split_whitespace().map(str::parse::<i64>);

        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(start)), Some(Ok(end)), None) => TimeWindow::try_new(start, end),
            _ => Err(TimeWindowError::Malformed(input.to_owned())),
        }
    }
}
