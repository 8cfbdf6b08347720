//! Decode parameters: the temporal window and confirmation filter applied
//! uniformly to every pixel of a decode pass.
//!
//! Two construction paths exist:
//! - [`DecodeParameters::new`] is strict and rejects a window that violates
//!   `start <= end <= number_of_days`.
//! - [`DecodeParameters::normalize`] accepts the loosely-typed configuration
//!   surface ([`RawDecodeParameters`]) and never fails. Anything it cannot
//!   make sense of collapses to an empty window, so a bad request shows
//!   nothing instead of faulting the pipeline.
//!
//! Validation happens once, here. Decoders only ever call
//! [`DecodeParameters::contains_day`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::{AlertError, AlertResult};

/// Inclusive window of day indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayWindow {
    /// Matches no day at all.
    Empty,
    /// Closed interval `start..=end`, with `start <= end`.
    Range { start: u32, end: u32 },
}

impl DayWindow {
    /// Check whether a day index falls inside the window (both ends inclusive).
    #[inline]
    pub fn contains(&self, day: u32) -> bool {
        match *self {
            DayWindow::Empty => false,
            DayWindow::Range { start, end } => day >= start && day <= end,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DayWindow::Empty)
    }
}

/// Validated, immutable decode parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeParameters {
    window: DayWindow,
    number_of_days: u32,
    confirmed_only: bool,
}

impl DecodeParameters {
    /// Build parameters, rejecting any window outside `0 <= start <= end <= number_of_days`.
    pub fn new(
        start_day_index: u32,
        end_day_index: u32,
        number_of_days: u32,
        confirmed_only: bool,
    ) -> AlertResult<Self> {
        if start_day_index > end_day_index {
            return Err(AlertError::invalid_parameter(
                "startDayIndex",
                format!(
                    "start {} is after end {}",
                    start_day_index, end_day_index
                ),
            ));
        }
        if end_day_index > number_of_days {
            return Err(AlertError::invalid_parameter(
                "endDayIndex",
                format!(
                    "end {} exceeds numberOfDays {}",
                    end_day_index, number_of_days
                ),
            ));
        }

        Ok(Self {
            window: DayWindow::Range {
                start: start_day_index,
                end: end_day_index,
            },
            number_of_days,
            confirmed_only,
        })
    }

    /// Parameters whose window matches nothing.
    pub fn empty(number_of_days: u32, confirmed_only: bool) -> Self {
        Self {
            window: DayWindow::Empty,
            number_of_days,
            confirmed_only,
        }
    }

    /// Normalize the loosely-typed configuration surface. Never fails.
    ///
    /// Rules:
    /// - missing or negative start becomes 0 (fractional starts round up)
    /// - missing `numberOfDays` takes the end value, missing end takes `numberOfDays`
    /// - fractional ends round down
    /// - an end beyond `numberOfDays` is clamped to it
    /// - start after end, or no end and no `numberOfDays`, gives an empty window
    /// - missing `confirmedOnly` means false
    pub fn normalize(raw: &RawDecodeParameters) -> Self {
        let confirmed_only = raw
            .confirmed_only
            .map(|flag| flag.is_set())
            .unwrap_or(false);

        let start = day_index("startDayIndex", raw.start_day_index, f64::ceil).unwrap_or(0);
        let end = day_index("endDayIndex", raw.end_day_index, f64::floor);
        let days = day_index("numberOfDays", raw.number_of_days, f64::floor);

        let (end, number_of_days) = match (end, days) {
            (Some(end), Some(days)) => {
                if end > days {
                    warn!(end, number_of_days = days, "endDayIndex exceeds numberOfDays, clamping");
                    (days, days)
                } else {
                    (end, days)
                }
            }
            (Some(end), None) => {
                warn!(end, "numberOfDays missing, using endDayIndex");
                (end, end)
            }
            (None, Some(days)) => {
                warn!(number_of_days = days, "endDayIndex missing, using numberOfDays");
                (days, days)
            }
            (None, None) => {
                warn!("no endDayIndex or numberOfDays given, window is empty");
                return Self::empty(0, confirmed_only);
            }
        };

        if start > end {
            warn!(start, end, "startDayIndex after endDayIndex, window is empty");
            return Self::empty(number_of_days, confirmed_only);
        }

        Self {
            window: DayWindow::Range { start, end },
            number_of_days,
            confirmed_only,
        }
    }

    /// Parse the JSON configuration surface and normalize it.
    pub fn from_json(json_str: &str) -> AlertResult<Self> {
        let raw: RawDecodeParameters = serde_json::from_str(json_str)?;
        Ok(Self::normalize(&raw))
    }

    /// Same window, different confirmation filter.
    pub fn with_confirmed_only(self, confirmed_only: bool) -> Self {
        Self {
            confirmed_only,
            ..self
        }
    }

    #[inline]
    pub fn contains_day(&self, day: u32) -> bool {
        self.window.contains(day)
    }

    pub fn window(&self) -> DayWindow {
        self.window
    }

    pub fn start_day_index(&self) -> Option<u32> {
        match self.window {
            DayWindow::Range { start, .. } => Some(start),
            DayWindow::Empty => None,
        }
    }

    pub fn end_day_index(&self) -> Option<u32> {
        match self.window {
            DayWindow::Range { end, .. } => Some(end),
            DayWindow::Empty => None,
        }
    }

    pub fn number_of_days(&self) -> u32 {
        self.number_of_days
    }

    #[inline]
    pub fn confirmed_only(&self) -> bool {
        self.confirmed_only
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

impl From<RawDecodeParameters> for DecodeParameters {
    fn from(raw: RawDecodeParameters) -> Self {
        Self::normalize(&raw)
    }
}

impl fmt::Display for DecodeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.window {
            DayWindow::Range { start, end } => write!(
                f,
                "days {}..={} of {}, confirmed_only={}",
                start, end, self.number_of_days, self.confirmed_only
            ),
            DayWindow::Empty => write!(
                f,
                "empty window of {}, confirmed_only={}",
                self.number_of_days, self.confirmed_only
            ),
        }
    }
}

/// Convert one optional numeric field to a day index.
fn day_index(field: &'static str, value: Option<f64>, round: fn(f64) -> f64) -> Option<u32> {
    let value = value?;
    if !value.is_finite() {
        warn!(field, "non-finite day value ignored");
        return None;
    }
    if value < 0.0 {
        warn!(field, value, "negative day value raised to 0");
        return Some(0);
    }
    Some(round(value).min(u32::MAX as f64) as u32)
}

/// Decode parameters as they arrive from configuration or a UI.
///
/// All fields are optional; see [`DecodeParameters::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDecodeParameters {
    pub start_day_index: Option<f64>,
    pub end_day_index: Option<f64>,
    pub number_of_days: Option<f64>,
    pub confirmed_only: Option<FlagValue>,
}

/// A boolean that may also be sent as a number (`0` / `1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(f64),
}

impl FlagValue {
    /// Numbers count as set when strictly positive.
    pub fn is_set(&self) -> bool {
        match *self {
            FlagValue::Bool(b) => b,
            FlagValue::Number(n) => n > 0.0,
        }
    }
}
