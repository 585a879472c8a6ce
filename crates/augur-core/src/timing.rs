//! Rendering and parsing of update times as hours, minutes, and seconds.
//!
//! Rendering floors the prediction first and then splits it with floored
//! division, so a negative prediction stays negative: `-100` seconds renders
//! as `-1:58:20` (minus one hour plus 58 minutes and 20 seconds). Negative
//! predictions are shown as they are, not clamped.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::error::CoreError;

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;
const MINUTES_PER_HOUR: i64 = 60;

/// An update time split into hours, minutes, and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateTime {
    /// Whole hours, `floor(s / 3600)`. Negative for negative predictions.
    pub hours: i64,
    /// Minutes past the hour, `floor(s / 60) mod 60`.
    pub minutes: i64,
    /// Seconds past the minute, `floor(s) mod 60`.
    pub seconds: i64,
}

impl UpdateTime {
    /// Split a prediction in seconds into hours, minutes, and seconds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Overflow`] if the floored value does not fit in
    /// an `i64`.
    pub fn from_seconds(seconds: Decimal) -> Result<Self, CoreError> {
        let total = seconds.floor().to_i64().ok_or(CoreError::Overflow {
            context: "update time",
        })?;
        Ok(Self {
            hours: total.div_euclid(SECONDS_PER_HOUR),
            minutes: total
                .div_euclid(SECONDS_PER_MINUTE)
                .rem_euclid(MINUTES_PER_HOUR),
            seconds: total.rem_euclid(SECONDS_PER_MINUTE),
        })
    }
}

impl fmt::Display for UpdateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Parse an operator-entered `h:m:s` time into seconds.
///
/// Each field is a plain integer; fields are not range checked, so `0:90:0`
/// means ninety minutes.
///
/// # Errors
///
/// Returns [`CoreError::InvalidInput`] if the string does not have exactly
/// three integer fields or the total overflows.
pub fn parse_hms(input: &str) -> Result<i64, CoreError> {
    let fields: Vec<&str> = input.trim().split(':').collect();
    let &[h, m, s] = fields.as_slice() else {
        return Err(CoreError::invalid_input(format!(
            "expected h:m:s, got {input:?}"
        )));
    };

    let parse = |field: &str| {
        field
            .trim()
            .parse::<i64>()
            .map_err(|e| CoreError::invalid_input(format!("invalid time field {field:?}: {e}")))
    };
    let (h, m, s) = (parse(h)?, parse(m)?, parse(s)?);

    h.checked_mul(SECONDS_PER_HOUR)
        .and_then(|hs| m.checked_mul(SECONDS_PER_MINUTE).and_then(|ms| hs.checked_add(ms)))
        .and_then(|hm| hm.checked_add(s))
        .ok_or_else(|| CoreError::invalid_input(format!("time out of range: {input:?}")))
}
