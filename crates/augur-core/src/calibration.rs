//! Calibration state for the update timing model.
//!
//! Two knobs are tuned at very different cadences:
//!
//! - **Rate**: the total duration of an update, one per [`Mode`]. Replaced
//!   outright when the operator recalibrates from a known update length.
//! - **Offset**: the model's current error. Accumulated from every observed
//!   region update, so repeated observations compound.
//!
//! A manual **nudge** in whole seconds sits on top of both.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::mode::Mode;

/// Default length of the major update in seconds.
pub const DEFAULT_MAJOR_SECONDS: u64 = 5400;

/// Default length of the minor update in seconds.
pub const DEFAULT_MINOR_SECONDS: u64 = 3600;

/// Total update durations the model starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateDurations {
    /// Length of the major update in seconds.
    pub major: Decimal,
    /// Length of the minor update in seconds.
    pub minor: Decimal,
}

impl Default for UpdateDurations {
    fn default() -> Self {
        Self {
            major: Decimal::from(DEFAULT_MAJOR_SECONDS),
            minor: Decimal::from(DEFAULT_MINOR_SECONDS),
        }
    }
}

/// Mutable calibration applied on top of the linear model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalibrationState {
    major_rate: Decimal,
    minor_rate: Decimal,
    offset: Decimal,
    nudge: i64,
}

impl CalibrationState {
    /// Fresh calibration with the given durations and no offset or nudge.
    pub const fn new(durations: UpdateDurations) -> Self {
        Self {
            major_rate: durations.major,
            minor_rate: durations.minor,
            offset: Decimal::ZERO,
            nudge: 0,
        }
    }

    /// Total duration of the given update in seconds.
    pub const fn rate(&self, mode: Mode) -> Decimal {
        match mode {
            Mode::Major => self.major_rate,
            Mode::Minor => self.minor_rate,
        }
    }

    /// Accumulated offset in seconds, subtracted from every prediction.
    pub const fn offset(&self) -> Decimal {
        self.offset
    }

    /// Manual bias in seconds, subtracted from every prediction.
    pub const fn nudge(&self) -> i64 {
        self.nudge
    }

    /// Replace the duration of one update and clear the offset.
    ///
    /// The other mode's duration is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `duration` is not positive.
    pub fn replace_rate(&mut self, mode: Mode, duration: Decimal) -> Result<(), CoreError> {
        if duration <= Decimal::ZERO {
            return Err(CoreError::invalid_input(format!(
                "update duration must be positive, got {duration}"
            )));
        }
        match mode {
            Mode::Major => self.major_rate = duration,
            Mode::Minor => self.minor_rate = duration,
        }
        self.offset = Decimal::ZERO;
        Ok(())
    }

    /// Fold one observation's error into the offset.
    ///
    /// `estimate` is the uncorrected model time for the observed region.
    /// Returns the new offset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Overflow`] if the decimal sum overflows. The
    /// offset is unchanged in that case.
    pub fn accumulate_offset(
        &mut self,
        estimate: Decimal,
        observed: Decimal,
    ) -> Result<Decimal, CoreError> {
        let error = estimate.checked_sub(observed).ok_or(CoreError::Overflow {
            context: "observation error",
        })?;
        let offset = self.offset.checked_add(error).ok_or(CoreError::Overflow {
            context: "offset",
        })?;
        self.offset = offset;
        Ok(offset)
    }

    /// Add `delta` seconds to the nudge. Returns the new nudge.
    pub const fn add_nudge(&mut self, delta: i64) -> i64 {
        self.nudge = self.nudge.saturating_add(delta);
        self.nudge
    }
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self::new(UpdateDurations::default())
    }
}
