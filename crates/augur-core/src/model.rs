//! The update timing model.
//!
//! A region's update time is modelled as proportional to how much population
//! updates before it:
//!
//! ```text
//! predict = cumulative_population * rate[mode] / total_population - offset - nudge
//! ```
//!
//! `rate[mode]` is the total duration of the update, so the last region in
//! the catalog is predicted just short of the full duration. The model is a
//! linear approximation; predictions may be negative or exceed the duration
//! once calibration is applied.
//!
//! [`UpdateModel`] owns the current catalog and calibration together so that
//! a caller holding it behind one lock always sees a consistent pair.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::calibration::{CalibrationState, UpdateDurations};
use crate::catalog::{Region, RegionCatalog};
use crate::error::CoreError;
use crate::mode::Mode;
use crate::observation::Observation;
use crate::timing::UpdateTime;

/// Everything known about one region, with predictions for both updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionInfo {
    /// Region name as it appears in the snapshot.
    pub name: String,
    /// Number of nations resident in the region.
    pub population: u64,
    /// Total population of all regions that update before this one.
    pub cumulative_population: u64,
    /// Endorsements held by the region's delegate.
    pub endorsements: u64,
    /// Whether the region has no founder.
    pub founderless: bool,
    /// Predicted seconds into the major update.
    pub major: Decimal,
    /// Predicted seconds into the minor update.
    pub minor: Decimal,
}

/// Region catalog plus calibration: the complete prediction state.
#[derive(Debug, Clone)]
pub struct UpdateModel {
    catalog: Arc<RegionCatalog>,
    calibration: CalibrationState,
    durations: UpdateDurations,
}

impl UpdateModel {
    /// Create a model over `catalog` with fresh calibration from `durations`.
    pub const fn new(catalog: Arc<RegionCatalog>, durations: UpdateDurations) -> Self {
        Self {
            catalog,
            calibration: CalibrationState::new(durations),
            durations,
        }
    }

    /// The catalog predictions are made against.
    pub const fn catalog(&self) -> &Arc<RegionCatalog> {
        &self.catalog
    }

    /// Current calibration.
    pub const fn calibration(&self) -> &CalibrationState {
        &self.calibration
    }

    /// Durations the calibration resets to on reload.
    pub const fn durations(&self) -> UpdateDurations {
        self.durations
    }

    /// Uncorrected model time for a region: the population term only.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an unknown region, or
    /// [`CoreError::Overflow`] if the arithmetic overflows.
    pub fn estimate(&self, name: &str, mode: Mode) -> Result<Decimal, CoreError> {
        let region = self.catalog.lookup(name)?;
        self.estimate_region(region, mode)
    }

    fn estimate_region(&self, region: &Region, mode: Mode) -> Result<Decimal, CoreError> {
        Decimal::from(region.cumulative_population)
            .checked_mul(self.calibration.rate(mode))
            .and_then(|scaled| scaled.checked_div(Decimal::from(self.catalog.total_population())))
            .ok_or(CoreError::Overflow {
                context: "population estimate",
            })
    }

    fn correct(&self, estimate: Decimal) -> Result<Decimal, CoreError> {
        estimate
            .checked_sub(self.calibration.offset())
            .and_then(|t| t.checked_sub(Decimal::from(self.calibration.nudge())))
            .ok_or(CoreError::Overflow {
                context: "calibrated prediction",
            })
    }

    /// Predicted seconds after the start of `mode` at which `name` updates.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an unknown region, or
    /// [`CoreError::Overflow`] if the arithmetic overflows.
    pub fn predict(&self, name: &str, mode: Mode) -> Result<Decimal, CoreError> {
        let estimate = self.estimate(name, mode)?;
        self.correct(estimate)
    }

    /// [`predict`](Self::predict) rendered as hours, minutes, and seconds.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](Self::predict).
    pub fn predict_hms(&self, name: &str, mode: Mode) -> Result<UpdateTime, CoreError> {
        UpdateTime::from_seconds(self.predict(name, mode)?)
    }

    /// Catalog fields and both predictions for one region.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an unknown region.
    pub fn region_info(&self, name: &str) -> Result<RegionInfo, CoreError> {
        let region = self.catalog.lookup(name)?;
        Ok(RegionInfo {
            name: region.name.clone(),
            population: region.population,
            cumulative_population: region.cumulative_population,
            endorsements: region.endorsements,
            founderless: region.founderless,
            major: self.correct(self.estimate_region(region, Mode::Major)?)?,
            minor: self.correct(self.estimate_region(region, Mode::Minor)?)?,
        })
    }

    /// Fold a region's true update time into the offset.
    ///
    /// The model estimate used here excludes the current offset and nudge,
    /// and the difference is added to the offset rather than replacing it.
    /// Returns the new offset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an unknown region, or
    /// [`CoreError::Overflow`] if the arithmetic overflows. The offset is
    /// unchanged on error.
    pub fn record_offset(
        &mut self,
        name: &str,
        observed_seconds: Decimal,
        mode: Mode,
    ) -> Result<Decimal, CoreError> {
        let estimate = self.estimate(name, mode)?;
        let offset = self.calibration.accumulate_offset(estimate, observed_seconds)?;
        info!(
            region = name,
            mode = %mode,
            estimate = %estimate,
            observed = %observed_seconds,
            offset = %offset,
            "offset recorded"
        );
        Ok(offset)
    }

    /// Apply an observation from the live feed.
    ///
    /// # Errors
    ///
    /// Same as [`record_offset`](Self::record_offset).
    pub fn apply(&mut self, observation: &Observation) -> Result<Decimal, CoreError> {
        self.record_offset(
            &observation.region,
            Decimal::from(observation.elapsed_seconds),
            observation.mode,
        )
    }

    /// Replace the total duration of `mode` and clear the offset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] for a non-positive duration.
    pub fn recalibrate_rate(&mut self, mode: Mode, duration: Decimal) -> Result<(), CoreError> {
        self.calibration.replace_rate(mode, duration)?;
        info!(mode = %mode, duration = %duration, "update duration recalibrated, offset cleared");
        Ok(())
    }

    /// Add `delta` seconds to the manual nudge. Returns the new nudge.
    pub fn set_nudge(&mut self, delta: i64) -> i64 {
        let nudge = self.calibration.add_nudge(delta);
        debug!(delta, nudge, "nudge adjusted");
        nudge
    }

    /// Swap in a new catalog and restore default calibration.
    pub fn reload(&mut self, catalog: Arc<RegionCatalog>) {
        info!(
            regions = catalog.len(),
            total_population = catalog.total_population(),
            "catalog replaced, calibration reset"
        );
        self.catalog = catalog;
        self.calibration = CalibrationState::new(self.durations);
    }
}
