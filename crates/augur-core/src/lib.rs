//! Region catalog, update timing model, and calibration for Augur.
//!
//! Augur predicts when a region will be processed during the world's daily
//! major and minor updates. Regions update in a fixed order, so a region's
//! position in the update is approximated by the population of every region
//! ahead of it.
//!
//! # Modules
//!
//! - [`catalog`] -- [`RegionCatalog`]: regions in update order with
//!   cumulative populations.
//! - [`calibration`] -- [`CalibrationState`]: per-mode durations, the
//!   accumulated offset, and the manual nudge.
//! - [`model`] -- [`UpdateModel`]: predictions and calibration operations
//!   over one catalog.
//! - [`clock`] -- [`SessionClock`]: update start times for the session day.
//! - [`timing`] -- `h:m:s` rendering and parsing.
//! - [`config`] -- Configuration loading from `augur-config.yaml`.

pub mod calibration;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod mode;
pub mod model;
pub mod observation;
pub mod timing;

pub use calibration::{CalibrationState, UpdateDurations};
pub use catalog::{Region, RegionCatalog, RegionRecord};
pub use clock::SessionClock;
pub use error::CoreError;
pub use mode::Mode;
pub use model::{RegionInfo, UpdateModel};
pub use observation::Observation;
pub use timing::UpdateTime;
