//! Live session layer for Augur.
//!
//! A [`Session`] owns the region catalog, the calibration, and the
//! background [`Tracker`] that recalibrates from the live feed. It exposes
//! the operations a command shell or exporter needs: predictions, manual
//! calibration, tracker control, one-shot pulls, and catalog reloads.

pub mod error;
pub mod session;
mod state;
#[cfg(test)]
mod testing;
pub mod tracker;

pub use error::EngineError;
pub use session::{Session, SessionStatus};
pub use tracker::{POLL_INTERVAL, StartOutcome, StopOutcome, Tracker, TrackerStatus};
