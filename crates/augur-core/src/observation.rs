//! A single observed region update.

use serde::Serialize;

use crate::mode::Mode;

/// A region seen updating at a known time into the update.
///
/// Produced by the event observer and consumed immediately to adjust the
/// calibration offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Name of the region that updated, as reported by the API.
    pub region: String,
    /// Update the observation belongs to.
    pub mode: Mode,
    /// Seconds between the start of that update and the event.
    pub elapsed_seconds: i64,
}
