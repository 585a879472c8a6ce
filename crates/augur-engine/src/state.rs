//! The calibration state shared by the session and its tracker.

use std::sync::Arc;

use augur_core::{Mode, UpdateModel};
use tokio::sync::Mutex;

/// Everything a calibration write touches, guarded as one unit.
#[derive(Debug)]
pub(crate) struct SessionState {
    /// Catalog plus calibration.
    pub(crate) model: UpdateModel,
    /// The update the tracker is currently observing.
    pub(crate) mode: Mode,
}

/// Handle to the session state held by the session and the tracker loop.
pub(crate) type SharedState = Arc<Mutex<SessionState>>;
