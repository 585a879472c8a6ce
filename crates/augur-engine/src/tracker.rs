//! Background calibration tracker.
//!
//! While running, the tracker polls the live feed every [`POLL_INTERVAL`]
//! and folds each observed region update into the session's offset. It is
//! a two-state machine:
//!
//! ```text
//!  Stopped --start()--> Running
//!  Running --stop()---> Stopped   (signals the loop and waits for it)
//! ```
//!
//! The poll sleep races a `watch` stop signal, so a stop takes effect
//! without waiting out the interval. A feed request already in flight is
//! allowed to finish, but its result is dropped if the stop arrived first.

use std::sync::Arc;
use std::time::Duration;

use augur_feed::{EventObserver, NationStatesApi};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::state::SharedState;

/// Delay between feed polls. Keeps the tracker well under the API's rate
/// limit.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Whether the tracker loop is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    /// No loop is running.
    Stopped,
    /// The polling loop is active.
    Running,
}

/// Result of [`Tracker::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new polling loop was spawned.
    Started,
    /// A loop was already active; nothing changed.
    AlreadyRunning,
}

/// Result of [`Tracker::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The loop was signalled and has exited.
    Stopped,
    /// No loop was active; nothing changed.
    AlreadyStopped,
}

#[derive(Debug)]
enum Slot {
    Stopped,
    Running {
        stop: watch::Sender<bool>,
        handle: JoinHandle<()>,
    },
}

/// Proof that the tracker is stopped. The tracker cannot be started while
/// this is held.
#[derive(Debug)]
pub struct StoppedGuard<'a> {
    _slot: MutexGuard<'a, Slot>,
}

/// Owner of the background polling loop.
#[derive(Debug)]
pub struct Tracker {
    slot: Mutex<Slot>,
    poll_interval: Duration,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl Tracker {
    /// Create a stopped tracker polling every `poll_interval` once started.
    pub const fn new(poll_interval: Duration) -> Self {
        Self {
            slot: Mutex::const_new(Slot::Stopped),
            poll_interval,
        }
    }

    /// Current state.
    pub async fn status(&self) -> TrackerStatus {
        let slot = self.slot.lock().await;
        match *slot {
            Slot::Stopped => TrackerStatus::Stopped,
            Slot::Running { .. } => TrackerStatus::Running,
        }
    }

    /// Spawn the polling loop unless one is already running.
    pub(crate) async fn start<A: NationStatesApi>(
        &self,
        state: SharedState,
        observer: Arc<EventObserver<A>>,
    ) -> StartOutcome {
        let mut slot = self.slot.lock().await;
        if matches!(*slot, Slot::Running { .. }) {
            info!("tracker already active");
            return StartOutcome::AlreadyRunning;
        }

        let (stop, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(poll_loop(state, observer, stop_rx, self.poll_interval));
        *slot = Slot::Running { stop, handle };
        info!(
            poll_interval_ms = u64::try_from(self.poll_interval.as_millis()).unwrap_or(u64::MAX),
            "tracker started"
        );
        StartOutcome::Started
    }

    /// Signal the loop to exit and wait until it has.
    pub async fn stop(&self) -> StopOutcome {
        let mut slot = self.slot.lock().await;
        match std::mem::replace(&mut *slot, Slot::Stopped) {
            Slot::Stopped => {
                info!("tracker already stopped");
                StopOutcome::AlreadyStopped
            }
            Slot::Running { stop, handle } => {
                if stop.send(true).is_err() {
                    debug!("tracker loop had already exited");
                }
                if let Err(e) = handle.await {
                    warn!(error = %e, "tracker task ended abnormally");
                }
                info!("tracker stopped");
                StopOutcome::Stopped
            }
        }
    }

    /// Hold the tracker in the stopped state, or `None` if it is running.
    pub async fn hold_stopped(&self) -> Option<StoppedGuard<'_>> {
        let slot = self.slot.lock().await;
        let stopped = matches!(*slot, Slot::Stopped);
        stopped.then_some(StoppedGuard { _slot: slot })
    }
}

async fn poll_loop<A: NationStatesApi>(
    state: SharedState,
    observer: Arc<EventObserver<A>>,
    mut stop_rx: watch::Receiver<bool>,
    poll_interval: Duration,
) {
    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            () = tokio::time::sleep(poll_interval) => {}
        }

        let mode = state.lock().await.mode;
        let Some(observation) = observer.observe_once(mode).await else {
            continue;
        };

        let mut guard = state.lock().await;
        if *stop_rx.borrow() {
            debug!(region = %observation.region, "tracker stopped mid-cycle, observation dropped");
            break;
        }
        if let Err(e) = guard.model.apply(&observation) {
            warn!(region = %observation.region, error = %e, "observation not applied");
        }
    }
    debug!("tracker loop exited");
}
