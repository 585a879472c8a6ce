//! One-shot observation of update progress from the live feed.

use augur_core::{Mode, Observation, SessionClock};
use tracing::{debug, info, warn};

use crate::api::NationStatesApi;
use crate::happenings::{FeedEntry, QualifyingEvent};

/// Turns the latest happenings batch into at most one [`Observation`].
#[derive(Debug)]
pub struct EventObserver<A> {
    api: A,
    clock: SessionClock,
}

impl<A: NationStatesApi> EventObserver<A> {
    /// Create an observer measuring elapsed times against `clock`.
    pub const fn new(api: A, clock: SessionClock) -> Self {
        Self { api, clock }
    }

    /// The API this observer queries.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// The clock elapsed times are measured against.
    pub const fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Poll the feed once and resolve the first qualifying event.
    ///
    /// Never fails: network errors, malformed payloads, and unresolvable
    /// actors are logged and reported as no observation.
    ///
    /// The resolved region is not checked against any catalog. An
    /// observation can therefore name a region the caller does not know;
    /// the tracker logs and skips it, and a manual pull reports it as not
    /// found instead of returning no observation.
    pub async fn observe_once(&self, mode: Mode) -> Option<Observation> {
        let entries = match self.api.happenings().await {
            Ok(entries) => entries,
            Err(e) if e.is_transient() => {
                warn!(error = %e, "happenings fetch failed, will retry");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "happenings fetch returned unusable data");
                return None;
            }
        };

        let event = first_qualifying(entries)?;

        let region = match self.api.nation_region(&event.actor).await {
            Ok(region) => region,
            Err(e) => {
                warn!(actor = %event.actor, error = %e, "could not resolve actor's region");
                return None;
            }
        };

        let elapsed_seconds = self.clock.elapsed(event.timestamp, mode);
        info!(
            region = %region,
            actor = %event.actor,
            marker = event.marker,
            mode = %mode,
            elapsed_seconds,
            "observed region update"
        );
        Some(Observation {
            region,
            mode,
            elapsed_seconds,
        })
    }
}

/// The first qualifying event in feed order, logging anything skipped.
fn first_qualifying(entries: Vec<FeedEntry>) -> Option<QualifyingEvent> {
    let total = entries.len();
    for entry in entries {
        match entry {
            FeedEntry::Qualifying(event) => return Some(event),
            FeedEntry::MarkerAbsent => {}
            FeedEntry::Malformed { reason } => debug!(reason = %reason, "skipping malformed event"),
        }
    }
    debug!(events = total, "no qualifying event in batch");
    None
}
