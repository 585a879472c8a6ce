//! Scripted API and fixtures shared by the engine's unit tests.

#![allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::missing_const_for_fn
)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use augur_core::{
    Mode, RegionCatalog, RegionRecord, SessionClock, UpdateDurations, UpdateModel,
};
use augur_feed::happenings::QualifyingEvent;
use augur_feed::{EventObserver, FeedEntry, FeedError, NationStatesApi};
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use tokio::sync::Mutex;

use crate::state::{SessionState, SharedState};

/// In-memory API. Polls are served from a queue of scripted results
/// first, then from a fixed batch once the queue is empty.
#[derive(Debug, Default)]
pub(crate) struct ScriptedApi {
    script: StdMutex<VecDeque<Result<Vec<FeedEntry>, FeedError>>>,
    batch: Vec<FeedEntry>,
    residences: BTreeMap<String, String>,
    founderless: BTreeSet<String>,
    resolve_delay: Duration,
    happenings_calls: AtomicUsize,
}

impl ScriptedApi {
    /// An API whose feed never contains a qualifying event.
    pub(crate) fn quiet() -> Self {
        Self::default()
    }

    /// An API reporting that `actor` (resident in `region`) updated
    /// `elapsed` seconds into the major update.
    pub(crate) fn reporting(actor: &str, region: &str, elapsed: i64) -> Self {
        Self {
            batch: vec![FeedEntry::MarkerAbsent, event(actor, elapsed)],
            ..Self::default()
        }
        .resident(actor, region)
    }

    /// An API that serves `results` one per poll, then empty batches.
    pub(crate) fn scripted(results: Vec<Result<Vec<FeedEntry>, FeedError>>) -> Self {
        Self {
            script: StdMutex::new(results.into()),
            ..Self::default()
        }
    }

    /// Resolve `actor` to `region`.
    pub(crate) fn resident(mut self, actor: &str, region: &str) -> Self {
        self.residences.insert(actor.to_owned(), region.to_owned());
        self
    }

    /// Make region resolution take `delay` of (virtual) time.
    pub(crate) fn with_resolve_delay(mut self, delay: Duration) -> Self {
        self.resolve_delay = delay;
        self
    }

    /// Report these regions as founderless.
    pub(crate) fn with_founderless(mut self, names: &[&str]) -> Self {
        self.founderless = names.iter().map(|n| (*n).to_owned()).collect();
        self
    }

    /// How many times the happenings feed has been fetched.
    pub(crate) fn happenings_calls(&self) -> usize {
        self.happenings_calls.load(Ordering::SeqCst)
    }
}

impl NationStatesApi for ScriptedApi {
    async fn happenings(&self) -> Result<Vec<FeedEntry>, FeedError> {
        self.happenings_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(self.batch.clone()))
    }

    async fn nation_region(&self, nation: &str) -> Result<String, FeedError> {
        if !self.resolve_delay.is_zero() {
            tokio::time::sleep(self.resolve_delay).await;
        }
        self.residences
            .get(nation)
            .cloned()
            .ok_or_else(|| FeedError::Status {
                status: 404,
                endpoint: format!("nation={nation}"),
            })
    }

    async fn founderless_regions(&self) -> Result<BTreeSet<String>, FeedError> {
        Ok(self.founderless.clone())
    }
}

/// A qualifying event by `actor`, `elapsed` seconds into the major update.
pub(crate) fn event(actor: &str, elapsed: i64) -> FeedEntry {
    FeedEntry::Qualifying(QualifyingEvent {
        timestamp: clock().epoch(Mode::Major) + elapsed,
        actor: actor.to_owned(),
        marker: "influence",
    })
}

/// Session clock started before the major update on 2024-03-09.
pub(crate) fn clock() -> SessionClock {
    SessionClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 3, 30, 0).unwrap())
}

/// Six-hour major and one-hour minor update.
pub(crate) fn durations() -> UpdateDurations {
    UpdateDurations {
        major: dec!(21600),
        minor: dec!(3600),
    }
}

/// Regions A, B and C with populations 10, 20 and 30.
pub(crate) fn records() -> Vec<RegionRecord> {
    [("A", 10), ("B", 20), ("C", 30)]
        .into_iter()
        .map(|(name, population)| RegionRecord {
            name: name.to_owned(),
            population,
            endorsements: 0,
        })
        .collect()
}

pub(crate) fn catalog() -> RegionCatalog {
    RegionCatalog::build(records(), &BTreeSet::new()).unwrap()
}

pub(crate) fn shared_state() -> SharedState {
    Arc::new(Mutex::new(SessionState {
        model: UpdateModel::new(Arc::new(catalog()), durations()),
        mode: Mode::Major,
    }))
}

pub(crate) fn observer(api: ScriptedApi) -> Arc<EventObserver<ScriptedApi>> {
    Arc::new(EventObserver::new(api, clock()))
}
