//! The Augur session: one catalog, one calibration, one tracker.
//!
//! [`Session`] is the surface a command shell or exporter drives. Every
//! read and write of the model goes through a single lock shared with the
//! background tracker, so manual commands and live observations are
//! serialized.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use augur_core::{
    CalibrationState, Mode, RegionCatalog, RegionInfo, SessionClock, UpdateDurations,
    UpdateModel, UpdateTime,
};
use augur_feed::{EventObserver, NationStatesApi, load_regions_dump};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::EngineError;
use crate::state::{SessionState, SharedState};
use crate::tracker::{StartOutcome, StopOutcome, Tracker, TrackerStatus};

/// Point-in-time summary of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    /// Whether the tracker is polling.
    pub tracker: TrackerStatus,
    /// The update being tracked.
    pub mode: Mode,
    /// When the session started; update epochs are taken from this day.
    pub started_at: DateTime<Utc>,
    /// Number of regions in the catalog.
    pub regions: usize,
    /// Total world population in the catalog.
    pub total_population: u64,
    /// Current calibration.
    pub calibration: CalibrationState,
}

/// A live prediction session against one API.
#[derive(Debug)]
pub struct Session<A> {
    state: SharedState,
    observer: Arc<EventObserver<A>>,
    tracker: Tracker,
    dump_path: PathBuf,
}

impl<A: NationStatesApi> Session<A> {
    /// Build the catalog from the dump at `dump_path` plus the API's
    /// founderless list, and start a session at the current time.
    ///
    /// # Errors
    ///
    /// Fails if the dump cannot be read or parsed, the founderless list
    /// cannot be fetched, or the records do not form a valid catalog.
    pub async fn load(
        api: A,
        dump_path: PathBuf,
        durations: UpdateDurations,
    ) -> Result<Self, EngineError> {
        let catalog = build_catalog(&api, &dump_path).await?;
        Ok(Self::new(api, catalog, durations, SessionClock::now(), dump_path))
    }

    /// Start a session over an already-built catalog.
    ///
    /// The tracked mode starts at the update most relevant to `clock`.
    pub fn new(
        api: A,
        catalog: RegionCatalog,
        durations: UpdateDurations,
        clock: SessionClock,
        dump_path: PathBuf,
    ) -> Self {
        let mode = clock.default_mode();
        info!(
            regions = catalog.len(),
            total_population = catalog.total_population(),
            mode = %mode,
            started_at = %clock.started_at(),
            "session started"
        );
        let state = SessionState {
            model: UpdateModel::new(Arc::new(catalog), durations),
            mode,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            observer: Arc::new(EventObserver::new(api, clock)),
            tracker: Tracker::default(),
            dump_path,
        }
    }

    /// Predicted seconds into `mode` at which `region` updates.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown region.
    pub async fn predict(&self, region: &str, mode: Mode) -> Result<Decimal, EngineError> {
        Ok(self.state.lock().await.model.predict(region, mode)?)
    }

    /// [`predict`](Self::predict), rendered as hours, minutes, seconds.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown region.
    pub async fn predict_hms(&self, region: &str, mode: Mode) -> Result<UpdateTime, EngineError> {
        Ok(self.state.lock().await.model.predict_hms(region, mode)?)
    }

    /// Catalog data and both updates' predictions for `region`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown region.
    pub async fn region_info(&self, region: &str) -> Result<RegionInfo, EngineError> {
        Ok(self.state.lock().await.model.region_info(region)?)
    }

    /// Fold an operator-observed update time into the offset. Returns the
    /// new offset.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown region.
    pub async fn record_offset(
        &self,
        region: &str,
        observed_seconds: Decimal,
        mode: Mode,
    ) -> Result<Decimal, EngineError> {
        Ok(self
            .state
            .lock()
            .await
            .model
            .record_offset(region, observed_seconds, mode)?)
    }

    /// Replace the total duration of `mode` and clear the offset.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a non-positive duration.
    pub async fn recalibrate_rate(&self, mode: Mode, duration: Decimal) -> Result<(), EngineError> {
        Ok(self.state.lock().await.model.recalibrate_rate(mode, duration)?)
    }

    /// Add `delta` seconds to the manual nudge. Returns the new nudge.
    pub async fn set_nudge(&self, delta: i64) -> i64 {
        self.state.lock().await.model.set_nudge(delta)
    }

    /// The update the tracker observes.
    pub async fn mode(&self) -> Mode {
        self.state.lock().await.mode
    }

    /// Switch the update the tracker observes.
    pub async fn set_mode(&self, mode: Mode) {
        self.state.lock().await.mode = mode;
        info!(mode = %mode, "tracking mode changed");
    }

    /// Snapshot of the current calibration.
    pub async fn calibration(&self) -> CalibrationState {
        self.state.lock().await.model.calibration().clone()
    }

    /// The current catalog.
    pub async fn catalog(&self) -> Arc<RegionCatalog> {
        Arc::clone(self.state.lock().await.model.catalog())
    }

    /// Start the background tracker.
    pub async fn start(&self) -> StartOutcome {
        self.tracker
            .start(Arc::clone(&self.state), Arc::clone(&self.observer))
            .await
    }

    /// Stop the background tracker and wait for it to exit.
    pub async fn stop(&self) -> StopOutcome {
        self.tracker.stop().await
    }

    /// Poll the feed once and apply what it shows. Returns the new offset,
    /// or `None` if the feed had nothing usable.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TrackerRunning`] while the tracker is active,
    /// or a not-found error if the observed region is not in the catalog.
    pub async fn pull(&self) -> Result<Option<Decimal>, EngineError> {
        let Some(_stopped) = self.tracker.hold_stopped().await else {
            return Err(EngineError::TrackerRunning);
        };
        let mode = self.mode().await;
        let Some(observation) = self.observer.observe_once(mode).await else {
            info!(mode = %mode, "manual pull found no qualifying event");
            return Ok(None);
        };
        let offset = self.state.lock().await.model.apply(&observation)?;
        Ok(Some(offset))
    }

    /// Rebuild the catalog from the dump and reset calibration to defaults.
    ///
    /// On failure the current catalog and calibration are kept.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub async fn reload(&self) -> Result<(), EngineError> {
        let catalog = build_catalog(self.observer.api(), &self.dump_path).await?;
        self.state.lock().await.model.reload(Arc::new(catalog));
        Ok(())
    }

    /// Summary of the session for display or logging.
    pub async fn status(&self) -> SessionStatus {
        let tracker = self.tracker.status().await;
        let state = self.state.lock().await;
        let catalog = state.model.catalog();
        SessionStatus {
            tracker,
            mode: state.mode,
            started_at: self.observer.clock().started_at(),
            regions: catalog.len(),
            total_population: catalog.total_population(),
            calibration: state.model.calibration().clone(),
        }
    }
}

/// Read the dump on a blocking thread and combine it with the founderless
/// list.
async fn build_catalog<A: NationStatesApi>(
    api: &A,
    dump_path: &Path,
) -> Result<RegionCatalog, EngineError> {
    let path = dump_path.to_path_buf();
    let records = tokio::task::spawn_blocking(move || load_regions_dump(&path))
        .await
        .map_err(|e| EngineError::Task {
            message: format!("regions dump reader: {e}"),
        })??;
    let founderless = api.founderless_regions().await?;
    let catalog = RegionCatalog::build(records, &founderless)?;
    info!(
        regions = catalog.len(),
        founderless = catalog.founderless().count(),
        total_population = catalog.total_population(),
        "region catalog built"
    );
    Ok(catalog)
}
