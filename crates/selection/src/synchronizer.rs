use std::sync::Arc;

use dataset::{Dataset, MapPoint, Observation};
use foundation::geo::GeoPoint;
use foundation::ids::{LocationId, RegionId};
use parking_lot::Mutex;
use runtime::event_bus::{ChangeCause, EventBus, SelectionChanged, SelectionListener};
use runtime::metrics::{Counter, MetricsSnapshot, SessionMetrics};
use tracing::{debug, info, warn};

use crate::config::SelectionConfig;
use crate::error::{ConfigError, SelectionError};
use crate::picking::{PickHit, nearest};
use crate::state::SelectionState;
use crate::view::SelectionView;

/// Result of a map click. None of these is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// A marker was within the click threshold and is now selected.
    /// `changed` is `None` if it was already the selection.
    Hit {
        hit: PickHit,
        changed: Option<SelectionChanged>,
    },
    /// The nearest marker was too far away (or the click was not a finite
    /// point); nothing changed.
    Miss,
    /// No region is chosen, or the region has no marker to click.
    NoCandidates,
}

struct Session {
    state: SelectionState,
    metrics: SessionMetrics,
    seq: u64,
    bus: EventBus,
}

impl Session {
    /// Applies a validated selection and notifies listeners if the location
    /// changed. Runs under the session lock.
    fn commit(
        &mut self,
        region: RegionId,
        location: Option<LocationId>,
        cause: ChangeCause,
    ) -> Option<SelectionChanged> {
        let changed = self.state.location != location;
        self.state = SelectionState {
            region: Some(region.clone()),
            location: location.clone(),
        };
        if !changed {
            return None;
        }

        self.seq += 1;
        let event = SelectionChanged {
            seq: self.seq,
            region,
            location,
            cause,
        };
        info!(
            seq = event.seq,
            region = %event.region,
            location = event.location.as_ref().map(LocationId::as_str).unwrap_or("<none>"),
            %cause,
            "selection changed"
        );
        self.metrics.inc(Counter::Notifications);
        self.bus.publish(&event);
        Some(event)
    }

    fn reject(&mut self, err: SelectionError) -> SelectionError {
        warn!("rejected: {err}");
        self.metrics.inc(Counter::Rejected);
        err
    }
}

/// Keeps region dropdown, location dropdown and map clicks consistent with a
/// single [`SelectionState`].
///
/// Every mutating call takes the session lock, updates the state and notifies
/// listeners before releasing it, so events are applied one at a time even
/// when the synchronizer is shared across threads. Listeners must not call
/// back into the synchronizer.
pub struct SelectionSynchronizer {
    dataset: Arc<Dataset>,
    config: SelectionConfig,
    session: Mutex<Session>,
}

impl SelectionSynchronizer {
    pub fn new(dataset: Arc<Dataset>, config: SelectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(dataset, config))
    }

    pub fn with_default_config(dataset: Arc<Dataset>) -> Self {
        Self::assemble(dataset, SelectionConfig::default())
    }

    fn assemble(dataset: Arc<Dataset>, config: SelectionConfig) -> Self {
        Self {
            dataset,
            config,
            session: Mutex::new(Session {
                state: SelectionState::default(),
                metrics: SessionMetrics::new(),
                seq: 0,
                bus: EventBus::new(),
            }),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn subscribe(&self, listener: Arc<dyn SelectionListener>) {
        self.session.lock().bus.subscribe(listener);
    }

    /// Switches region. A previous location survives only if it is also in the
    /// new region; otherwise the first location in identifier order is
    /// selected, or nothing if the region is empty.
    pub fn set_region(&self, region: &str) -> Result<Option<SelectionChanged>, SelectionError> {
        let mut session = self.session.lock();
        if !self.dataset.has_region(region) {
            return Err(session.reject(SelectionError::InvalidRegion(region.to_string())));
        }
        debug!(region, "set_region");

        let candidates = self.dataset.locations_in(region);
        let next = match &session.state.location {
            Some(current) if candidates.iter().any(|l| &l.id == current) => Some(current.clone()),
            _ => candidates.first().map(|l| l.id.clone()),
        };

        session.metrics.inc(Counter::RegionChanges);
        Ok(session.commit(RegionId::new(region), next, ChangeCause::Region))
    }

    pub fn set_location(&self, location: &str) -> Result<Option<SelectionChanged>, SelectionError> {
        let mut session = self.session.lock();
        let region = session.state.region.clone();
        let Some(region) = region.filter(|r| self.region_contains(r.as_str(), location)) else {
            let region = session.state.region.clone();
            return Err(session.reject(SelectionError::InvalidLocation {
                region,
                location: location.to_string(),
            }));
        };
        debug!(location, "set_location");

        session.metrics.inc(Counter::LocationChanges);
        Ok(session.commit(region, Some(LocationId::new(location)), ChangeCause::Location))
    }

    /// Selects the marker nearest to the click if it is strictly closer than
    /// the configured threshold. Distance is planar on raw degrees.
    pub fn handle_map_click(&self, lat: f64, lon: f64) -> ClickOutcome {
        let mut session = self.session.lock();
        let Some(region) = session.state.region.clone() else {
            debug!(lat, lon, "map click without a region");
            return ClickOutcome::NoCandidates;
        };

        let candidates = self.dataset.locations_in(region.as_str());
        if candidates.iter().all(|l| l.position.is_none()) {
            debug!(lat, lon, region = %region, "map click on empty map");
            return ClickOutcome::NoCandidates;
        }

        let hit = GeoPoint::new(lat, lon).and_then(|click| nearest(candidates, click));
        match hit {
            Some(hit) if hit.distance < self.config.click_threshold => {
                debug!(lat, lon, location = %hit.location, distance = hit.distance, "map click hit");
                session.metrics.inc(Counter::MapHits);
                let changed =
                    session.commit(region, Some(hit.location.clone()), ChangeCause::MapClick);
                ClickOutcome::Hit { hit, changed }
            }
            other => {
                debug!(
                    lat,
                    lon,
                    nearest_distance = other.map(|h| h.distance),
                    threshold = self.config.click_threshold,
                    "map click missed"
                );
                session.metrics.inc(Counter::MapMisses);
                ClickOutcome::Miss
            }
        }
    }

    pub fn current_selection(&self) -> SelectionState {
        self.session.lock().state.clone()
    }

    /// Readings for `location` ordered by timestamp.
    ///
    /// Scoped to the current region: empty if `location` is not one of its
    /// locations (or no region is chosen), or if it has no readings.
    pub fn observations_for(&self, location: &str) -> &[Observation] {
        let region = self.session.lock().state.region.clone();
        self.series_in(region.as_ref(), location)
    }

    /// Readings for whatever is currently selected.
    pub fn selected_series(&self) -> &[Observation] {
        let SelectionState { region, location } = self.current_selection();
        match location {
            Some(id) => self.series_in(region.as_ref(), id.as_str()),
            None => &[],
        }
    }

    pub fn region_options(&self) -> Vec<RegionId> {
        self.dataset.regions().cloned().collect()
    }

    /// Location dropdown for the current region, derived fresh on every call.
    pub fn location_options(&self) -> Vec<LocationId> {
        match self.current_selection().region {
            Some(region) => self
                .dataset
                .locations_in(region.as_str())
                .iter()
                .map(|l| l.id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn map_points(&self) -> Vec<MapPoint> {
        match self.current_selection().region {
            Some(region) => self.dataset.map_points(region.as_str()),
            None => Vec::new(),
        }
    }

    /// Consistent snapshot of everything a renderer shows.
    pub fn view(&self) -> SelectionView {
        let selection = self.current_selection();
        let (locations, map_points): (Vec<LocationId>, Vec<MapPoint>) = match &selection.region {
            Some(region) => (
                self.dataset
                    .locations_in(region.as_str())
                    .iter()
                    .map(|l| l.id.clone())
                    .collect(),
                self.dataset.map_points(region.as_str()),
            ),
            None => (Vec::new(), Vec::new()),
        };
        let series = selection
            .location
            .as_ref()
            .map(|id| self.series_in(selection.region.as_ref(), id.as_str()).to_vec())
            .unwrap_or_default();

        SelectionView {
            regions: self.region_options(),
            locations,
            map_points,
            selection,
            series,
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.session.lock().metrics.snapshot()
    }

    fn series_in(&self, region: Option<&RegionId>, location: &str) -> &[Observation] {
        match region {
            Some(r) if self.region_contains(r.as_str(), location) => {
                self.dataset.observations_for(location)
            }
            _ => &[],
        }
    }

    fn region_contains(&self, region: &str, location: &str) -> bool {
        self.dataset
            .locations_in(region)
            .binary_search_by(|l| l.id.as_str().cmp(location))
            .is_ok()
    }
}

impl std::fmt::Debug for SelectionSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("SelectionSynchronizer");
        dbg.field("config", &self.config);
        // Listeners run under the session lock and may format us.
        match self.session.try_lock() {
            Some(session) => dbg.field("state", &session.state),
            None => dbg.field("state", &format_args!("<locked>")),
        };
        dbg.finish()
    }
}
