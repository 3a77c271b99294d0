use dataset::{MapPoint, Observation};
use foundation::ids::{LocationId, RegionId};
use serde::Serialize;

use crate::state::SelectionState;

/// Everything a renderer needs to draw one frame of the viewer.
///
/// Derived from the dataset and the selection at the moment it was taken; it
/// does not update afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionView {
    /// Region dropdown options, sorted.
    pub regions: Vec<RegionId>,
    /// Location dropdown options for the current region, sorted.
    pub locations: Vec<LocationId>,
    /// Markers for the current region. May be empty even when `locations`
    /// is not.
    pub map_points: Vec<MapPoint>,
    pub selection: SelectionState,
    /// Readings of the selected location ordered by timestamp.
    pub series: Vec<Observation>,
}

impl SelectionView {
    pub fn has_map(&self) -> bool {
        !self.map_points.is_empty()
    }

    pub fn peak_vacancy(&self) -> Option<u32> {
        self.series.iter().map(|o| o.vacancy).max()
    }
}
