use chrono::{DateTime, Utc};
use foundation::geo::GeoPoint;
use foundation::ids::{LocationId, RegionId};
use serde::{Deserialize, Serialize};

/// A car park (or any other point of interest) belonging to one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub region: RegionId,
    /// `None` when the source had missing or unusable coordinates. Such
    /// locations stay selectable but never appear on the map.
    pub position: Option<GeoPoint>,
}

impl Location {
    pub fn new(
        id: impl Into<LocationId>,
        region: impl Into<RegionId>,
        position: Option<GeoPoint>,
    ) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            position,
        }
    }
}

/// One vacancy reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub location: LocationId,
    pub timestamp: DateTime<Utc>,
    pub vacancy: u32,
}

/// A location that can be drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: LocationId,
    pub position: GeoPoint,
}
