use foundation::ids::{LocationId, RegionId};
use serde::Serialize;

/// The single authoritative (region, location) pair of a viewing session.
///
/// If `location` is set it belongs to `region`'s location set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub region: Option<RegionId>,
    pub location: Option<LocationId>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Phase {
    NoRegion,
    RegionNoSelection,
    RegionWithSelection,
}

impl SelectionState {
    pub fn phase(&self) -> Phase {
        match (&self.region, &self.location) {
            (None, _) => Phase::NoRegion,
            (Some(_), None) => Phase::RegionNoSelection,
            (Some(_), Some(_)) => Phase::RegionWithSelection,
        }
    }
}
