use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use foundation::geo::GeoPoint;
use foundation::ids::{LocationId, RegionId};
use tracing::debug;

use crate::error::DatasetError;
use crate::model::{Location, MapPoint, Observation};

/// Immutable in-memory dataset: region -> locations, location -> observations.
///
/// Ordering contract:
/// - `regions()` yields regions in ascending identifier order.
/// - `locations_in()` is sorted by location identifier.
/// - `observations_for()` is sorted by timestamp, strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    regions: BTreeMap<RegionId, Vec<Location>>,
    region_of: BTreeMap<LocationId, RegionId>,
    observations: BTreeMap<LocationId, Vec<Observation>>,
}

impl Dataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionId> + '_ {
        self.regions.keys()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    /// Locations of `region` in identifier order. Empty for unknown regions.
    pub fn locations_in(&self, region: &str) -> &[Location] {
        self.regions.get(region).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        let region = self.region_of.get(id)?;
        let locations = self.regions.get(region)?;
        locations
            .binary_search_by(|l| l.id.as_str().cmp(id))
            .ok()
            .map(|idx| &locations[idx])
    }

    pub fn location_count(&self) -> usize {
        self.region_of.len()
    }

    /// Observations for `id` ordered by timestamp. Empty if there are none.
    pub fn observations_for(&self, id: &str) -> &[Observation] {
        self.observations.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn observation_count(&self) -> usize {
        self.observations.values().map(Vec::len).sum()
    }

    /// Points to draw for `region`: locations with a usable position, in
    /// identifier order.
    pub fn map_points(&self, region: &str) -> Vec<MapPoint> {
        self.locations_in(region)
            .iter()
            .filter_map(|l| {
                l.position.map(|position| MapPoint {
                    id: l.id.clone(),
                    position,
                })
            })
            .collect()
    }

    pub(crate) fn assemble(
        regions: BTreeMap<RegionId, BTreeMap<LocationId, Option<GeoPoint>>>,
        mut observations: BTreeMap<LocationId, Vec<Observation>>,
    ) -> Self {
        let mut region_of = BTreeMap::new();
        let regions: BTreeMap<RegionId, Vec<Location>> = regions
            .into_iter()
            .map(|(region, locations)| {
                let list = locations
                    .into_iter()
                    .map(|(id, position)| {
                        region_of.insert(id.clone(), region.clone());
                        Location {
                            id,
                            region: region.clone(),
                            position,
                        }
                    })
                    .collect();
                (region, list)
            })
            .collect();

        for series in observations.values_mut() {
            series.sort_by_key(|o| o.timestamp);
        }
        observations.retain(|_, series| !series.is_empty());

        Self {
            regions,
            region_of,
            observations,
        }
    }
}

/// Validating builder for [`Dataset`].
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    regions: BTreeMap<RegionId, BTreeMap<LocationId, Option<GeoPoint>>>,
    region_of: BTreeMap<LocationId, RegionId>,
    observations: BTreeMap<LocationId, Vec<Observation>>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a region, possibly without any locations.
    pub fn add_region(&mut self, region: impl Into<RegionId>) {
        self.regions.entry(region.into()).or_default();
    }

    /// Registers a location. Re-adding a known location keeps the position
    /// that was seen first.
    pub fn add_location(&mut self, location: Location) -> Result<(), DatasetError> {
        let Location {
            id,
            region,
            position,
        } = location;

        match self.region_of.entry(id.clone()) {
            Entry::Occupied(existing) => {
                if *existing.get() != region {
                    return Err(DatasetError::ConflictingRegion {
                        location: id,
                        existing: existing.get().clone(),
                        requested: region,
                    });
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(region.clone());
                self.regions
                    .entry(region)
                    .or_default()
                    .insert(id, position);
            }
        }
        Ok(())
    }

    pub fn add_observation(&mut self, observation: Observation) -> Result<(), DatasetError> {
        if !self.region_of.contains_key(&observation.location) {
            return Err(DatasetError::UnknownLocation(observation.location));
        }
        self.observations
            .entry(observation.location.clone())
            .or_default()
            .push(observation);
        Ok(())
    }

    pub fn build(self) -> Result<Dataset, DatasetError> {
        let dataset = Dataset::assemble(self.regions, self.observations);

        for (location, series) in &dataset.observations {
            if let Some(pair) = series.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
                return Err(DatasetError::DuplicateTimestamp {
                    location: location.clone(),
                    timestamp: pair[0].timestamp,
                });
            }
        }

        debug!(
            regions = dataset.region_count(),
            locations = dataset.location_count(),
            observations = dataset.observation_count(),
            "dataset built"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::Dataset;
    use crate::error::DatasetError;
    use crate::model::{Location, Observation};
    use chrono::{DateTime, TimeDelta, Utc};
    use foundation::geo::GeoPoint;
    use foundation::ids::LocationId;
    use pretty_assertions::assert_eq;

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::minutes(minutes)
    }

    fn obs(id: &str, minutes: i64, vacancy: u32) -> Observation {
        Observation {
            location: LocationId::new(id),
            timestamp: at(minutes),
            vacancy,
        }
    }

    fn pt(lat: f64, lon: f64) -> Option<GeoPoint> {
        GeoPoint::new(lat, lon)
    }

    #[test]
    fn locations_are_sorted_by_identifier() {
        let mut b = Dataset::builder();
        b.add_location(Location::new("Park C", "North", pt(1.0, 1.0))).unwrap();
        b.add_location(Location::new("Park A", "North", None)).unwrap();
        b.add_location(Location::new("Park B", "North", pt(2.0, 2.0))).unwrap();
        let ds = b.build().unwrap();

        let ids: Vec<&str> = ds.locations_in("North").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["Park A", "Park B", "Park C"]);
        assert!(ds.locations_in("South").is_empty());
    }

    #[test]
    fn regions_are_sorted_and_may_be_empty() {
        let mut b = Dataset::builder();
        b.add_region("Zeta");
        b.add_location(Location::new("P1", "Alpha", None)).unwrap();
        let ds = b.build().unwrap();

        let regions: Vec<&str> = ds.regions().map(|r| r.as_str()).collect();
        assert_eq!(regions, vec!["Alpha", "Zeta"]);
        assert!(ds.has_region("Zeta"));
        assert!(ds.locations_in("Zeta").is_empty());
        assert!(ds.map_points("Zeta").is_empty());
    }

    #[test]
    fn observations_are_ordered_by_timestamp() {
        let mut b = Dataset::builder();
        b.add_location(Location::new("P", "R", None)).unwrap();
        b.add_observation(obs("P", 30, 3)).unwrap();
        b.add_observation(obs("P", 0, 1)).unwrap();
        b.add_observation(obs("P", 15, 2)).unwrap();
        let ds = b.build().unwrap();

        let values: Vec<u32> = ds.observations_for("P").iter().map(|o| o.vacancy).collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert!(ds.observations_for("missing").is_empty());
        assert_eq!(ds.observation_count(), 3);
    }

    #[test]
    fn duplicate_timestamp_is_rejected() {
        let mut b = Dataset::builder();
        b.add_location(Location::new("P", "R", None)).unwrap();
        b.add_observation(obs("P", 5, 1)).unwrap();
        b.add_observation(obs("P", 5, 2)).unwrap();
        let err = b.build().unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateTimestamp { .. }));
    }

    #[test]
    fn observation_for_unknown_location_is_rejected() {
        let mut b = Dataset::builder();
        let err = b.add_observation(obs("ghost", 0, 1)).unwrap_err();
        assert!(matches!(err, DatasetError::UnknownLocation(ref id) if id.as_str() == "ghost"));
    }

    #[test]
    fn location_cannot_move_between_regions() {
        let mut b = Dataset::builder();
        b.add_location(Location::new("P", "East", None)).unwrap();
        let err = b.add_location(Location::new("P", "West", None)).unwrap_err();
        assert!(matches!(err, DatasetError::ConflictingRegion { .. }));
    }

    #[test]
    fn first_position_wins_on_readd() {
        let mut b = Dataset::builder();
        b.add_location(Location::new("P", "R", None)).unwrap();
        b.add_location(Location::new("P", "R", pt(1.0, 2.0))).unwrap();
        let ds = b.build().unwrap();

        assert_eq!(ds.location("P").unwrap().position, None);
        assert_eq!(ds.location_count(), 1);
    }

    #[test]
    fn map_points_skip_locations_without_position() {
        let mut b = Dataset::builder();
        b.add_location(Location::new("B", "R", pt(1.0, 2.0))).unwrap();
        b.add_location(Location::new("A", "R", None)).unwrap();
        b.add_location(Location::new("C", "R", pt(3.0, 4.0))).unwrap();
        let ds = b.build().unwrap();

        let points = ds.map_points("R");
        let ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn location_lookup() {
        let mut b = Dataset::builder();
        b.add_location(Location::new("A", "R1", None)).unwrap();
        b.add_location(Location::new("B", "R2", pt(0.0, 0.0))).unwrap();
        let ds = b.build().unwrap();

        assert_eq!(ds.location("B").unwrap().region.as_str(), "R2");
        assert!(ds.location("Z").is_none());
    }
}
