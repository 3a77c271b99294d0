//! Built-in synthetic dataset, used when no data file is supplied.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use foundation::geo::GeoPoint;
use foundation::ids::{LocationId, RegionId};

use crate::dataset::Dataset;
use crate::model::Observation;

/// 2025-11-01T00:00:00Z.
const SAMPLE_START_UNIX_S: i64 = 1_761_955_200;
const SAMPLE_STEP_MINUTES: i64 = 15;

// (region, car park, vacancy, latitude, longitude)
const SAMPLE_ROWS: [(&str, &str, u32, f64, f64); 4] = [
    ("Kowloon", "Park A", 10, 22.3167, 114.1700),
    ("Kowloon", "Park B", 20, 22.3231, 114.1650),
    ("Hong Kong Island", "Park C", 15, 22.2800, 114.1588),
    ("Hong Kong Island", "Park D", 5, 22.2750, 114.1500),
];

impl Dataset {
    /// Two Hong Kong regions with two car parks each and one reading per
    /// car park, 15 minutes apart.
    pub fn sample() -> Dataset {
        let start = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(SAMPLE_START_UNIX_S);

        let mut regions: BTreeMap<RegionId, BTreeMap<LocationId, Option<GeoPoint>>> =
            BTreeMap::new();
        let mut observations: BTreeMap<LocationId, Vec<Observation>> = BTreeMap::new();

        for (step, (region, car_park, vacancy, lat, lon)) in SAMPLE_ROWS.into_iter().enumerate() {
            let id = LocationId::new(car_park);
            regions
                .entry(RegionId::new(region))
                .or_default()
                .insert(id.clone(), GeoPoint::new(lat, lon));
            observations.entry(id.clone()).or_default().push(Observation {
                location: id,
                timestamp: start + TimeDelta::minutes(step as i64 * SAMPLE_STEP_MINUTES),
                vacancy,
            });
        }

        Dataset::assemble(regions, observations)
    }
}

#[cfg(test)]
mod tests {
    use crate::dataset::Dataset;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_has_two_regions_of_two_parks() {
        let ds = Dataset::sample();
        let regions: Vec<&str> = ds.regions().map(|r| r.as_str()).collect();
        assert_eq!(regions, vec!["Hong Kong Island", "Kowloon"]);
        assert_eq!(ds.locations_in("Kowloon").len(), 2);
        assert_eq!(ds.map_points("Hong Kong Island").len(), 2);
    }

    #[test]
    fn sample_readings_are_fifteen_minutes_apart() {
        let ds = Dataset::sample();
        let a = &ds.observations_for("Park A")[0];
        let d = &ds.observations_for("Park D")[0];
        assert_eq!(a.timestamp.to_rfc3339(), "2025-11-01T00:00:00+00:00");
        assert_eq!(d.timestamp.to_rfc3339(), "2025-11-01T00:45:00+00:00");
        assert_eq!(d.vacancy, 5);
    }
}
