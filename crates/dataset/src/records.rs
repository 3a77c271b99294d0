//! Flat vacancy records as they come out of a spreadsheet or JSON export.
//!
//! One record per reading; location coordinates are repeated on every row and
//! the first row of a location decides where it sits on the map.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use foundation::geo::GeoPoint;
use foundation::ids::LocationId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::dataset::Dataset;
use crate::error::DatasetError;
use crate::model::{Location, Observation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacancyRecord {
    pub region: String,
    pub car_park: String,
    pub timestamp: DateTime<Utc>,
    pub vacancy: u32,
    #[serde(default)]
    pub latitude: Coordinate,
    #[serde(default)]
    pub longitude: Coordinate,
}

impl VacancyRecord {
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude.value(), self.longitude.value())
    }

    /// True when the row carried coordinate data but no usable position came
    /// out of it.
    pub fn drops_coordinates(&self) -> bool {
        let supplied = self.latitude != Coordinate::Missing || self.longitude != Coordinate::Missing;
        supplied && self.position().is_none()
    }
}

/// One coordinate cell of a record.
///
/// Numbers and numeric strings are `Value`; absent or `null` cells are
/// `Missing`; anything else (text, objects, non-finite numbers) is `Unusable`
/// instead of failing the whole file.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum Coordinate {
    #[default]
    Missing,
    Unusable,
    Value(f64),
}

impl Coordinate {
    pub fn value(self) -> Option<f64> {
        match self {
            Coordinate::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(Coordinate::Missing),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        Ok(parsed
            .filter(|v| v.is_finite())
            .map_or(Coordinate::Unusable, Coordinate::Value))
    }
}

impl Serialize for Coordinate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

impl Dataset {
    pub fn from_records<I>(records: I) -> Result<Dataset, DatasetError>
    where
        I: IntoIterator<Item = VacancyRecord>,
    {
        let mut builder = Dataset::builder();
        for record in records {
            let position = record.position();
            if record.drops_coordinates() {
                warn!(
                    car_park = %record.car_park,
                    latitude = ?record.latitude,
                    longitude = ?record.longitude,
                    "record has unusable coordinates; location will not be shown on the map"
                );
            }

            let id = LocationId::new(record.car_park);
            builder.add_location(Location::new(id.clone(), record.region, position))?;
            builder.add_observation(Observation {
                location: id,
                timestamp: record.timestamp,
                vacancy: record.vacancy,
            })?;
        }
        builder.build()
    }

    /// Parses a JSON array of [`VacancyRecord`]s.
    pub fn from_json_str(payload: &str) -> Result<Dataset, DatasetError> {
        let records: Vec<VacancyRecord> =
            serde_json::from_str(payload).map_err(DatasetError::Parse)?;
        Dataset::from_records(records)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|e| DatasetError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Dataset::from_json_str(&payload)
    }
}
