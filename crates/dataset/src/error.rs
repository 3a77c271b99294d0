use std::path::PathBuf;

use chrono::{DateTime, Utc};
use foundation::ids::{LocationId, RegionId};

#[derive(Debug)]
pub enum DatasetError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    /// The same location id was registered under two regions.
    ConflictingRegion {
        location: LocationId,
        existing: RegionId,
        requested: RegionId,
    },
    UnknownLocation(LocationId),
    DuplicateTimestamp {
        location: LocationId,
        timestamp: DateTime<Utc>,
    },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io { path, source } => {
                write!(f, "failed to read dataset {}: {source}", path.display())
            }
            DatasetError::Parse(e) => write!(f, "failed to parse dataset records: {e}"),
            DatasetError::ConflictingRegion {
                location,
                existing,
                requested,
            } => write!(
                f,
                "location '{location}' is in region '{existing}', cannot also add it to '{requested}'"
            ),
            DatasetError::UnknownLocation(id) => {
                write!(f, "observation refers to unknown location '{id}'")
            }
            DatasetError::DuplicateTimestamp {
                location,
                timestamp,
            } => write!(
                f,
                "location '{location}' has more than one observation at {}",
                timestamp.to_rfc3339()
            ),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io { source, .. } => Some(source),
            DatasetError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
