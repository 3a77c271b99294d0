use foundation::ids::RegionId;

/// A rejected input event. The session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    InvalidRegion(String),
    InvalidLocation {
        region: Option<RegionId>,
        location: String,
    },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::InvalidRegion(region) => write!(f, "unknown region '{region}'"),
            SelectionError::InvalidLocation {
                region: Some(region),
                location,
            } => write!(f, "location '{location}' is not in region '{region}'"),
            SelectionError::InvalidLocation {
                region: None,
                location,
            } => write!(f, "cannot select location '{location}' before a region is chosen"),
        }
    }
}

impl std::error::Error for SelectionError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidThreshold(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidThreshold(raw) => write!(
                f,
                "click threshold must be a finite number greater than zero, got '{raw}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
