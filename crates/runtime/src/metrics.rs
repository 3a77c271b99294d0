use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Session counters.
///
/// The set is closed so snapshots always list the same keys in the same order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    RegionChanges,
    LocationChanges,
    MapHits,
    MapMisses,
    Rejected,
    Notifications,
}

impl Counter {
    pub const ALL: [Counter; 6] = [
        Counter::RegionChanges,
        Counter::LocationChanges,
        Counter::MapHits,
        Counter::MapMisses,
        Counter::Rejected,
        Counter::Notifications,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Counter::RegionChanges => "region_changes",
            Counter::LocationChanges => "location_changes",
            Counter::MapHits => "map_hits",
            Counter::MapMisses => "map_misses",
            Counter::Rejected => "rejected",
            Counter::Notifications => "notifications",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Deterministic per-session metrics.
///
/// No wall-clock input and sorted storage, so two replays of the same input
/// produce identical snapshots.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionMetrics {
    counters: BTreeMap<Counter, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: Vec<(Counter, u64)>,
}

impl MetricsSnapshot {
    pub fn get(&self, counter: Counter) -> u64 {
        self.counters
            .iter()
            .find(|(c, _)| *c == counter)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    pub fn inc(&mut self, counter: Counter) {
        *self.counters.entry(counter).or_insert(0) += 1;
    }

    /// Every counter, zeros included, in declaration order.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: Counter::ALL.iter().map(|c| (*c, self.get(*c))).collect(),
        }
    }
}
