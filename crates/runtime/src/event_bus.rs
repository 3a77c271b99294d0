use std::fmt;
use std::sync::Arc;

use foundation::ids::{LocationId, RegionId};
use parking_lot::Mutex;
use serde::Serialize;

/// Which input channel produced a selection change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCause {
    Region,
    Location,
    MapClick,
}

impl fmt::Display for ChangeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeCause::Region => "region",
            ChangeCause::Location => "location",
            ChangeCause::MapClick => "map_click",
        };
        f.write_str(s)
    }
}

/// Fired after a mutating call actually changed the selected location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionChanged {
    /// Per-session sequence number, starting at 1.
    pub seq: u64,
    pub region: RegionId,
    pub location: Option<LocationId>,
    pub cause: ChangeCause,
}

/// Downstream consumer of selection changes (typically a chart renderer).
///
/// Called synchronously while the session is locked; implementations must not
/// call back into the synchronizer that notified them.
pub trait SelectionListener: Send + Sync {
    fn selection_changed(&self, event: &SelectionChanged);
}

impl<F> SelectionListener for F
where
    F: Fn(&SelectionChanged) + Send + Sync,
{
    fn selection_changed(&self, event: &SelectionChanged) {
        self(event)
    }
}

/// Ordered fan-out to listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Arc<dyn SelectionListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Arc<dyn SelectionListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to every listener in subscription order.
    pub fn publish(&self, event: &SelectionChanged) {
        for listener in &self.listeners {
            listener.selection_changed(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Listener that records every event it sees.
///
/// Clones share the same underlying log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SelectionChanged>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SelectionChanged> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn drain(&self) -> Vec<SelectionChanged> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl SelectionListener for EventLog {
    fn selection_changed(&self, event: &SelectionChanged) {
        self.events.lock().push(event.clone());
    }
}
