//! Session scripts: one input event per line.
//!
//! ```text
//! # comments and blank lines are skipped
//! region Kowloon
//! location Park B
//! click 22.3231 114.1650
//! ```

use runtime::event_bus::SelectionChanged;
use selection::{ClickOutcome, SelectionError, SelectionSynchronizer};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEvent {
    Region(String),
    Location(String),
    Click { lat: f64, lon: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "script line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

/// Parses a whole script. Returned events carry their 1-based line number.
pub fn parse_script(src: &str) -> Result<Vec<(usize, ScriptEvent)>, ScriptError> {
    let mut out = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let event = parse_line(text).map_err(|message| ScriptError { line, message })?;
        out.push((line, event));
    }
    Ok(out)
}

fn parse_line(text: &str) -> Result<ScriptEvent, String> {
    let (verb, rest) = text
        .split_once(char::is_whitespace)
        .map(|(v, r)| (v, r.trim()))
        .unwrap_or((text, ""));

    match verb {
        "region" | "location" if rest.is_empty() => Err(format!("{verb} requires a name")),
        "region" => Ok(ScriptEvent::Region(rest.to_string())),
        "location" => Ok(ScriptEvent::Location(rest.to_string())),
        "click" => {
            let coords: Vec<&str> = rest.split_whitespace().collect();
            let [lat, lon] = coords.as_slice() else {
                return Err("click requires <lat> <lon>".to_string());
            };
            let lat = lat
                .parse::<f64>()
                .map_err(|_| format!("invalid latitude '{lat}'"))?;
            let lon = lon
                .parse::<f64>()
                .map_err(|_| format!("invalid longitude '{lon}'"))?;
            Ok(ScriptEvent::Click { lat, lon })
        }
        other => Err(format!("unknown event '{other}'")),
    }
}

/// What happened when an event was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Changed(SelectionChanged),
    Unchanged,
    Missed,
    NoMarkers,
}

pub fn apply(sync: &SelectionSynchronizer, event: &ScriptEvent) -> Result<Applied, SelectionError> {
    let changed = match event {
        ScriptEvent::Region(name) => sync.set_region(name)?,
        ScriptEvent::Location(id) => sync.set_location(id)?,
        ScriptEvent::Click { lat, lon } => match sync.handle_map_click(*lat, *lon) {
            ClickOutcome::Hit { changed, .. } => changed,
            ClickOutcome::Miss => return Ok(Applied::Missed),
            ClickOutcome::NoCandidates => return Ok(Applied::NoMarkers),
        },
    };
    Ok(changed.map_or(Applied::Unchanged, Applied::Changed))
}

#[cfg(test)]
mod tests {
    use super::{Applied, ScriptEvent, apply, parse_script};
    use dataset::Dataset;
    use pretty_assertions::assert_eq;
    use selection::{SelectionError, SelectionSynchronizer};
    use std::sync::Arc;

    #[test]
    fn parses_events_with_line_numbers() {
        let src = "# demo\n\nregion Hong Kong Island\nlocation  Park D \nclick 22.3 114.1\n";
        let events = parse_script(src).unwrap();
        assert_eq!(
            events,
            vec![
                (3, ScriptEvent::Region("Hong Kong Island".to_string())),
                (4, ScriptEvent::Location("Park D".to_string())),
                (5, ScriptEvent::Click { lat: 22.3, lon: 114.1 }),
            ]
        );
    }

    #[test]
    fn reports_bad_lines() {
        let err = parse_script("region Kowloon\nclick 22.3\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "click requires <lat> <lon>");

        let err = parse_script("click north 114.1").unwrap_err();
        assert_eq!(err.message, "invalid latitude 'north'");

        let err = parse_script("zoom 3").unwrap_err();
        assert_eq!(err.message, "unknown event 'zoom'");

        let err = parse_script("location").unwrap_err();
        assert_eq!(err.message, "location requires a name");
    }

    #[test]
    fn applies_events_to_synchronizer() {
        let sync = SelectionSynchronizer::with_default_config(Arc::new(Dataset::sample()));

        let a = apply(&sync, &ScriptEvent::Region("Kowloon".to_string())).unwrap();
        assert!(matches!(a, Applied::Changed(ref e) if e.location.as_ref().map(|l| l.as_str()) == Some("Park A")));

        let click = ScriptEvent::Click { lat: 22.3231, lon: 114.1650 };
        assert!(matches!(apply(&sync, &click).unwrap(), Applied::Changed(_)));
        assert_eq!(apply(&sync, &click).unwrap(), Applied::Unchanged);

        let miss = ScriptEvent::Click { lat: 0.0, lon: 0.0 };
        assert_eq!(apply(&sync, &miss).unwrap(), Applied::Missed);

        let err = apply(&sync, &ScriptEvent::Location("Park Z".to_string())).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidLocation { .. }));
    }
}
