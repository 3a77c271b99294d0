//! Replays a parsed script against a synchronizer, rendering after each step.

use std::io::Write;
use std::sync::Arc;

use runtime::event_bus::EventLog;
use selection::SelectionSynchronizer;
use tracing::{info, warn};

use crate::render::render_view;
use crate::script::{Applied, ScriptEvent, apply};

/// Selects the first region, renders, then applies `steps` in order.
///
/// Rejected events are reported in the output and replay continues. With
/// `print_events` every selection-changed notification is written as a JSON
/// line after the frame that caused it.
pub fn run_session<W: Write>(
    sync: &SelectionSynchronizer,
    steps: &[(usize, ScriptEvent)],
    print_events: bool,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let log = EventLog::new();
    sync.subscribe(Arc::new(log.clone()));

    // The region dropdown always has something selected on first render.
    if let Some(first) = sync.region_options().into_iter().next() {
        sync.set_region(first.as_str())?;
    }
    write!(out, "{}", render_view(&sync.view()))?;
    flush_events(&log, print_events, out)?;

    for (line, event) in steps {
        writeln!(out)?;
        writeln!(out, "--- line {line}: {event:?}")?;
        match apply(sync, event) {
            Ok(Applied::Changed(_)) | Ok(Applied::Unchanged) => {}
            Ok(Applied::Missed) => writeln!(out, "(click missed every marker)")?,
            Ok(Applied::NoMarkers) => writeln!(out, "(no markers to click in this region)")?,
            Err(err) => {
                warn!(line, "{err}");
                writeln!(out, "(rejected: {err})")?;
            }
        }
        write!(out, "{}", render_view(&sync.view()))?;
        flush_events(&log, print_events, out)?;
    }

    let metrics = sync.metrics();
    info!(?metrics, "session finished");
    Ok(())
}

fn flush_events<W: Write>(
    log: &EventLog,
    print_events: bool,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    for event in log.drain() {
        if print_events {
            writeln!(out, "event: {}", serde_json::to_string(&event)?)?;
        }
    }
    Ok(())
}
