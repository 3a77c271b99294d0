//! Plain-text rendering of the viewer: dropdowns, map markers and the vacancy
//! bar chart.

use std::fmt::Write as _;

use dataset::Dataset;
use selection::SelectionView;

pub const TITLE: &str = "Hong Kong Car Park Vacancy Viewer";
pub const NO_MAP: &str = "No valid latitude/longitude data available for this region.";
pub const NO_SERIES: &str = "No data available for the selected car park.";

const BAR_WIDTH: usize = 40;

pub fn render_view(view: &SelectionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));

    let Some(region) = &view.selection.region else {
        let _ = writeln!(out, "No region selected.");
        return out;
    };

    let _ = writeln!(out, "Region: {region}");
    let selected = view.selection.location.as_ref();
    for id in &view.locations {
        let mark = if Some(id) == selected { '>' } else { ' ' };
        let _ = writeln!(out, " {mark} {id}");
    }
    if view.locations.is_empty() {
        let _ = writeln!(out, "   (no car parks)");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Car Parks in {region}");
    if view.has_map() {
        for p in &view.map_points {
            let _ = writeln!(
                out,
                "  {:<24} {:>9.4} {:>10.4}",
                p.id.as_str(),
                p.position.lat,
                p.position.lon
            );
        }
    } else {
        let _ = writeln!(out, "{NO_MAP}");
    }

    let _ = writeln!(out);
    match selected {
        Some(id) if !view.series.is_empty() => {
            let _ = writeln!(out, "Vacancy for {id}");
            let peak = view.peak_vacancy().unwrap_or(0);
            for o in &view.series {
                let _ = writeln!(
                    out,
                    "  {} | {:<width$} {}",
                    o.timestamp.format("%Y-%m-%d %H:%M"),
                    "#".repeat(bar_len(o.vacancy, peak)),
                    o.vacancy,
                    width = BAR_WIDTH
                );
            }
        }
        _ => {
            let _ = writeln!(out, "{NO_SERIES}");
        }
    }
    out
}

/// Region listing for the `regions` command.
pub fn render_regions(dataset: &Dataset) -> String {
    let mut out = String::new();
    for region in dataset.regions() {
        let locations = dataset.locations_in(region.as_str());
        let _ = writeln!(out, "{region} ({} car parks)", locations.len());
        for l in locations {
            let suffix = if l.position.is_none() { "  [no coordinates]" } else { "" };
            let _ = writeln!(
                out,
                "  {}{suffix}  readings={}",
                l.id,
                dataset.observations_for(l.id.as_str()).len()
            );
        }
    }
    out
}

fn bar_len(value: u32, peak: u32) -> usize {
    if peak == 0 {
        return 0;
    }
    let scaled = (u64::from(value) * BAR_WIDTH as u64).div_ceil(u64::from(peak));
    scaled as usize
}

#[cfg(test)]
mod tests {
    use super::{NO_MAP, NO_SERIES, bar_len, render_regions, render_view};
    use dataset::{Dataset, Location};
    use selection::SelectionSynchronizer;
    use std::sync::Arc;

    #[test]
    fn renders_selected_park_with_chart() {
        let sync = SelectionSynchronizer::with_default_config(Arc::new(Dataset::sample()));
        sync.set_region("Kowloon").unwrap();
        sync.set_location("Park B").unwrap();
        let text = render_view(&sync.view());

        assert!(text.contains("Car Parks in Kowloon"));
        assert!(text.contains(" > Park B"));
        assert!(text.contains("   Park A"));
        assert!(text.contains("Vacancy for Park B"));
        assert!(text.contains("2025-11-01 00:15"));
        assert!(!text.contains(NO_MAP));
    }

    #[test]
    fn renders_placeholders_for_empty_region() {
        let mut b = Dataset::builder();
        b.add_region("Empty");
        b.add_location(Location::new("Pier", "Islands", None)).unwrap();
        let sync = SelectionSynchronizer::with_default_config(Arc::new(b.build().unwrap()));

        sync.set_region("Empty").unwrap();
        let text = render_view(&sync.view());
        assert!(text.contains("(no car parks)"));
        assert!(text.contains(NO_MAP));
        assert!(text.contains(NO_SERIES));

        sync.set_region("Islands").unwrap();
        let text = render_view(&sync.view());
        assert!(text.contains(" > Pier"));
        assert!(text.contains(NO_MAP));
        assert!(text.contains(NO_SERIES));
    }

    #[test]
    fn renders_without_region() {
        let sync = SelectionSynchronizer::with_default_config(Arc::new(Dataset::sample()));
        assert!(render_view(&sync.view()).contains("No region selected."));
    }

    #[test]
    fn region_listing_marks_missing_coordinates() {
        let mut b = Dataset::builder();
        b.add_location(Location::new("Pier", "Islands", None)).unwrap();
        let text = render_regions(&b.build().unwrap());
        assert!(text.contains("Islands (1 car parks)"));
        assert!(text.contains("Pier  [no coordinates]  readings=0"));
    }

    #[test]
    fn bars_scale_to_peak() {
        assert_eq!(bar_len(20, 20), 40);
        assert_eq!(bar_len(10, 20), 20);
        assert_eq!(bar_len(1, 20), 2);
        assert_eq!(bar_len(0, 20), 0);
        assert_eq!(bar_len(0, 0), 0);
    }
}
