use dataset::Location;
use foundation::geo::{GeoPoint, stable_total_cmp_f64};
use foundation::ids::LocationId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickHit {
    pub location: LocationId,
    pub position: GeoPoint,
    /// Planar distance from the click, in degrees.
    pub distance: f64,
}

/// Nearest positioned candidate to `click`, regardless of distance.
///
/// Ordering contract:
/// - The smallest planar distance wins.
/// - Equal distances are broken by the lexicographically smaller id, so the
///   result does not depend on the order of `candidates`.
///
/// Candidates without a position are ignored; `None` if none are left.
pub fn nearest(candidates: &[Location], click: GeoPoint) -> Option<PickHit> {
    let mut best: Option<(f64, &Location, GeoPoint)> = None;

    for location in candidates {
        let Some(position) = location.position else {
            continue;
        };
        let d = click.planar_distance(position);

        best = match best {
            None => Some((d, location, position)),
            Some((bd, bl, bp)) => {
                let ord = stable_total_cmp_f64(d, bd).then_with(|| location.id.cmp(&bl.id));
                if ord.is_lt() {
                    Some((d, location, position))
                } else {
                    Some((bd, bl, bp))
                }
            }
        };
    }

    let (distance, location, position) = best?;
    Some(PickHit {
        location: location.id.clone(),
        position,
        distance,
    })
}

/// Map-click hit test: the nearest candidate if it lies strictly closer than
/// `threshold`.
pub fn pick_nearest(candidates: &[Location], click: GeoPoint, threshold: f64) -> Option<PickHit> {
    nearest(candidates, click).filter(|hit| hit.distance < threshold)
}

#[cfg(test)]
mod tests {
    use super::{nearest, pick_nearest};
    use dataset::Location;
    use foundation::geo::GeoPoint;

    fn loc(id: &str, lat: f64, lon: f64) -> Location {
        Location::new(id, "R", GeoPoint::new(lat, lon))
    }

    fn click(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn picks_closest_marker() {
        let cands = vec![
            loc("Park A", 22.3167, 114.1700),
            loc("Park B", 22.3231, 114.1650),
        ];
        let hit = pick_nearest(&cands, click(22.3231, 114.1650), 0.01).expect("hit");
        assert_eq!(hit.location.as_str(), "Park B");
        assert!(hit.distance < 1e-12);
    }

    #[test]
    fn far_click_misses() {
        let cands = vec![loc("Park A", 22.3167, 114.1700)];
        assert!(pick_nearest(&cands, click(0.0, 0.0), 0.01).is_none());
        // The nearest marker is still reported without the threshold.
        assert_eq!(
            nearest(&cands, click(0.0, 0.0)).unwrap().location.as_str(),
            "Park A"
        );
    }

    #[test]
    fn threshold_is_strict() {
        let cands = vec![loc("P", 0.0, 0.5)];
        assert!(pick_nearest(&cands, click(0.0, 0.0), 0.5).is_none());
        assert!(pick_nearest(&cands, click(0.0, 0.0), 0.5000001).is_some());
    }

    #[test]
    fn tie_breaks_by_identifier_regardless_of_order() {
        let a = loc("Alpha", 0.0, 0.001);
        let b = loc("Beta", 0.0, -0.001);
        let c = loc("Gamma", 0.001, 0.0);

        let forward = vec![a.clone(), b.clone(), c.clone()];
        let backward = vec![c, b, a];
        for cands in [forward, backward] {
            let hit = pick_nearest(&cands, click(0.0, 0.0), 0.01).expect("hit");
            assert_eq!(hit.location.as_str(), "Alpha");
        }
    }

    #[test]
    fn locations_without_position_are_not_candidates() {
        let cands = vec![
            Location::new("Hidden", "R", None),
            loc("Visible", 1.0, 1.0),
        ];
        let hit = nearest(&cands, click(0.0, 0.0)).unwrap();
        assert_eq!(hit.location.as_str(), "Visible");

        let only_hidden = vec![Location::new("Hidden", "R", None)];
        assert!(nearest(&only_hidden, click(0.0, 0.0)).is_none());
        assert!(nearest(&[], click(0.0, 0.0)).is_none());
    }
}
