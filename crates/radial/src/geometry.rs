//! Pure angle and radius arithmetic for the two rings.
//!
//! Angles are degrees in `[0, 360)` measured clockwise from the positive x
//! axis in y-down screen space, so 270 is straight up.

use crate::model::{Label, SizeConfig};
use crate::ordered::OrderedMap;

/// First primary sector sits at 12 o'clock.
pub const START_ANGLE: f64 = 270.0;
/// Arc width of one child at multiplier 1.0.
pub const CHILD_BASE_STEP: f64 = 25.0;

const MIN_HYSTERESIS: f64 = 12.0;
const HYSTERESIS_FRACTION: f64 = 0.6;
const EDGE_PAD: f64 = 12.0;
const DESCRIPTION_RESERVE: f64 = 22.0;
const MIN_DISPLAY_RADIUS: f64 = 20.0;

pub type AngleMap = OrderedMap<Label, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Evenly spaced sector centres, starting at 12 o'clock.
pub fn angles_for_labels<'a>(labels: impl IntoIterator<Item = &'a Label>) -> AngleMap {
    let labels: Vec<&Label> = labels.into_iter().collect();
    if labels.is_empty() {
        return AngleMap::new();
    }
    let step = 360.0 / labels.len() as f64;
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| (label.clone(), normalize_degrees(START_ANGLE + i as f64 * step)))
        .collect()
}

/// The sector owning `angle`. Each sector owns the half-open band
/// `[centre - step/2, centre + step/2)`; bands are located by index from the
/// first centre so every angle has exactly one owner.
pub fn sector_from_angle(angle: f64, angles: &AngleMap) -> Option<&Label> {
    let n = angles.len();
    let (_, first) = angles.first()?;
    let step = 360.0 / n as f64;
    let rel = normalize_degrees(angle - first + step / 2.0);
    let idx = ((rel / step).floor() as usize).min(n - 1);
    angles.get_index(idx).map(|(label, _)| label)
}

pub fn child_step(child_angle_multiplier: f64) -> f64 {
    CHILD_BASE_STEP * child_angle_multiplier
}

/// Start angles of a contiguous child arc centred on `parent_angle`.
pub fn child_angles_for_parent<'a>(
    parent_angle: f64,
    children: impl IntoIterator<Item = &'a Label>,
    step: f64,
) -> AngleMap {
    let children: Vec<&Label> = children.into_iter().collect();
    let total = step * children.len() as f64;
    let start = parent_angle - total / 2.0;
    children
        .into_iter()
        .enumerate()
        .map(|(i, label)| (label.clone(), normalize_degrees(start + i as f64 * step)))
        .collect()
}

/// The child whose arc `[start, start + step]` contains `angle`. A shared
/// edge goes to the earlier child.
pub fn outer_sector_from_angle<'a>(
    angle: f64,
    child_angles: &'a AngleMap,
    step: f64,
) -> Option<&'a Label> {
    let angle = normalize_degrees(angle);
    child_angles
        .iter()
        .find(|(_, start)| normalize_degrees(angle - **start) <= step)
        .map(|(label, _)| label)
}

/// `(angle, distance)` of `point` around `center`.
pub fn angle_distance_from_center(point: Point, center: Point) -> (f64, f64) {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    (normalize_degrees(dy.atan2(dx).to_degrees()), dx.hypot(dy))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingZone {
    Hole,
    Inner,
    Gap,
    Outer,
    Beyond,
}

/// Concrete ring radii for one drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingMetrics {
    pub hole: f64,
    pub inner_radius: f64,
    pub outer_inner: f64,
    pub outer_outer: f64,
    pub hysteresis: f64,
    pub scale: f64,
}

impl RingMetrics {
    pub fn from_size(size: &SizeConfig) -> Self {
        Self::with_radius(size, size.radius)
    }

    /// Shrinks the inner ring to fit a `width` x `height` surface, keeping a
    /// margin on every edge and a line below for the description.
    pub fn fit(size: &SizeConfig, width: f64, height: f64) -> Self {
        let horiz = ((width / 2.0).floor() - EDGE_PAD).max(MIN_DISPLAY_RADIUS);
        let vert = ((height / 2.0).floor() - EDGE_PAD - DESCRIPTION_RESERVE).max(MIN_DISPLAY_RADIUS);
        Self::with_radius(size, size.radius.min(horiz.min(vert)))
    }

    fn with_radius(size: &SizeConfig, radius: f64) -> Self {
        let scale = if size.radius > 0.0 {
            radius / size.radius
        } else {
            1.0
        };
        let outer_inner = radius + size.ring_gap;
        Self {
            hole: (size.inner_hole_radius * scale).floor().max(0.0),
            inner_radius: radius,
            outer_inner,
            outer_outer: outer_inner + size.outer_ring_width,
            hysteresis: MIN_HYSTERESIS.max((size.outer_ring_width * HYSTERESIS_FRACTION).floor()),
            scale,
        }
    }

    pub fn zone(&self, distance: f64) -> RingZone {
        if distance < self.hole {
            RingZone::Hole
        } else if distance <= self.inner_radius {
            RingZone::Inner
        } else if distance < self.outer_inner {
            RingZone::Gap
        } else if distance <= self.outer_outer {
            RingZone::Outer
        } else {
            RingZone::Beyond
        }
    }

    /// The true child band, the only place a specific child can be selected.
    pub fn in_child_band(&self, distance: f64) -> bool {
        (self.outer_inner..=self.outer_outer).contains(&distance)
    }

    /// The child band widened by the hysteresis margin. Only used to keep
    /// already visible children on screen.
    pub fn in_retention_band(&self, distance: f64) -> bool {
        let low = self.hole.max(self.outer_inner - self.hysteresis);
        let high = self.outer_outer + self.hysteresis;
        (low..=high).contains(&distance)
    }

    /// Diameter of the full menu plus padding.
    pub fn extent(&self) -> f64 {
        (self.outer_outer + EDGE_PAD) * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<Label> {
        names.iter().map(|n| Label::new(*n)).collect()
    }

    fn owners(angle: f64, map: &AngleMap) -> usize {
        let n = map.len() as f64;
        let step = 360.0 / n;
        map.values()
            .filter(|centre| {
                let start = normalize_degrees(**centre - step / 2.0);
                normalize_degrees(angle - start) < step
            })
            .count()
    }

    #[test]
    fn test_angles_start_at_twelve_o_clock() {
        let map = angles_for_labels(&labels(&["a", "b", "c", "d"]));
        let values: Vec<f64> = map.values().copied().collect();
        assert_eq!(values, vec![270.0, 0.0, 90.0, 180.0]);
        assert!(angles_for_labels(&labels(&[])).is_empty());
    }

    #[test]
    fn test_every_angle_has_exactly_one_sector() {
        for n in 1..=12 {
            let names: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let map = angles_for_labels(&labels(&names));
            let mut tenth = 0;
            while tenth < 3600 {
                let angle = tenth as f64 / 10.0;
                assert!(sector_from_angle(angle, &map).is_some(), "gap at {angle} for n={n}");
                tenth += 1;
            }
        }
    }

    #[test]
    fn test_band_ownership_is_half_open() {
        let map = angles_for_labels(&labels(&["up", "right", "down", "left"]));
        assert_eq!(sector_from_angle(270.0, &map).unwrap(), "up");
        assert_eq!(sector_from_angle(315.0, &map).unwrap(), "right");
        assert_eq!(sector_from_angle(314.9, &map).unwrap(), "up");
        assert_eq!(sector_from_angle(225.0, &map).unwrap(), "up");
        assert_eq!(sector_from_angle(359.9, &map).unwrap(), "right");
        assert_eq!(sector_from_angle(45.0, &map).unwrap(), "down");
        assert_eq!(owners(315.0, &map), 1);
        assert!(sector_from_angle(10.0, &AngleMap::new()).is_none());
    }

    #[test]
    fn test_single_sector_owns_everything() {
        let map = angles_for_labels(&labels(&["only"]));
        for angle in [0.0, 89.0, 90.0, 269.9, 270.0, 359.99] {
            assert_eq!(sector_from_angle(angle, &map).unwrap(), "only");
        }
    }

    #[test]
    fn test_child_arc_is_centred_on_parent() {
        let kids = labels(&["a", "b", "c"]);
        let map = child_angles_for_parent(270.0, &kids, 25.0);
        let starts: Vec<f64> = map.values().copied().collect();
        assert_eq!(starts, vec![232.5, 257.5, 282.5]);
    }

    #[test]
    fn test_child_arc_wraps_through_zero() {
        let kids = labels(&["a", "b"]);
        let map = child_angles_for_parent(0.0, &kids, 25.0);
        assert_eq!(map.get("a"), Some(&335.0));
        assert_eq!(map.get("b"), Some(&0.0));
        assert_eq!(outer_sector_from_angle(350.0, &map, 25.0).unwrap(), "a");
        assert_eq!(outer_sector_from_angle(10.0, &map, 25.0).unwrap(), "b");
        assert!(outer_sector_from_angle(40.0, &map, 25.0).is_none());
    }

    #[test]
    fn test_even_child_count_picks_first_at_parent_angle() {
        let kids = labels(&["first", "second"]);
        let step = child_step(1.0);
        let map = child_angles_for_parent(270.0, &kids, step);
        assert_eq!(outer_sector_from_angle(270.0, &map, step).unwrap(), "first");
        assert_eq!(outer_sector_from_angle(270.5, &map, step).unwrap(), "second");
    }

    #[test]
    fn test_angle_is_y_down_compass() {
        let c = Point::new(100.0, 100.0);
        let (up, d) = angle_distance_from_center(Point::new(100.0, 40.0), c);
        assert!((up - 270.0).abs() < 1e-9);
        assert_eq!(d, 60.0);
        let (right, _) = angle_distance_from_center(Point::new(150.0, 100.0), c);
        assert_eq!(right, 0.0);
        let (down, _) = angle_distance_from_center(Point::new(100.0, 130.0), c);
        assert!((down - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_ring_zones_and_bands() {
        let size = SizeConfig::default();
        let m = RingMetrics::from_size(&size);
        assert_eq!(m.hole, 52.0);
        assert_eq!(m.outer_inner, 155.0);
        assert_eq!(m.outer_outer, 180.0);
        assert_eq!(m.hysteresis, 15.0);

        assert_eq!(m.zone(10.0), RingZone::Hole);
        assert_eq!(m.zone(150.0), RingZone::Inner);
        assert_eq!(m.zone(152.0), RingZone::Gap);
        assert_eq!(m.zone(170.0), RingZone::Outer);
        assert_eq!(m.zone(181.0), RingZone::Beyond);

        assert!(!m.in_child_band(190.0));
        assert!(m.in_retention_band(190.0));
        assert!(m.in_retention_band(141.0));
        assert!(!m.in_retention_band(196.0));
    }

    #[test]
    fn test_fit_scales_hole_with_radius() {
        let size = SizeConfig::default();
        let m = RingMetrics::fit(&size, 200.0, 400.0);
        assert_eq!(m.inner_radius, 88.0);
        assert_eq!(m.hole, (52.0f64 * 88.0 / 150.0).floor());
        assert_eq!(m.outer_outer, 88.0 + 5.0 + 25.0);

        let roomy = RingMetrics::fit(&size, 1000.0, 1000.0);
        assert_eq!(roomy, RingMetrics::from_size(&size));
    }
}
