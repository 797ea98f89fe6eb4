//! Circle overlap tests.

use glam::DVec2;

/// True when two circles touch or overlap.
#[inline]
pub fn circles_overlap(a: DVec2, a_radius: f64, b: DVec2, b_radius: f64) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}

/// Closest candidate within `range` of `origin`. Ties keep the first.
pub fn nearest_within<T>(
    origin: DVec2,
    range: f64,
    candidates: impl IntoIterator<Item = (T, DVec2)>,
) -> Option<(T, DVec2)> {
    let limit = range * range;
    let mut best: Option<(T, DVec2, f64)> = None;
    for (item, position) in candidates {
        let distance = origin.distance_squared(position);
        if distance > limit {
            continue;
        }
        if best.as_ref().is_none_or(|(_, _, d)| distance < *d) {
            best = Some((item, position, distance));
        }
    }
    best.map(|(item, position, _)| (item, position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_circles_overlap() {
        assert!(circles_overlap(DVec2::ZERO, 5.0, DVec2::new(10.0, 0.0), 5.0));
        assert!(!circles_overlap(DVec2::ZERO, 5.0, DVec2::new(10.1, 0.0), 5.0));
    }

    #[test]
    fn nearest_respects_range() {
        let candidates = [
            (1, DVec2::new(50.0, 0.0)),
            (2, DVec2::new(0.0, 20.0)),
            (3, DVec2::new(5.0, 0.0)),
        ];
        assert_eq!(
            nearest_within(DVec2::ZERO, 100.0, candidates).map(|(id, _)| id),
            Some(3)
        );
        assert_eq!(nearest_within(DVec2::ZERO, 1.0, candidates), None);
    }
}
