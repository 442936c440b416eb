//! Terrain intersection search.
//!
//! Boundaries are the offsets where a horizontal line at a reference
//! elevation meets the terrain. Two policies choose among the
//! candidates:
//!
//! - [`directional`] searches outward from an origin on each side and
//!   keeps the outermost crossing per side. It is used to measure the
//!   crest width at the crown elevation.
//! - [`projected`] raises a LAMA elevation by a fixed height and keeps
//!   the crossings nearest to and farthest from the origin.

use crate::{
    config::DetectionConfig,
    measurement::{ReferencePoint, WidthMeasurement},
    profile::Profile,
};
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Offsets below the origin.
    Left,
    /// Offsets above the origin.
    Right,
}

/// Result of a boundary search. Either both offsets are found or
/// neither is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Boundaries {
    pub left: Option<f64>,
    pub right: Option<f64>,

    /// Elevation the boundaries were searched at.
    pub reference: f64,
}

impl Boundaries {
    fn none(reference: f64) -> Self {
        Self {
            left: None,
            right: None,
            reference,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub fn width(&self) -> Option<WidthMeasurement> {
        Some(WidthMeasurement::from_boundaries(
            self.left?,
            self.right?,
            self.reference,
        ))
    }
}

/// Returns every offset where the polyline through `samples` meets
/// `reference`, in increasing offset order.
///
/// `samples` are `(offset, elevation)` pairs and need not be sorted.
/// Flat segments never cross, and a crossing shared by two segments at
/// a vertex is reported once.
pub fn find_crossings(samples: &[(f64, f64)], reference: f64) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut crossings: Vec<f64> = sorted
        .windows(2)
        .filter_map(|pair| {
            let ((o1, e1), (o2, e2)) = (pair[0], pair[1]);
            if e1 == e2 || reference < e1.min(e2) || reference > e1.max(e2) {
                return None;
            }
            Some(o1 + (reference - e1) / (e2 - e1) * (o2 - o1))
        })
        .collect();
    crossings.dedup();
    crossings
}

/// Searches one side of `origin` for a boundary at the origin's
/// elevation.
///
/// The outermost crossing wins. When the side has no crossing, the
/// sample closest in elevation to the reference is used instead if it
/// lies within `fallback_tolerance`, preferring the outermost among
/// equals. Sides with fewer than `min_side_samples` samples are not
/// searched.
pub fn search_side(
    samples: &[(f64, f64)],
    origin: ReferencePoint,
    side: Side,
    config: &DetectionConfig,
) -> Option<f64> {
    let side_samples: Vec<(f64, f64)> = samples
        .iter()
        .copied()
        .filter(|&(offset, _)| match side {
            Side::Left => offset < origin.offset,
            Side::Right => offset > origin.offset,
        })
        .collect();

    if side_samples.len() < config.min_side_samples {
        debug!(
            "{side:?} of {}: {} samples, need {}",
            origin.offset,
            side_samples.len(),
            config.min_side_samples
        );
        return None;
    }

    let outermost = |a: f64, b: f64| match side {
        Side::Left => a.min(b),
        Side::Right => a.max(b),
    };

    let crossings = find_crossings(&side_samples, origin.elevation);
    if let Some(found) = crossings.into_iter().reduce(outermost) {
        return Some(found);
    }

    let mut closest: Option<(f64, f64)> = None;
    for (offset, elevation) in side_samples {
        let diff = (elevation - origin.elevation).abs();
        let replace = match closest {
            None => true,
            Some((best_diff, best)) => {
                diff < best_diff || (diff == best_diff && outermost(offset, best) != best)
            }
        };
        if replace {
            closest = Some((diff, offset));
        }
    }
    closest
        .filter(|&(diff, _)| diff <= config.fallback_tolerance)
        .map(|(_, offset)| offset)
}

/// Finds the crest edges on both sides of `origin` at its elevation.
pub fn directional(
    samples: &[(f64, f64)],
    origin: ReferencePoint,
    config: &DetectionConfig,
) -> Boundaries {
    let left = search_side(samples, origin, Side::Left, config);
    let right = search_side(samples, origin, Side::Right, config);
    match (left, right) {
        (Some(_), Some(_)) => Boundaries {
            left,
            right,
            reference: origin.elevation,
        },
        _ => {
            debug!(
                "directional search from {} failed; left: {left:?}, right: {right:?}",
                origin.offset
            );
            Boundaries::none(origin.elevation)
        }
    }
}

/// Finds the width at `lama_elevation + projected_offset`.
///
/// Of all crossings over the whole profile, the one nearest
/// `origin_offset` and the one farthest from it are the boundaries.
/// Equidistant crossings resolve to the larger offset.
pub fn projected(
    samples: &[(f64, f64)],
    origin_offset: f64,
    lama_elevation: f64,
    config: &DetectionConfig,
) -> Boundaries {
    let reference = lama_elevation + config.projected_offset;
    if samples.len() < config.min_side_samples {
        return Boundaries::none(reference);
    }

    let crossings = find_crossings(samples, reference);
    if crossings.len() < 2 {
        debug!(
            "projected search at {reference}: {} crossings",
            crossings.len()
        );
        return Boundaries::none(reference);
    }

    let distance = |o: f64| (o - origin_offset).abs();
    let nearer = |a: f64, b: f64| {
        distance(a) < distance(b) || (distance(a) == distance(b) && a > b)
    };
    let farther = |a: f64, b: f64| {
        distance(a) > distance(b) || (distance(a) == distance(b) && a > b)
    };

    let nearest = crossings
        .iter()
        .copied()
        .reduce(|best, o| if nearer(o, best) { o } else { best });
    let farthest = crossings
        .iter()
        .copied()
        .filter(|&o| Some(o) != nearest)
        .reduce(|best, o| if farther(o, best) { o } else { best });

    match (nearest, farthest) {
        (Some(a), Some(b)) => Boundaries {
            left: Some(a.min(b)),
            right: Some(a.max(b)),
            reference,
        },
        _ => Boundaries::none(reference),
    }
}

impl Profile {
    /// Runs [`directional`] over this profile's valid samples.
    pub fn directional_boundaries(
        &self,
        origin: ReferencePoint,
        config: &DetectionConfig,
    ) -> Boundaries {
        let samples: Vec<(f64, f64)> = self.valid_samples().collect();
        directional(&samples, origin, config)
    }

    /// Runs [`projected`] over this profile's valid samples.
    pub fn projected_boundaries(
        &self,
        origin_offset: f64,
        lama_elevation: f64,
        config: &DetectionConfig,
    ) -> Boundaries {
        let samples: Vec<(f64, f64)> = self.valid_samples().collect();
        projected(&samples, origin_offset, lama_elevation, config)
    }
}

#[cfg(test)]
mod tests {
    use super::{directional, find_crossings, projected, search_side, Side};
    use crate::{
        config::DetectionConfig,
        measurement::{DetectionMethod, ReferencePoint},
    };

    /// `(offset, elevation)` for each integer offset in `range`.
    fn sampled(range: std::ops::RangeInclusive<i32>, f: impl Fn(f64) -> f64) -> Vec<(f64, f64)> {
        range.map(|o| (f64::from(o), f(f64::from(o)))).collect()
    }

    #[test]
    fn test_crossings_exact() {
        let samples = [(-5.0, 10.0), (0.0, 12.0), (5.0, 8.0)];
        let crossings = find_crossings(&samples, 11.0);
        assert_eq!(crossings, vec![-2.5, 1.25]);
        let left: Vec<f64> = crossings.into_iter().filter(|o| (-5.0..=0.0).contains(o)).collect();
        assert_eq!(left, vec![-2.5]);
    }

    #[test]
    fn test_crossings_edge_cases() {
        // Unsorted input.
        assert_eq!(find_crossings(&[(5.0, 8.0), (-5.0, 10.0), (0.0, 12.0)], 11.0), vec![-2.5, 1.25]);
        // Flat pairs contribute nothing.
        assert!(find_crossings(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)], 5.0).is_empty());
        // A crossing at a shared vertex is reported once.
        assert_eq!(find_crossings(&[(0.0, 4.0), (1.0, 5.0), (2.0, 6.0)], 5.0), vec![1.0]);
        // Inclusive at the segment ends.
        assert_eq!(find_crossings(&[(0.0, 4.0), (1.0, 5.0)], 4.0), vec![0.0]);
        assert!(find_crossings(&[(0.0, 4.0), (1.0, 5.0)], 5.5).is_empty());
        assert!(find_crossings(&[(0.0, 4.0)], 4.0).is_empty());
    }

    #[test]
    fn test_directional_picks_outermost() {
        // A bump rising from 100 to 104 at offset 0, with a second rise
        // on the right: crosses 102 at -10, 10 and again at 25.
        let samples = sampled(-30..=30, |o| {
            if o <= -10.0 {
                102.0 + (o + 10.0) * 0.1
            } else if o <= 0.0 {
                104.0 + o * 0.2
            } else if o <= 10.0 {
                104.0 - o * 0.2
            } else if o <= 20.0 {
                102.0 - (o - 10.0) * 0.1
            } else {
                101.0 + (o - 20.0) * 0.2
            }
        });
        let origin = ReferencePoint::new(0.0, 102.0);
        let config = DetectionConfig::default();

        let right = search_side(&samples, origin, Side::Right, &config).unwrap();
        approx::assert_relative_eq!(right, 25.0, epsilon = 1e-9);

        let boundaries = directional(&samples, origin, &config);
        approx::assert_relative_eq!(boundaries.left.unwrap(), -10.0, epsilon = 1e-9);
        let width = boundaries.width().unwrap();
        approx::assert_relative_eq!(width.distance, 35.0, epsilon = 1e-9);
        assert_eq!(width.method, DetectionMethod::Auto);
        assert_eq!(width.elevation, 102.0);
    }

    #[test]
    fn test_directional_fallback() {
        // Flat terrain: no crossing anywhere, every sample matches.
        let flat = sampled(-20..=20, |_| 54.0);
        let boundaries = directional(&flat, ReferencePoint::new(0.0, 54.0), &DetectionConfig::default());
        assert_eq!(boundaries.left, Some(-20.0));
        assert_eq!(boundaries.right, Some(20.0));

        // Flat but out of tolerance.
        let boundaries = directional(&flat, ReferencePoint::new(0.0, 55.5), &DetectionConfig::default());
        assert!(!boundaries.is_detected());
        assert_eq!(boundaries.width(), None);

        // Tighter tolerance rejects a 0.5 miss.
        let config = DetectionConfig {
            fallback_tolerance: 0.25,
            ..Default::default()
        };
        let boundaries = directional(&flat, ReferencePoint::new(0.0, 54.5), &config);
        assert_eq!((boundaries.left, boundaries.right), (None, None));
    }

    #[test]
    fn test_fallback_prefers_closest_elevation() {
        // Right side only rises, staying above the reference.
        let samples = sampled(1..=15, |o| 100.5 + o * 0.1);
        let origin = ReferencePoint::new(0.0, 100.0);
        let right = search_side(&samples, origin, Side::Right, &DetectionConfig::default());
        assert_eq!(right, Some(1.0));
    }

    #[test]
    fn test_sparse_side() {
        // Nine samples on the left, plenty on the right.
        let samples = sampled(-9..=30, |o| 100.0 - o.abs() * 0.1);
        let origin = ReferencePoint::new(0.0, 99.0);
        let config = DetectionConfig::default();
        assert_eq!(search_side(&samples, origin, Side::Left, &config), None);
        assert!(search_side(&samples, origin, Side::Right, &config).is_some());
        let boundaries = directional(&samples, origin, &config);
        assert_eq!((boundaries.left, boundaries.right), (None, None));
    }

    #[test]
    fn test_projected() {
        // A V-shaped valley, lowest at offset 5.
        let samples = sampled(-20..=20, |o| 100.0 + (o - 5.0).abs() * 0.5);
        let config = DetectionConfig::default();

        // 102 + 1 = 103 crosses at -1 and 11.
        let boundaries = projected(&samples, 0.0, 102.0, &config);
        assert_eq!(boundaries.reference, 103.0);
        approx::assert_relative_eq!(boundaries.left.unwrap(), -1.0, epsilon = 1e-9);
        approx::assert_relative_eq!(boundaries.right.unwrap(), 11.0, epsilon = 1e-9);
        approx::assert_relative_eq!(boundaries.width().unwrap().distance, 12.0, epsilon = 1e-9);

        // Below the valley floor.
        assert!(!projected(&samples, 0.0, 98.0, &config).is_detected());
    }

    #[test]
    fn test_projected_tie_prefers_larger_offset() {
        // Symmetric W: crossings at -15, -5, 5, 15 around origin 0.
        let samples = sampled(-20..=20, |o| {
            let d = (o.abs() - 10.0).abs();
            100.0 + d * 0.5
        });
        let config = DetectionConfig {
            projected_offset: 0.0,
            ..Default::default()
        };
        let boundaries = projected(&samples, 0.0, 102.5, &config);
        assert_eq!(boundaries.left, Some(5.0));
        assert_eq!(boundaries.right, Some(15.0));
    }

    #[test]
    fn test_projected_single_crossing() {
        let samples = sampled(-20..=20, |o| 100.0 + o * 0.1);
        assert!(!projected(&samples, 0.0, 100.0, &DetectionConfig::default()).is_detected());
    }
}
