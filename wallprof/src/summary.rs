use crate::profile::Profile;
use serde::Serialize;

/// Profiles with fewer valid samples are left out of cross-section
/// analysis.
const MIN_CROSS_SECTION_SAMPLES: usize = 10;

/// Profiles with fewer valid samples are left out of the terrain
/// variability mean.
const MIN_VARIABILITY_SAMPLES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Variability {
    Low,
    Moderate,
    High,
}

impl Variability {
    /// Classifies elevation range per unit of section width.
    pub fn classify(value: f64) -> Self {
        if value < 0.1 {
            Variability::Low
        } else if value < 0.3 {
            Variability::Moderate
        } else {
            Variability::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,

    /// Sample standard deviation, 0 for a single value.
    pub std_dev: f64,
}

impl ElevationSummary {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Terrain statistics across every profile of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallSummary {
    pub profile_count: usize,

    /// Profiles with at least one valid sample.
    pub valid_profiles: usize,

    /// PK span between the first and last valid profiles.
    pub total_length: f64,

    /// Over all valid samples of all profiles. `None` when there are
    /// none.
    pub elevation: Option<ElevationSummary>,

    /// Mean absolute grade between consecutive profile means, in
    /// percent.
    pub longitudinal_slope: f64,

    /// Mean least-squares grade of the negative-offset side, measured
    /// outward, in percent.
    pub cross_slope_left: f64,

    /// Mean least-squares grade of the positive-offset side, in
    /// percent.
    pub cross_slope_right: f64,

    /// Largest single-side grade seen, in percent.
    pub max_cross_slope: f64,

    /// Mean of elevation range divided by section width.
    pub variability_value: f64,

    pub variability: Variability,
}

impl WallSummary {
    pub fn from_profiles(profiles: &[Profile]) -> Self {
        let valid: Vec<&Profile> = profiles.iter().filter(|p| p.stats.is_some()).collect();

        let total_length = match (valid.first(), valid.last()) {
            (Some(first), Some(last)) => last.station.pk - first.station.pk,
            _ => 0.0,
        };

        let elevation = elevation_summary(valid.iter().flat_map(|p| p.valid_samples()).map(|(_, z)| z));

        let grades: Vec<f64> = profiles
            .windows(2)
            .filter_map(|pair| {
                let (a, b) = (pair[0].stats?, pair[1].stats?);
                let run = pair[1].station.pk - pair[0].station.pk;
                (run > 0.0).then(|| ((b.mean - a.mean) / run * 100.0).abs())
            })
            .collect();

        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut variabilities = Vec::new();
        for profile in &valid {
            let count = profile.valid_count();
            if count < MIN_CROSS_SECTION_SAMPLES {
                continue;
            }
            let left_side = profile
                .valid_samples()
                .filter(|(o, _)| *o < 0.0)
                .map(|(o, z)| (o.abs(), z));
            if let Some(grade) = regression_grade(left_side) {
                left.push(grade);
            }
            let right_side = profile.valid_samples().filter(|(o, _)| *o > 0.0);
            if let Some(grade) = regression_grade(right_side) {
                right.push(grade);
            }
            if let Some(stats) = profile.stats {
                if count >= MIN_VARIABILITY_SAMPLES && profile.width > 0.0 {
                    variabilities.push(stats.range() / profile.width);
                }
            }
        }

        let max_cross_slope = left
            .iter()
            .chain(&right)
            .copied()
            .reduce(f64::max)
            .unwrap_or(0.0);
        let variability_value = mean(&variabilities);

        WallSummary {
            profile_count: profiles.len(),
            valid_profiles: valid.len(),
            total_length,
            elevation,
            longitudinal_slope: mean(&grades),
            cross_slope_left: mean(&left),
            cross_slope_right: mean(&right),
            max_cross_slope,
            variability_value,
            variability: Variability::classify(variability_value),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn elevation_summary<I: Iterator<Item = f64>>(values: I) -> Option<ElevationSummary> {
    let values: Vec<f64> = values.collect();
    let n = values.len();
    if n == 0 {
        return None;
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &z| (lo.min(z), hi.max(z)));
    let mean = mean(&values);
    let std_dev = if n > 1 {
        let ss: f64 = values.iter().map(|z| (z - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        0.0
    };
    Some(ElevationSummary {
        min,
        max,
        mean,
        std_dev,
    })
}

/// Least-squares slope of `(x, y)` points, in percent. `None` for fewer
/// than two points or a vertical fit.
fn regression_grade<I: Iterator<Item = (f64, f64)>>(points: I) -> Option<f64> {
    let (mut n, mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in points {
        n += 1.0;
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }
    let denom = n * sxx - sx * sx;
    if n < 2.0 || denom == 0.0 {
        return None;
    }
    Some((n * sxy - sx * sy) / denom * 100.0)
}

#[cfg(test)]
mod tests {
    use super::{regression_grade, Variability, WallSummary};
    use crate::{
        alignment::Alignment,
        profile::{build_all, Profile, ProfileSample, ProfileStats},
    };
    use approx::assert_relative_eq;
    use ascgrid::AscGrid;
    use geo::geometry::Coord;
    use std::path::PathBuf;

    fn synthetic(pk: f64, f: impl Fn(f64) -> Option<f64>) -> Profile {
        let alignment = Alignment::straight()
            .start(Coord { x: 0.0, y: 0.0 })
            .end(Coord { x: 0.0, y: 200.0 })
            .interval(20.0)
            .build()
            .unwrap();
        let samples: Vec<ProfileSample> = (-20..=20)
            .map(|o| {
                let offset = f64::from(o);
                ProfileSample {
                    offset,
                    elevation: f(offset),
                    x: -offset,
                    y: pk,
                }
            })
            .collect();
        let stats = ProfileStats::from_samples(&samples);
        Profile {
            station: alignment.nearest_station(pk).clone(),
            samples,
            stats,
            width: 40.0,
            resolution: 1.0,
        }
    }

    #[test]
    fn test_regression_grade() {
        let grade = regression_grade([(0.0, 1.0), (1.0, 1.5), (2.0, 2.0)].into_iter()).unwrap();
        assert_relative_eq!(grade, 50.0, epsilon = 1e-9);
        assert_eq!(regression_grade([(1.0, 1.0)].into_iter()), None);
        assert_eq!(regression_grade([(1.0, 1.0), (1.0, 2.0)].into_iter()), None);
    }

    #[test]
    fn test_classify() {
        assert_eq!(Variability::classify(0.0), Variability::Low);
        assert_eq!(Variability::classify(0.1), Variability::Moderate);
        assert_eq!(Variability::classify(0.29), Variability::Moderate);
        assert_eq!(Variability::classify(0.3), Variability::High);
    }

    #[test]
    fn test_slope_surface() {
        let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "..", "data", "ascgrid", "slope.asc"]
            .iter()
            .collect();
        let grid = AscGrid::load(path).unwrap();
        let alignment = Alignment::straight()
            .start(Coord { x: 0.0, y: 0.0 })
            .end(Coord { x: 0.0, y: 100.0 })
            .interval(20.0)
            .build()
            .unwrap();
        let profiles: Vec<Profile> = build_all(&alignment, &grid, 40.0, 1.0)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        let summary = WallSummary::from_profiles(&profiles);

        assert_eq!(summary.profile_count, 6);
        assert_eq!(summary.valid_profiles, 6);
        assert_eq!(summary.total_length, 100.0);
        let elevation = summary.elevation.unwrap();
        assert_relative_eq!(elevation.min, 50.0, epsilon = 1e-9);
        assert_relative_eq!(elevation.max, 60.0, epsilon = 1e-9);
        assert_relative_eq!(elevation.mean, 55.0, epsilon = 1e-9);
        // 41 samples at each of 50, 52, .., 60.
        assert_relative_eq!(elevation.std_dev, (2870.0_f64 / 245.0).sqrt(), epsilon = 1e-9);
        assert_relative_eq!(summary.longitudinal_slope, 10.0, epsilon = 1e-9);
        assert_relative_eq!(summary.cross_slope_left, 0.0, epsilon = 1e-9);
        assert_relative_eq!(summary.cross_slope_right, 0.0, epsilon = 1e-9);
        assert_eq!(summary.variability, Variability::Low);
    }

    #[test]
    fn test_cross_slopes() {
        let profiles = [
            synthetic(0.0, |o| Some(if o < 0.0 { 100.0 - 0.05 * o } else { 100.0 - 0.1 * o })),
            synthetic(20.0, |o| Some(if o < 0.0 { 102.0 - 0.15 * o } else { 102.0 - 0.3 * o })),
        ];
        let summary = WallSummary::from_profiles(&profiles);
        // Left grades 5% and 15%, right grades -10% and -30%.
        assert_relative_eq!(summary.cross_slope_left, 10.0, epsilon = 1e-9);
        assert_relative_eq!(summary.cross_slope_right, -20.0, epsilon = 1e-9);
        assert_relative_eq!(summary.max_cross_slope, 15.0, epsilon = 1e-9);
        // Ranges 3 and 9 over a 40 wide section.
        assert_relative_eq!(summary.variability_value, 0.15, epsilon = 1e-9);
        assert_eq!(summary.variability, Variability::Moderate);
    }

    #[test]
    fn test_sparse_and_empty_profiles() {
        let profiles = [
            synthetic(0.0, |_| None),
            synthetic(20.0, |o| (o.abs() < 3.0).then_some(80.0)),
            synthetic(40.0, |_| Some(90.0)),
        ];
        let summary = WallSummary::from_profiles(&profiles);
        assert_eq!(summary.profile_count, 3);
        assert_eq!(summary.valid_profiles, 2);
        assert_eq!(summary.total_length, 20.0);
        let elevation = summary.elevation.unwrap();
        assert_eq!(elevation.min, 80.0);
        assert_eq!(elevation.max, 90.0);
        // 80 -> 90 over 20.
        assert_relative_eq!(summary.longitudinal_slope, 50.0, epsilon = 1e-9);
        assert_relative_eq!(summary.cross_slope_left, 0.0, epsilon = 1e-9);

        let empty = WallSummary::from_profiles(&[]);
        assert_eq!(empty.profile_count, 0);
        assert_eq!(empty.elevation, None);
        assert_eq!(empty.variability, Variability::Low);
    }
}
