use crate::{alignment::Alignment, measurement::ReferencePoint, station::Station, WallprofError};
use ascgrid::AscGrid;
use geo::geometry::Coord;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

/// One point of a cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileSample {
    /// Signed distance from the station along the perpendicular.
    pub offset: f64,

    /// Terrain elevation, `None` where the raster has no data.
    pub elevation: Option<f64>,

    pub x: f64,
    pub y: f64,
}

impl ProfileSample {
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

/// Summary over the valid samples of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub valid_count: usize,
    pub total_count: usize,
}

impl ProfileStats {
    /// Returns `None` when no sample has an elevation.
    pub fn from_samples(samples: &[ProfileSample]) -> Option<Self> {
        let (min, max, sum, valid_count) = samples.iter().filter_map(|s| s.elevation).fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0_usize),
            |(min, max, sum, n), z| (min.min(z), max.max(z), sum + z, n + 1),
        );
        (valid_count > 0).then(|| ProfileStats {
            min,
            max,
            mean: sum / valid_count as f64,
            valid_count,
            total_count: samples.len(),
        })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Terrain elevations across one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub station: Station,

    /// Samples ordered by increasing offset.
    pub samples: Vec<ProfileSample>,

    pub stats: Option<ProfileStats>,

    pub width: f64,
    pub resolution: f64,
}

impl Profile {
    /// Samples `grid` across `station`.
    pub fn new(
        station: &Station,
        grid: &AscGrid,
        width: f64,
        resolution: f64,
    ) -> Result<Self, WallprofError> {
        let now = std::time::Instant::now();
        let samples: Vec<ProfileSample> = station
            .cross_section_points(width, resolution)?
            .into_iter()
            .map(|(offset, coord)| ProfileSample {
                offset,
                elevation: grid.sample(coord),
                x: coord.x,
                y: coord.y,
            })
            .collect();
        let sample_runtime = now.elapsed();

        let stats = ProfileStats::from_samples(&samples);

        debug!(
            "profile; pk: {}, len: {}, valid: {}, sample_exec: {:?}",
            station.pk_label,
            samples.len(),
            stats.map_or(0, |s| s.valid_count),
            sample_runtime
        );

        Ok(Profile {
            station: station.clone(),
            samples,
            stats,
            width,
            resolution,
        })
    }

    /// Returns an iterator over samples that have an elevation, as
    /// `(offset, elevation)`.
    pub fn valid_samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples
            .iter()
            .filter_map(|s| s.elevation.map(|z| (s.offset, z)))
    }

    pub fn valid_count(&self) -> usize {
        self.stats.map_or(0, |s| s.valid_count)
    }

    /// Returns the valid sample nearest to `offset`. Ties go to the
    /// lower offset.
    pub fn snap(&self, offset: f64) -> Option<ReferencePoint> {
        let mut nearest: Option<(f64, ReferencePoint)> = None;
        for (o, z) in self.valid_samples() {
            let diff = (o - offset).abs();
            if nearest.map_or(true, |(best, _)| diff < best) {
                nearest = Some((diff, ReferencePoint::new(o, z)));
            }
        }
        nearest.map(|(_, point)| point)
    }

    /// Returns the highest valid sample. Ties go to the sample nearest
    /// the station.
    pub fn crest(&self) -> Option<ReferencePoint> {
        let mut crest: Option<ReferencePoint> = None;
        for (o, z) in self.valid_samples() {
            let better = match crest {
                None => true,
                Some(best) => z > best.elevation || (z == best.elevation && o.abs() < best.offset.abs()),
            };
            if better {
                crest = Some(ReferencePoint::new(o, z));
            }
        }
        crest
    }
}

/// Builds one profile per station of `alignment`, in station order.
///
/// Stations are sampled in parallel. A station that fails does not
/// affect the others.
pub fn build_all(
    alignment: &Alignment,
    grid: &AscGrid,
    width: f64,
    resolution: f64,
) -> Vec<Result<Profile, WallprofError>> {
    build_all_with(alignment, grid, width, resolution, |_| {})
}

/// Like [`build_all`], calling `on_station` as each station finishes.
///
/// `on_station` is called from worker threads in no particular order.
pub fn build_all_with<F>(
    alignment: &Alignment,
    grid: &AscGrid,
    width: f64,
    resolution: f64,
    on_station: F,
) -> Vec<Result<Profile, WallprofError>>
where
    F: Fn(&Station) + Sync + Send,
{
    let now = std::time::Instant::now();
    let profiles: Vec<Result<Profile, WallprofError>> = alignment
        .stations()
        .par_iter()
        .map(|station| {
            let profile = Profile::new(station, grid, width, resolution);
            on_station(station);
            profile
        })
        .collect();
    debug!(
        "build_all; alignment: {:?}, profiles: {}, exec: {:?}",
        alignment.name(),
        profiles.len(),
        now.elapsed()
    );
    profiles
}
