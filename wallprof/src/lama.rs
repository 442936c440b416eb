//! LAMA points: surveyed toe positions, one per profile.

use crate::{
    alignment::Alignment, measurement::ReferencePoint, station::Station, WallprofError,
};
use ascgrid::AscGrid;
use geo::geometry::Coord;
use log::warn;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LamaPoint {
    /// 1-based number of the profile this point belongs to.
    pub profile_number: usize,
    pub x: f64,
    pub y: f64,
}

/// A LAMA point seen from a station's cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedLama {
    pub profile_number: usize,

    /// Signed offset along the station's perpendicular.
    pub offset: f64,

    /// Planar distance from the station.
    pub distance: f64,

    /// Terrain elevation at the point, `None` off the raster.
    pub elevation: Option<f64>,
}

impl ProjectedLama {
    /// The point as a profile reference, when it has an elevation.
    pub fn reference(&self) -> Option<ReferencePoint> {
        self.elevation.map(|z| ReferencePoint::new(self.offset, z))
    }
}

impl LamaPoint {
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    pub fn project(&self, station: &Station, grid: &AscGrid) -> ProjectedLama {
        let coord = self.coord();
        let delta = coord - station.coord();
        let elevation = if grid.contains(coord) {
            grid.sample(coord)
        } else {
            None
        };
        ProjectedLama {
            profile_number: self.profile_number,
            offset: station.offset_of(coord),
            distance: delta.x.hypot(delta.y),
            elevation,
        }
    }
}

/// Returns the first of `points` numbered for `station`'s profile.
pub fn lama_for_station<'a>(
    alignment: &Alignment,
    station: &Station,
    points: &'a [LamaPoint],
) -> Option<&'a LamaPoint> {
    let number = alignment.profile_number(station);
    points.iter().find(|p| p.profile_number == number)
}

/// Reads `profile,x,y` records.
///
/// Blank lines, `#` comments and a header row are skipped. Rows that do
/// not parse are logged and skipped.
pub fn read_lama_points<R: BufRead>(rdr: R) -> Result<Vec<LamaPoint>, WallprofError> {
    let mut points = Vec::new();
    for (idx, line) in rdr.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let parsed = match fields.as_slice() {
            [number, x, y, ..] => number
                .parse::<usize>()
                .ok()
                .zip(x.parse::<f64>().ok())
                .zip(y.parse::<f64>().ok())
                .map(|((profile_number, x), y)| LamaPoint { profile_number, x, y }),
            _ => None,
        };
        match parsed {
            Some(point) => points.push(point),
            None if idx == 0 => {}
            None => warn!("lama line {}: skipping '{line}'", idx + 1),
        }
    }
    Ok(points)
}
