use crate::{
    math::{normalize_deg, steps, unit_vector},
    pk::Pk,
    WallprofError,
};
use geo::geometry::Coord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentKind {
    Straight,
    Curved,
}

/// A surveyed point on an alignment, where a cross-section is cut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Chainage label, e.g. `1+434`.
    pub pk_label: String,

    /// Chainage in linear units from the alignment origin.
    pub pk: f64,

    pub x: f64,
    pub y: f64,

    /// Heading as surveyed, in degrees.
    pub bearing: f64,

    /// Heading smoothed against the neighbouring stations, in degrees.
    pub bearing_tangent: f64,

    pub kind: AlignmentKind,

    /// Position of this station within its alignment.
    pub index: usize,
}

impl Station {
    pub(crate) fn new(
        index: usize,
        pk: f64,
        coord: Coord<f64>,
        bearing: f64,
        bearing_tangent: f64,
        kind: AlignmentKind,
    ) -> Self {
        Self {
            pk_label: Pk(pk).to_string(),
            pk,
            x: coord.x,
            y: coord.y,
            bearing,
            bearing_tangent,
            kind,
            index,
        }
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    /// Heading the cross-section is cut against: the smoothed tangent
    /// on curved alignments, the surveyed bearing otherwise.
    pub fn heading(&self) -> f64 {
        match self.kind {
            AlignmentKind::Curved => self.bearing_tangent,
            AlignmentKind::Straight => self.bearing,
        }
    }

    /// Direction of increasing offset, 90° counter-clockwise from
    /// [`heading`](Self::heading).
    pub fn perpendicular(&self) -> f64 {
        normalize_deg(self.heading() + 90.0)
    }

    /// Returns the world position `offset` units along the
    /// perpendicular.
    pub fn point_at(&self, offset: f64) -> Coord<f64> {
        let (cos, sin) = unit_vector(self.perpendicular());
        Coord {
            x: self.x + offset * cos,
            y: self.y + offset * sin,
        }
    }

    /// Returns the signed offset of `coord` projected onto this
    /// station's perpendicular.
    pub fn offset_of(&self, coord: Coord<f64>) -> f64 {
        let (cos, sin) = unit_vector(self.perpendicular());
        (coord.x - self.x) * cos + (coord.y - self.y) * sin
    }

    /// Returns `(offset, position)` pairs across a section of `width`,
    /// centered on the station, `resolution` apart.
    ///
    /// There are `floor(width / resolution) + 1` points, the first at
    /// offset `-width / 2`.
    pub fn cross_section_points(
        &self,
        width: f64,
        resolution: f64,
    ) -> Result<Vec<(f64, Coord<f64>)>, WallprofError> {
        for (field, value) in [("width", width), ("resolution", resolution)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WallprofError::InvalidParameter { field, value });
            }
        }
        let count = point_count(width, resolution).ok_or(WallprofError::InvalidParameter {
            field: "resolution",
            value: resolution,
        })?;
        let (cos, sin) = unit_vector(self.perpendicular());
        Ok(steps(-width / 2.0, resolution, count)
            .map(|offset| {
                let coord = Coord {
                    x: self.x + offset * cos,
                    y: self.y + offset * sin,
                };
                (offset, coord)
            })
            .collect())
    }
}

/// Most points a single cross-section may hold.
pub const MAX_SECTION_POINTS: usize = 10_000_000;

/// `floor(width / resolution) + 1`, tolerant of quotients that land a
/// hair below a whole number. `None` past [`MAX_SECTION_POINTS`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn point_count(width: f64, resolution: f64) -> Option<usize> {
    let intervals = ((width / resolution) + 1e-9).floor();
    if intervals >= MAX_SECTION_POINTS as f64 {
        return None;
    }
    Some(intervals as usize + 1)
}
