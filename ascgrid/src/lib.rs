//! ESRI ASCII grid (`.asc`) elevation rasters.
//!
//! A grid is a six line key/value header followed by `nrows` rows of
//! `ncols` whitespace separated samples. The first row of samples is
//! the northernmost one.
//!
//! ```text
//! ncols         4
//! nrows         3
//! xllcorner     336500.0
//! yllcorner     6334000.0
//! cellsize      0.5
//! NODATA_value  -9999
//! 2501.2 2501.4 2501.9 -9999
//! ...
//! ```
//!
//! # References
//!
//! 1. [Esri ASCII raster format](https://desktop.arcgis.com/en/arcmap/latest/manage-data/raster-and-images/esri-ascii-raster-format.htm)

mod error;
mod header;

pub use crate::{error::AscGridError, header::Header};
use geo::geometry::{Coord, Rect};
use log::debug;
use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind},
    path::Path,
};

/// Base floating point type used for all coordinates and elevations.
pub type C = f64;

/// Nodata sentinel assumed when a grid's header omits `NODATA_value`.
pub const DEFAULT_NODATA: C = -9999.0;

/// Upper bound on samples reserved ahead of reading the rows.
const MAX_PREALLOC: usize = 1 << 22;

#[derive(Debug, Clone)]
pub struct AscGrid {
    header: Header,

    /// Lowest valid elevation sample in this grid.
    min_elevation: Option<C>,

    /// Highest valid elevation sample in this grid.
    max_elevation: Option<C>,

    /// Row-major elevation samples, northernmost row first.
    samples: Box<[C]>,
}

impl AscGrid {
    /// Returns a grid read into memory from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AscGridError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AscGridError::NotFound(path.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };
        debug!("loading {path:?}");
        Self::from_reader(BufReader::new(file))
    }

    /// Returns a grid parsed from `rdr`.
    pub fn from_reader<R: BufRead>(rdr: R) -> Result<Self, AscGridError> {
        let mut lines = rdr
            .lines()
            .enumerate()
            .map(|(idx, line)| line.map(|text| (idx + 1, text)));

        let (header, pending) = Header::read(&mut lines)?;
        let expected = sample_count(&header)?;
        let mut samples = Vec::with_capacity(expected.min(MAX_PREALLOC));

        if let Some((line, text)) = pending {
            push_row(&mut samples, header.ncols, line, &text)?;
        }
        while let Some((line, text)) = header::next_line(&mut lines)? {
            push_row(&mut samples, header.ncols, line, &text)?;
        }

        Self::from_parts(header, samples)
    }

    /// Returns a grid built from an already parsed header and
    /// row-major samples.
    pub fn from_parts(header: Header, samples: Vec<C>) -> Result<Self, AscGridError> {
        let expected = sample_count(&header)?;
        if samples.len() != expected {
            return Err(AscGridError::Dimensions {
                rows: header.nrows,
                cols: header.ncols,
                expected,
                found: samples.len(),
            });
        }

        let mut grid = Self {
            header,
            min_elevation: None,
            max_elevation: None,
            samples: samples.into_boxed_slice(),
        };

        let (min, max) = grid
            .samples
            .iter()
            .copied()
            .filter(|&z| !grid.is_nodata(z))
            .fold((None, None), |(min, max): (Option<C>, Option<C>), z| {
                (
                    Some(min.map_or(z, |m| m.min(z))),
                    Some(max.map_or(z, |m| m.max(z))),
                )
            });
        grid.min_elevation = min;
        grid.max_elevation = max;

        debug!(
            "grid; dims: {}x{}, cellsize: {}, elevation: {:?}..{:?}",
            header.nrows, header.ncols, header.cellsize, min, max
        );
        Ok(grid)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns (rows, columns).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.header.nrows, self.header.ncols)
    }

    /// Returns the number of samples in this grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn cellsize(&self) -> C {
        self.header.cellsize
    }

    pub fn nodata(&self) -> C {
        self.header.nodata
    }

    /// Returns true if `z` does not represent a valid elevation.
    pub fn is_nodata(&self, z: C) -> bool {
        z.is_nan() || z == self.header.nodata
    }

    /// Returns the lowest valid elevation sample in this grid.
    pub fn min_elevation(&self) -> Option<C> {
        self.min_elevation
    }

    /// Returns the highest valid elevation sample in this grid.
    pub fn max_elevation(&self) -> Option<C> {
        self.max_elevation
    }

    /// Returns the raw sample at `(col, row)`, nodata sentinel
    /// included.
    ///
    /// # Panics
    ///
    /// Panics if `(col, row)` lies outside the grid.
    pub fn get_unchecked(&self, (col, row): (usize, usize)) -> C {
        self.samples[row * self.header.ncols + col]
    }

    /// Returns the elevation at `(col, row)`, or `None` for nodata or
    /// out of bounds indices.
    pub fn get(&self, (col, row): (usize, usize)) -> Option<C> {
        if col < self.header.ncols && row < self.header.nrows {
            let z = self.get_unchecked((col, row));
            (!self.is_nodata(z)).then_some(z)
        } else {
            None
        }
    }

    /// Returns the world coordinate of the sample at `(col, row)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn node_coord(&self, (col, row): (usize, usize)) -> Coord<C> {
        Coord {
            x: self.header.xllcorner + col as C * self.header.cellsize,
            y: self.header.y_top() - row as C * self.header.cellsize,
        }
    }

    /// Returns the bilinearly interpolated elevation at `coord`.
    ///
    /// Returns `None` when `coord` is within one cell of the grid's
    /// edge, or when any of the four enclosing samples is nodata.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn sample(&self, Coord { x, y }: Coord<C>) -> Option<C> {
        let Header {
            ncols,
            nrows,
            xllcorner,
            cellsize,
            ..
        } = self.header;
        let col = (x - xllcorner) / cellsize;
        let row = (self.header.y_top() - y) / cellsize;

        // Also rejects NaN.
        let inside = col >= 0.0
            && row >= 0.0
            && col < ncols.saturating_sub(1) as C
            && row < nrows.saturating_sub(1) as C;
        if !inside {
            return None;
        }

        #[allow(clippy::cast_sign_loss)]
        let (c0, r0) = (col.floor() as usize, row.floor() as usize);
        let dx = col - c0 as C;
        let dy = row - r0 as C;

        let z11 = self.get((c0, r0))?;
        let z12 = self.get((c0 + 1, r0))?;
        let z21 = self.get((c0, r0 + 1))?;
        let z22 = self.get((c0 + 1, r0 + 1))?;

        // Written as lerps so that equal neighbours reproduce their
        // value exactly.
        let north = z11 + dx * (z12 - z11);
        let south = z21 + dx * (z22 - z21);
        Some(north + dy * (south - north))
    }

    /// Returns the rectangle covered by this grid.
    #[allow(clippy::cast_precision_loss)]
    pub fn extent(&self) -> Rect<C> {
        let Header {
            ncols,
            xllcorner,
            yllcorner,
            cellsize,
            ..
        } = self.header;
        Rect::new(
            Coord {
                x: xllcorner,
                y: yllcorner,
            },
            Coord {
                x: xllcorner + ncols as C * cellsize,
                y: self.header.y_top(),
            },
        )
    }

    /// Returns true if `coord` lies within (or on the edge of) this
    /// grid's extent.
    pub fn contains(&self, coord: Coord<C>) -> bool {
        let extent = self.extent();
        let (min, max) = (extent.min(), extent.max());
        min.x <= coord.x && coord.x <= max.x && min.y <= coord.y && coord.y <= max.y
    }
}

fn sample_count(header: &Header) -> Result<usize, AscGridError> {
    header
        .nrows
        .checked_mul(header.ncols)
        .ok_or(AscGridError::TooLarge {
            rows: header.nrows,
            cols: header.ncols,
        })
}

/// Parses one row of `ncols` samples onto the end of `samples`.
fn push_row(
    samples: &mut Vec<C>,
    ncols: usize,
    line: usize,
    text: &str,
) -> Result<(), AscGridError> {
    let start = samples.len();
    for token in text.split_whitespace() {
        let z = token
            .parse::<C>()
            .map_err(|_| AscGridError::InvalidSample {
                line,
                value: token.to_string(),
            })?;
        samples.push(z);
    }
    let found = samples.len() - start;
    if found != ncols {
        return Err(AscGridError::RowLength {
            line,
            expected: ncols,
            found,
        });
    }
    Ok(())
}
