use crate::{AscGridError, C, DEFAULT_NODATA};
use std::io;

/// The six leading key/value lines of an ASCII grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    /// Number of columns (samples per row).
    pub ncols: usize,

    /// Number of rows.
    pub nrows: usize,

    /// World x of the grid's western edge.
    pub xllcorner: C,

    /// World y of the grid's southern edge.
    pub yllcorner: C,

    /// Distance between adjacent samples, in world units.
    pub cellsize: C,

    /// Sentinel marking samples without a valid elevation.
    pub nodata: C,
}

/// A numbered source line.
pub(crate) type Line = (usize, String);

impl Header {
    /// Reads the header from `lines`.
    ///
    /// `NODATA_value` is optional. When the sixth line is not a
    /// nodata key it is handed back to the caller as the first row of
    /// samples.
    pub(crate) fn read<I>(lines: &mut I) -> Result<(Self, Option<Line>), AscGridError>
    where
        I: Iterator<Item = io::Result<Line>>,
    {
        let ncols = parse_count(next_field(lines, &["ncols"])?)?;
        let nrows = parse_count(next_field(lines, &["nrows"])?)?;
        let (x_key, x) = parse_coord(next_field(lines, &["xllcorner", "xllcenter"])?)?;
        let (y_key, y) = parse_coord(next_field(lines, &["yllcorner", "yllcenter"])?)?;
        let (line, _, value) = next_field(lines, &["cellsize"])?;
        let cellsize = parse_float(line, "cellsize", &value)?;
        if !(cellsize.is_finite() && cellsize > 0.0) {
            return Err(AscGridError::InvalidValue {
                line,
                field: "cellsize",
                value: value.to_string(),
            });
        }

        // Centered origins reference the middle of the SW sample.
        let half_cell = cellsize / 2.0;
        let xllcorner = if x_key == "xllcenter" { x - half_cell } else { x };
        let yllcorner = if y_key == "yllcenter" { y - half_cell } else { y };

        let (nodata, pending) = match next_line(lines)? {
            Some((line, text)) => {
                let mut parts = text.split_whitespace();
                let key = parts.next().unwrap_or_default();
                if key.to_ascii_lowercase().starts_with("nodata") {
                    let value = parts.next().unwrap_or_default();
                    (parse_float(line, "NODATA_value", value)?, None)
                } else {
                    (DEFAULT_NODATA, Some((line, text)))
                }
            }
            None => (DEFAULT_NODATA, None),
        };

        let header = Self {
            ncols,
            nrows,
            xllcorner,
            yllcorner,
            cellsize,
            nodata,
        };
        Ok((header, pending))
    }

    /// Returns the world y of the grid's northern edge.
    #[allow(clippy::cast_precision_loss)]
    pub fn y_top(&self) -> C {
        self.yllcorner + self.nrows as C * self.cellsize
    }
}

/// Returns the next non-blank line.
pub(crate) fn next_line<I>(lines: &mut I) -> Result<Option<Line>, AscGridError>
where
    I: Iterator<Item = io::Result<Line>>,
{
    for line in lines {
        let (n, text) = line?;
        if !text.trim().is_empty() {
            return Ok(Some((n, text)));
        }
    }
    Ok(None)
}

type Field = (usize, &'static str, String);

fn next_field<I>(lines: &mut I, keys: &[&'static str]) -> Result<Field, AscGridError>
where
    I: Iterator<Item = io::Result<Line>>,
{
    let (line, text) = next_line(lines)?.ok_or(AscGridError::MissingField(keys[0]))?;
    let mut parts = text.split_whitespace();
    let found = parts.next().unwrap_or_default();
    let key = keys
        .iter()
        .copied()
        .find(|key| key.eq_ignore_ascii_case(found))
        .ok_or_else(|| AscGridError::UnexpectedField {
            line,
            expected: keys[0],
            found: found.to_string(),
        })?;
    let value = parts.next().ok_or(AscGridError::InvalidValue {
        line,
        field: key,
        value: String::new(),
    })?;
    Ok((line, key, value.to_string()))
}

fn parse_count((line, field, value): Field) -> Result<usize, AscGridError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AscGridError::InvalidValue { line, field, value }),
    }
}

fn parse_coord((line, field, value): Field) -> Result<(&'static str, C), AscGridError> {
    parse_float(line, field, &value).map(|v| (field, v))
}

fn parse_float(line: usize, field: &'static str, value: &str) -> Result<C, AscGridError> {
    value
        .parse::<C>()
        .map_err(|_| AscGridError::InvalidValue {
            line,
            field,
            value: value.to_string(),
        })
}
