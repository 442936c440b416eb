//! Chainage (PK) labels.
//!
//! A PK is a distance along an alignment, written as kilometers and
//! meters joined by `+`: 1434 m is `1+434`.

use crate::WallprofError;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Pk(pub f64);

impl Pk {
    pub fn meters(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Pk {
    /// Meters are rounded to the nearest whole meter before being
    /// split, so 999.6 is `1+000` and never `0+1000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round();
        let sign = if rounded < 0.0 { "-" } else { "" };
        let abs = rounded.abs();
        let km = (abs / 1000.0).floor();
        let m = abs - km * 1000.0;
        write!(f, "{sign}{km}+{m:03}")
    }
}

impl FromStr for Pk {
    type Err = WallprofError;

    /// Accepts `K+MMM` with an optional fractional part on the meters,
    /// e.g. `12+345.67`. Meters are always three digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || WallprofError::Pk(s.to_string());
        let digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());

        let (km, m) = s.trim().split_once('+').ok_or_else(err)?;
        let (whole, frac) = match m.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (m, None),
        };
        if !digits(km) || whole.len() != 3 || !digits(whole) || frac.is_some_and(|f| !digits(f)) {
            return Err(err());
        }

        let km: f64 = km.parse().map_err(|_| err())?;
        let m: f64 = m.parse().map_err(|_| err())?;
        Ok(Pk(km * 1000.0 + m))
    }
}

impl Serialize for Pk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
