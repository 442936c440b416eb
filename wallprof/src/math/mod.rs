//! Angle and sequence helpers.
//!
//! All bearings are in decimal degrees, measured counter-clockwise
//! from the +X axis (the `atan2` convention).

mod bearing;
mod dms;
mod steps;

pub use {
    bearing::{angular_distance, bearing_deg, circular_mean, normalize_deg, unit_vector},
    dms::parse_dms,
    steps::steps,
};
