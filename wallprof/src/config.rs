use crate::{station::MAX_SECTION_POINTS, WallprofError};
use serde::{Deserialize, Serialize};

/// Cross-section sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Total section width, centered on the station.
    pub width: f64,

    /// Distance between consecutive samples.
    pub resolution: f64,

    /// Margin added around the alignment bounds when checking raster
    /// coverage.
    pub buffer: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            width: 80.0,
            resolution: 0.1,
            buffer: 50.0,
        }
    }
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<(), WallprofError> {
        positive("width", self.width)?;
        positive("resolution", self.resolution)?;
        if self.width / self.resolution >= MAX_SECTION_POINTS as f64 {
            return Err(WallprofError::InvalidParameter {
                field: "resolution",
                value: self.resolution,
            });
        }
        if !(self.buffer.is_finite() && self.buffer >= 0.0) {
            return Err(WallprofError::InvalidParameter {
                field: "buffer",
                value: self.buffer,
            });
        }
        Ok(())
    }
}

/// Tuning for automatic boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    /// Valid samples required on each searched side of the origin.
    pub min_side_samples: usize,

    /// Largest elevation difference accepted when a side has no
    /// crossing and the closest sample is used instead.
    pub fallback_tolerance: f64,

    /// Height above the LAMA elevation used as the reference for
    /// projected width detection.
    pub projected_offset: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_side_samples: 10,
            fallback_tolerance: 1.0,
            projected_offset: 1.0,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), WallprofError> {
        if !(self.fallback_tolerance.is_finite() && self.fallback_tolerance >= 0.0) {
            return Err(WallprofError::InvalidParameter {
                field: "fallback_tolerance",
                value: self.fallback_tolerance,
            });
        }
        if !self.projected_offset.is_finite() {
            return Err(WallprofError::InvalidParameter {
                field: "projected_offset",
                value: self.projected_offset,
            });
        }
        Ok(())
    }
}

/// Limits below which a station measurement raises an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertThresholds {
    pub min_revancha: f64,
    pub min_width: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            min_revancha: 3.0,
            min_width: 15.0,
        }
    }
}

/// Every tunable, as read from a single JSON document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub profile: ProfileConfig,
    pub detection: DetectionConfig,
    pub alerts: AlertThresholds,
}

impl Config {
    pub fn validate(&self) -> Result<(), WallprofError> {
        self.profile.validate()?;
        self.detection.validate()
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), WallprofError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WallprofError::InvalidParameter { field, value })
    }
}
