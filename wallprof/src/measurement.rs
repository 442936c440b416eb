use crate::config::AlertThresholds;
use serde::Serialize;

/// A position on a profile: an offset from the station and the
/// elevation there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub offset: f64,
    pub elevation: f64,
}

impl ReferencePoint {
    pub fn new(offset: f64, elevation: f64) -> Self {
        Self { offset, elevation }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Boundaries found by terrain intersection search.
    Auto,
    /// Boundaries picked by hand.
    Manual,
}

/// Structure width at one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WidthMeasurement {
    pub left_offset: f64,
    pub right_offset: f64,
    pub elevation: f64,
    pub distance: f64,
    pub method: DetectionMethod,
}

impl WidthMeasurement {
    /// Width between two automatically detected boundaries, measured
    /// at `elevation`.
    pub fn from_boundaries(left: f64, right: f64, elevation: f64) -> Self {
        Self {
            left_offset: left,
            right_offset: right,
            elevation,
            distance: (right - left).abs(),
            method: DetectionMethod::Auto,
        }
    }

    /// Width between two hand-picked points, in either order. The
    /// measurement elevation is their mean.
    pub fn manual(a: ReferencePoint, b: ReferencePoint) -> Self {
        let (left, right) = if a.offset <= b.offset { (a, b) } else { (b, a) };
        Self {
            left_offset: left.offset,
            right_offset: right.offset,
            elevation: (left.elevation + right.elevation) / 2.0,
            distance: right.offset - left.offset,
            method: DetectionMethod::Manual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "alert", rename_all = "snake_case")]
pub enum Alert {
    LowRevancha { value: f64, minimum: f64 },
    NarrowWidth { value: f64, minimum: f64 },
}

/// Everything measured at one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationMeasurement {
    pub pk: f64,
    pub crown: Option<ReferencePoint>,
    pub width: Option<WidthMeasurement>,

    /// LAMA point as surveyed.
    pub lama_original: Option<ReferencePoint>,

    /// LAMA point as corrected by hand, preferred when present.
    pub lama_modified: Option<ReferencePoint>,
}

impl StationMeasurement {
    pub fn new(pk: f64) -> Self {
        Self {
            pk,
            crown: None,
            width: None,
            lama_original: None,
            lama_modified: None,
        }
    }

    /// The LAMA point revancha is measured against.
    pub fn lama(&self) -> Option<ReferencePoint> {
        self.lama_modified.or(self.lama_original)
    }

    /// Crown elevation above the LAMA elevation.
    pub fn revancha(&self) -> Option<f64> {
        Some(self.crown?.elevation - self.lama()?.elevation)
    }

    /// Returns every threshold this measurement falls below. Missing
    /// values raise nothing.
    pub fn alerts(&self, thresholds: &AlertThresholds) -> Vec<Alert> {
        let mut alerts = Vec::new();
        if let Some(value) = self.revancha() {
            if value < thresholds.min_revancha {
                alerts.push(Alert::LowRevancha {
                    value,
                    minimum: thresholds.min_revancha,
                });
            }
        }
        if let Some(width) = self.width {
            if width.distance < thresholds.min_width {
                alerts.push(Alert::NarrowWidth {
                    value: width.distance,
                    minimum: thresholds.min_width,
                });
            }
        }
        alerts
    }
}
