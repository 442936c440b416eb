use geo::geometry::{Coord, Rect};
use log::warn;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        let (Coord { x: xmin, y: ymin }, Coord { x: xmax, y: ymax }) = (rect.min(), rect.max());
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }
}

/// How far the required area extends past the raster on each edge.
/// Zero where the raster reaches far enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Deficits {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coverage {
    pub ok: bool,

    /// Alignment bounds grown by the buffer.
    pub required: Bounds,

    /// Raster extent.
    pub available: Bounds,

    pub missing: Deficits,
}

/// Checks that `extent` contains `bounds` grown by `buffer` on every
/// side.
pub fn coverage_check(extent: Rect<f64>, bounds: Rect<f64>, buffer: f64) -> Coverage {
    let available = Bounds::from(extent);
    let inner = Bounds::from(bounds);
    let required = Bounds {
        xmin: inner.xmin - buffer,
        ymin: inner.ymin - buffer,
        xmax: inner.xmax + buffer,
        ymax: inner.ymax + buffer,
    };

    let missing = Deficits {
        west: (available.xmin - required.xmin).max(0.0),
        east: (required.xmax - available.xmax).max(0.0),
        south: (available.ymin - required.ymin).max(0.0),
        north: (required.ymax - available.ymax).max(0.0),
    };
    let ok = missing == Deficits::default();
    if !ok {
        warn!("raster does not cover the alignment; missing: {missing:?}");
    }

    Coverage {
        ok,
        required,
        available,
        missing,
    }
}
