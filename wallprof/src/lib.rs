//! Cross-section profiling for retaining wall alignments.
//!
//! An [`Alignment`] turns survey stations into cross-sections, a
//! [`Profile`] samples an [`ascgrid::AscGrid`] across each one, and
//! the [`boundary`] searches find where a reference elevation meets
//! the terrain.
//!
//! ```no_run
//! use ascgrid::AscGrid;
//! use geo::geometry::Coord;
//! use wallprof::{Alignment, DetectionConfig, ReferencePoint};
//!
//! let grid = AscGrid::load("dem.asc")?;
//! let alignment = Alignment::straight()
//!     .start(Coord { x: 0.0, y: 0.0 })
//!     .end(Coord { x: 0.0, y: 100.0 })
//!     .interval(20.0)
//!     .build()?;
//! let station = alignment.nearest_station(40.0);
//! let profile = wallprof::Profile::new(station, &grid, 80.0, 0.1)?;
//! if let Some(crown) = profile.crest() {
//!     let width = profile
//!         .directional_boundaries(crown, &DetectionConfig::default())
//!         .width();
//!     println!("{width:?}");
//! }
//! # Ok::<(), wallprof::WallprofError>(())
//! ```

pub mod alignment;
pub mod boundary;
mod config;
mod coverage;
mod error;
pub mod lama;
pub mod math;
mod measurement;
mod pk;
pub mod profile;
mod station;
mod summary;

pub use crate::{
    alignment::{Alignment, AlignmentDef, SurveyPoint},
    boundary::Boundaries,
    config::{AlertThresholds, Config, DetectionConfig, ProfileConfig},
    coverage::{coverage_check, Bounds, Coverage, Deficits},
    error::WallprofError,
    lama::{LamaPoint, ProjectedLama},
    measurement::{Alert, DetectionMethod, ReferencePoint, StationMeasurement, WidthMeasurement},
    pk::Pk,
    profile::{build_all, build_all_with, Profile, ProfileSample, ProfileStats},
    station::{AlignmentKind, Station, MAX_SECTION_POINTS},
    summary::{ElevationSummary, Variability, WallSummary},
};

#[cfg(test)]
mod tests {
    use crate::{
        build_all, coverage_check, Alignment, DetectionConfig, DetectionMethod, ProfileConfig,
        ReferencePoint,
    };
    use ascgrid::AscGrid;
    use geo::geometry::Coord;
    use std::path::PathBuf;

    /// z = 50 + 0.1 * y, covering x in [-60, 62] and y in [-60, 164].
    fn slope() -> AscGrid {
        let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "..", "data", "ascgrid", "slope.asc"]
            .iter()
            .collect();
        AscGrid::load(path).unwrap()
    }

    #[test]
    fn test_end_to_end() {
        let grid = slope();
        let alignment = Alignment::straight()
            .start(Coord { x: 0.0, y: 0.0 })
            .end(Coord { x: 0.0, y: 100.0 })
            .interval(20.0)
            .build()
            .unwrap();
        let config = ProfileConfig {
            width: 40.0,
            resolution: 1.0,
            ..Default::default()
        };
        config.validate().unwrap();

        let coverage = coverage_check(grid.extent(), alignment.bounds(), config.buffer);
        assert!(coverage.ok);

        let profiles = build_all(&alignment, &grid, config.width, config.resolution);
        assert_eq!(profiles.len(), alignment.stations().len());

        let profile = profiles
            .iter()
            .filter_map(|p| p.as_ref().ok())
            .find(|p| p.station.pk == 40.0)
            .unwrap();
        let center = profile.samples.iter().find(|s| s.offset == 0.0).unwrap();
        assert_eq!(center.elevation, Some(54.0));

        let boundaries = profile
            .directional_boundaries(ReferencePoint::new(0.0, 54.0), &DetectionConfig::default());
        assert_eq!(boundaries.left, Some(-20.0));
        assert_eq!(boundaries.right, Some(20.0));
        let width = boundaries.width().unwrap();
        assert_eq!(width.distance, 40.0);
        assert_eq!(width.method, DetectionMethod::Auto);
    }
}
