use crate::{
    math::{bearing_deg, circular_mean, parse_dms},
    station::{AlignmentKind, Station},
    WallprofError,
};
use geo::geometry::{Coord, Rect};
use log::{debug, warn};
use serde::Deserialize;

/// Most stations a straight alignment may be divided into.
pub const MAX_STATIONS: usize = 1_000_000;

/// An ordered run of stations along one wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    name: String,
    stations: Vec<Station>,
    interval: f64,
    total_length: f64,
    kind: AlignmentKind,
}

impl Alignment {
    /// Returns a builder for a straight alignment between two points.
    pub fn straight() -> StraightBuilder {
        StraightBuilder {
            name: String::new(),
            start: None,
            end: None,
            interval: None,
        }
    }

    /// Returns a builder for an alignment from explicit survey points.
    pub fn curved() -> CurvedBuilder {
        CurvedBuilder {
            name: String::new(),
            points: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Nominal distance between stations. For curved alignments this
    /// is the mean spacing.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn kind(&self) -> AlignmentKind {
        self.kind
    }

    /// Returns the station whose PK is closest to `pk`. Ties go to the
    /// earlier station.
    pub fn nearest_station(&self, pk: f64) -> &Station {
        let mut nearest = &self.stations[0];
        let mut best = (nearest.pk - pk).abs();
        for station in &self.stations[1..] {
            let diff = (station.pk - pk).abs();
            if diff < best {
                best = diff;
                nearest = station;
            }
        }
        nearest
    }

    /// Returns the 1-based profile number a station falls on, counting
    /// one profile per `interval` from PK 0.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn profile_number(&self, station: &Station) -> usize {
        (station.pk / self.interval).floor().max(0.0) as usize + 1
    }

    /// Returns the station cut by profile `number`, if any.
    pub fn station_for_profile(&self, number: usize) -> Option<&Station> {
        self.stations
            .iter()
            .find(|station| self.profile_number(station) == number)
    }

    /// Bounding rectangle of all station positions.
    pub fn bounds(&self) -> Rect<f64> {
        let first = self.stations[0].coord();
        let (min, max) = self
            .stations
            .iter()
            .map(Station::coord)
            .fold((first, first), |(min, max), c| {
                (
                    Coord {
                        x: min.x.min(c.x),
                        y: min.y.min(c.y),
                    },
                    Coord {
                        x: max.x.max(c.x),
                        y: max.y.max(c.y),
                    },
                )
            });
        Rect::new(min, max)
    }
}

pub struct StraightBuilder {
    name: String,
    start: Option<Coord<f64>>,
    end: Option<Coord<f64>>,
    interval: Option<f64>,
}

impl StraightBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn start(mut self, coord: Coord<f64>) -> Self {
        self.start = Some(coord);
        self
    }

    #[must_use]
    pub fn end(mut self, coord: Coord<f64>) -> Self {
        self.end = Some(coord);
        self
    }

    /// Distance between consecutive stations.
    #[must_use]
    pub fn interval(mut self, interval: f64) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Places a station every `interval` along the chord from `start`
    /// to `end`, plus one at the exact end point. Every station shares
    /// the chord's bearing.
    pub fn build(self) -> Result<Alignment, WallprofError> {
        let start = self.start.ok_or(WallprofError::Builder("start"))?;
        let end = self.end.ok_or(WallprofError::Builder("end"))?;
        let interval = self.interval.ok_or(WallprofError::Builder("interval"))?;

        if !(interval.is_finite() && interval > 0.0) {
            return Err(WallprofError::InvalidParameter {
                field: "interval",
                value: interval,
            });
        }
        for coord in [start, end] {
            if !(coord.x.is_finite() && coord.y.is_finite()) {
                return Err(WallprofError::StationPosition(format!("{coord:?}")));
            }
        }

        let delta = end - start;
        let length = delta.x.hypot(delta.y);
        if length == 0.0 {
            return Err(WallprofError::TooFewStations(1));
        }
        if length / interval >= MAX_STATIONS as f64 {
            return Err(WallprofError::InvalidParameter {
                field: "interval",
                value: interval,
            });
        }
        let bearing = bearing_deg(start, end);

        let position = |pk: f64| Coord {
            x: start.x + delta.x * pk / length,
            y: start.y + delta.y * pk / length,
        };

        let mut stations = Vec::new();
        let mut pk = 0.0;
        while pk < length - 1e-9 {
            let index = stations.len();
            stations.push(Station::new(
                index,
                pk,
                position(pk),
                bearing,
                bearing,
                AlignmentKind::Straight,
            ));
            pk = (index + 1) as f64 * interval;
        }
        stations.push(Station::new(
            stations.len(),
            length,
            end,
            bearing,
            bearing,
            AlignmentKind::Straight,
        ));

        debug!(
            "straight alignment; name: {:?}, stations: {}, length: {length}, bearing: {bearing}",
            self.name,
            stations.len(),
        );

        Ok(Alignment {
            name: self.name,
            stations,
            interval,
            total_length: length,
            kind: AlignmentKind::Straight,
        })
    }
}

/// One surveyed station of a curved alignment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurveyPoint {
    pub pk: f64,
    pub x: f64,
    pub y: f64,

    /// Surveyed heading as `D° M' S.sss"`. Missing headings read as 0°.
    #[serde(default)]
    pub heading: Option<String>,
}

pub struct CurvedBuilder {
    name: String,
    points: Vec<SurveyPoint>,
}

impl CurvedBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn point(mut self, point: SurveyPoint) -> Self {
        self.points.push(point);
        self
    }

    #[must_use]
    pub fn points<I: IntoIterator<Item = SurveyPoint>>(mut self, points: I) -> Self {
        self.points.extend(points);
        self
    }

    /// Sorts the points by PK and derives each station's tangent
    /// bearing with [`smooth_tangents`].
    pub fn build(self) -> Result<Alignment, WallprofError> {
        let mut points = self.points;
        if points.len() < 2 {
            return Err(WallprofError::TooFewStations(points.len()));
        }
        for point in &points {
            if !(point.pk.is_finite() && point.x.is_finite() && point.y.is_finite()) {
                return Err(WallprofError::StationPosition(format!(
                    "pk {}, x {}, y {}",
                    point.pk, point.x, point.y
                )));
            }
        }
        points.sort_by(|a, b| a.pk.total_cmp(&b.pk));
        for pair in points.windows(2) {
            if pair[1].pk <= pair[0].pk {
                return Err(WallprofError::NonIncreasingPk {
                    prev: pair[0].pk,
                    next: pair[1].pk,
                });
            }
        }

        let coords: Vec<Coord<f64>> = points.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
        let tangents = smooth_tangents(&coords);

        let stations = points
            .iter()
            .zip(coords.iter().zip(tangents))
            .enumerate()
            .map(|(index, (point, (coord, tangent)))| {
                let bearing = match point.heading.as_deref() {
                    Some(heading) => parse_dms(heading)?,
                    None => 0.0,
                };
                Ok(Station::new(
                    index,
                    point.pk,
                    *coord,
                    bearing,
                    tangent,
                    AlignmentKind::Curved,
                ))
            })
            .collect::<Result<Vec<_>, WallprofError>>()?;

        let first_pk = points[0].pk;
        let last_pk = points[points.len() - 1].pk;
        let total_length = last_pk - first_pk;
        let interval = total_length / (points.len() - 1) as f64;

        debug!(
            "curved alignment; name: {:?}, stations: {}, length: {total_length}",
            self.name,
            stations.len(),
        );

        Ok(Alignment {
            name: self.name,
            stations,
            interval,
            total_length,
            kind: AlignmentKind::Curved,
        })
    }
}

/// Returns a tangent bearing for each of `coords`.
///
/// The first point takes the bearing to its successor and the last
/// the bearing from its predecessor. Interior points take the circular
/// mean of the incoming and outgoing bearings, or the incoming bearing
/// where the path doubles back on itself and the mean is undefined.
pub fn smooth_tangents(coords: &[Coord<f64>]) -> Vec<f64> {
    let legs: Vec<f64> = coords
        .windows(2)
        .map(|pair| bearing_deg(pair[0], pair[1]))
        .collect();
    let (Some(&first), Some(&last)) = (legs.first(), legs.last()) else {
        return vec![0.0; coords.len()];
    };

    let mut tangents = Vec::with_capacity(coords.len());
    tangents.push(first);
    for (i, pair) in legs.windows(2).enumerate() {
        let (incoming, outgoing) = (pair[0], pair[1]);
        let tangent = circular_mean([incoming, outgoing]).unwrap_or_else(|| {
            warn!("station {}: path reverses, using incoming bearing", i + 1);
            incoming
        });
        tangents.push(tangent);
    }
    tangents.push(last);
    tangents
}

/// An alignment as written in a JSON definition file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentDef {
    Straight {
        #[serde(default)]
        name: String,
        start: [f64; 2],
        end: [f64; 2],
        interval: f64,
    },
    Curved {
        #[serde(default)]
        name: String,
        points: Vec<SurveyPoint>,
    },
}

impl AlignmentDef {
    pub fn build(self) -> Result<Alignment, WallprofError> {
        match self {
            AlignmentDef::Straight {
                name,
                start: [x0, y0],
                end: [x1, y1],
                interval,
            } => Alignment::straight()
                .name(name)
                .start(Coord { x: x0, y: y0 })
                .end(Coord { x: x1, y: y1 })
                .interval(interval)
                .build(),
            AlignmentDef::Curved { name, points } => {
                Alignment::curved().name(name).points(points).build()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{smooth_tangents, Alignment, AlignmentDef, SurveyPoint, MAX_STATIONS};
    use crate::{math::angular_distance, station::AlignmentKind, WallprofError};
    use approx::assert_relative_eq;
    use geo::geometry::Coord;

    fn survey(pk: f64, x: f64, y: f64, heading: Option<&str>) -> SurveyPoint {
        SurveyPoint {
            pk,
            x,
            y,
            heading: heading.map(str::to_string),
        }
    }

    #[test]
    fn test_straight() {
        let alignment = Alignment::straight()
            .name("Muro 1")
            .start(Coord { x: 0.0, y: 0.0 })
            .end(Coord { x: 100.0, y: 0.0 })
            .interval(50.0)
            .build()
            .unwrap();

        assert_eq!(alignment.name(), "Muro 1");
        assert_eq!(alignment.kind(), AlignmentKind::Straight);
        assert_eq!(alignment.total_length(), 100.0);
        let stations = alignment.stations();
        assert_eq!(stations.len(), 3);
        let mid = &stations[1];
        assert_eq!(mid.pk, 50.0);
        assert_eq!(mid.coord(), Coord { x: 50.0, y: 0.0 });
        assert_eq!(mid.bearing, 0.0);
        assert_eq!(stations[2].coord(), Coord { x: 100.0, y: 0.0 });
        assert!(stations.iter().all(|s| s.bearing == 0.0 && s.bearing_tangent == 0.0));
    }

    #[test]
    fn test_straight_forced_final_station() {
        let alignment = Alignment::straight()
            .start(Coord { x: 0.0, y: 0.0 })
            .end(Coord { x: 0.0, y: 1434.0 })
            .interval(20.0)
            .build()
            .unwrap();
        let stations = alignment.stations();
        assert_eq!(stations.len(), 73);
        assert_eq!(stations[71].pk, 1420.0);
        let last = &stations[72];
        assert_eq!(last.pk_label, "1+434");
        assert_eq!(last.coord(), Coord { x: 0.0, y: 1434.0 });
        assert_eq!(last.bearing, 90.0);
        assert!(stations.windows(2).all(|p| p[0].pk < p[1].pk));
        assert!(stations.iter().enumerate().all(|(i, s)| s.index == i));
    }

    #[test]
    fn test_straight_missing_parameters() {
        let missing = Alignment::straight()
            .start(Coord { x: 0.0, y: 0.0 })
            .interval(10.0)
            .build();
        assert!(matches!(missing, Err(WallprofError::Builder("end"))));

        let zero_interval = Alignment::straight()
            .start(Coord { x: 0.0, y: 0.0 })
            .end(Coord { x: 10.0, y: 0.0 })
            .interval(0.0)
            .build();
        assert!(matches!(
            zero_interval,
            Err(WallprofError::InvalidParameter { field: "interval", .. })
        ));

        let degenerate = Alignment::straight()
            .start(Coord { x: 5.0, y: 5.0 })
            .end(Coord { x: 5.0, y: 5.0 })
            .interval(10.0)
            .build();
        assert!(matches!(degenerate, Err(WallprofError::TooFewStations(1))));
    }

    #[test]
    fn test_straight_station_limit() {
        let build = |interval: f64| {
            Alignment::straight()
                .start(Coord { x: 0.0, y: 0.0 })
                .end(Coord { x: 100.0, y: 0.0 })
                .interval(interval)
                .build()
        };
        assert!(matches!(
            build(1e-300),
            Err(WallprofError::InvalidParameter { field: "interval", .. })
        ));
        assert!(matches!(
            build(f64::MIN_POSITIVE),
            Err(WallprofError::InvalidParameter { field: "interval", .. })
        ));

        assert!(build(100.0 / MAX_STATIONS as f64 / 2.0).is_err());
        assert_eq!(build(0.01).unwrap().stations().len(), 10_001);
    }

    #[test]
    fn test_smooth_tangents() {
        let coords = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 10.0, y: 10.0 },
            Coord { x: 0.0, y: 10.0 },
        ];
        let tangents = smooth_tangents(&coords);
        assert_eq!(tangents.len(), 4);
        assert_eq!(tangents[0], 0.0);
        assert_relative_eq!(tangents[1], 45.0, epsilon = 1e-9);
        assert_relative_eq!(tangents[2], 135.0, epsilon = 1e-9);
        assert_eq!(tangents[3], 180.0);
    }

    #[test]
    fn test_smooth_tangents_wrap() {
        // Legs at 350° and 10° average to due east, not west.
        let (s350, c350) = 350.0_f64.to_radians().sin_cos();
        let (s10, c10) = 10.0_f64.to_radians().sin_cos();
        let coords = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: c350, y: s350 },
            Coord {
                x: c350 + c10,
                y: s350 + s10,
            },
        ];
        let tangents = smooth_tangents(&coords);
        assert!(angular_distance(tangents[1], 0.0) < 1e-9);
    }

    #[test]
    fn test_curved() {
        let alignment = Alignment::curved()
            .name("Muro 2")
            .points([
                survey(40.0, 10.0, 10.0, None),
                survey(0.0, 0.0, 0.0, Some("12° 30' 0\"")),
                survey(20.0, 10.0, 0.0, None),
            ])
            .build()
            .unwrap();

        assert_eq!(alignment.kind(), AlignmentKind::Curved);
        assert_eq!(alignment.total_length(), 40.0);
        assert_eq!(alignment.interval(), 20.0);
        let stations = alignment.stations();
        let pks: Vec<f64> = stations.iter().map(|s| s.pk).collect();
        assert_eq!(pks, vec![0.0, 20.0, 40.0]);
        assert_relative_eq!(stations[0].bearing, 12.5);
        assert_eq!(stations[1].bearing, 0.0);
        assert_eq!(stations[0].bearing_tangent, 0.0);
        assert_relative_eq!(stations[1].bearing_tangent, 45.0, epsilon = 1e-9);
        assert_eq!(stations[2].bearing_tangent, 90.0);
        assert_eq!(stations[1].heading(), stations[1].bearing_tangent);
    }

    #[test]
    fn test_curved_rejects() {
        let single = Alignment::curved().point(survey(0.0, 0.0, 0.0, None)).build();
        assert!(matches!(single, Err(WallprofError::TooFewStations(1))));

        let duplicate = Alignment::curved()
            .points([survey(10.0, 0.0, 0.0, None), survey(10.0, 1.0, 0.0, None)])
            .build();
        assert!(matches!(
            duplicate,
            Err(WallprofError::NonIncreasingPk { .. })
        ));

        let bad_heading = Alignment::curved()
            .points([survey(0.0, 0.0, 0.0, Some("north")), survey(10.0, 1.0, 0.0, None)])
            .build();
        assert!(matches!(bad_heading, Err(WallprofError::Heading(_))));

        let nan = Alignment::curved()
            .points([survey(0.0, f64::NAN, 0.0, None), survey(10.0, 1.0, 0.0, None)])
            .build();
        assert!(matches!(nan, Err(WallprofError::StationPosition(_))));
    }

    #[test]
    fn test_nearest_station() {
        let alignment = Alignment::straight()
            .start(Coord { x: 0.0, y: 0.0 })
            .end(Coord { x: 100.0, y: 0.0 })
            .interval(20.0)
            .build()
            .unwrap();
        assert_eq!(alignment.nearest_station(41.0).pk, 40.0);
        assert_eq!(alignment.nearest_station(-5.0).pk, 0.0);
        assert_eq!(alignment.nearest_station(1e6).pk, 100.0);
        // Equidistant between 40 and 60.
        assert_eq!(alignment.nearest_station(50.0).pk, 40.0);
    }

    #[test]
    fn test_profile_number_and_bounds() {
        let alignment = Alignment::straight()
            .start(Coord { x: 10.0, y: 50.0 })
            .end(Coord { x: 70.0, y: 130.0 })
            .interval(20.0)
            .build()
            .unwrap();
        let stations = alignment.stations();
        assert_eq!(alignment.profile_number(&stations[0]), 1);
        assert_eq!(alignment.profile_number(&stations[2]), 3);
        assert_eq!(alignment.station_for_profile(3).unwrap().pk, 40.0);
        assert!(alignment.station_for_profile(50).is_none());

        let bounds = alignment.bounds();
        assert_eq!(bounds.min(), Coord { x: 10.0, y: 50.0 });
        assert_eq!(bounds.max(), Coord { x: 70.0, y: 130.0 });
    }

    #[test]
    fn test_definition_json() {
        let straight: AlignmentDef = serde_json::from_str(
            r#"{"kind": "straight", "name": "Muro 1", "start": [0, 0], "end": [0, 100], "interval": 20}"#,
        )
        .unwrap();
        let alignment = straight.build().unwrap();
        assert_eq!(alignment.stations().len(), 6);
        assert_eq!(alignment.stations()[2].coord(), Coord { x: 0.0, y: 40.0 });

        let curved: AlignmentDef = serde_json::from_str(
            r#"{"kind": "curved", "points": [
                {"pk": 0, "x": 0, "y": 0, "heading": "45° 0' 0\""},
                {"pk": 15, "x": 10, "y": 10, "heading": null},
                {"pk": 30, "x": 20, "y": 25}
            ]}"#,
        )
        .unwrap();
        let alignment = curved.build().unwrap();
        assert_eq!(alignment.kind(), AlignmentKind::Curved);
        assert_eq!(alignment.stations()[0].bearing, 45.0);

        assert!(serde_json::from_str::<AlignmentDef>(r#"{"kind": "spiral"}"#).is_err());
    }
}
