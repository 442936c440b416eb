use crate::{
    options::{Policy, Width},
    print_json,
};
use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;
use std::{fs::File, io::BufReader};
use wallprof::{
    lama::{lama_for_station, read_lama_points},
    Alert, Pk, Profile, StationMeasurement,
};

#[derive(Serialize)]
struct Report<'a> {
    station: &'a str,
    profile_number: usize,
    measurement: StationMeasurement,
    revancha: Option<f64>,
    alerts: Vec<Alert>,
}

impl Width {
    pub fn run(&self) -> Result<()> {
        let loaded = self.inputs.load()?;
        let config = loaded.config;
        let target = parse_pk(&self.pk)?;
        let station = loaded.alignment.nearest_station(target);
        let profile = Profile::new(
            station,
            &loaded.grid,
            config.profile.width,
            config.profile.resolution,
        )?;

        let mut measurement = StationMeasurement::new(station.pk);
        measurement.crown = match self.crown {
            Some(offset) => profile.snap(offset),
            None => profile.crest(),
        };

        if let Some(path) = &self.lama {
            let file = File::open(path)
                .with_context(|| format!("opening LAMA points {}", path.display()))?;
            let points = read_lama_points(BufReader::new(file))?;
            measurement.lama_original = lama_for_station(&loaded.alignment, station, &points)
                .and_then(|lama| lama.project(station, &loaded.grid).reference());
        }
        if let Some(offset) = self.lama_offset {
            measurement.lama_modified = profile.snap(offset);
        }

        let boundaries = match self.policy {
            Policy::Directional => measurement
                .crown
                .map(|crown| profile.directional_boundaries(crown, &config.detection)),
            Policy::Projected => measurement.lama().map(|lama| {
                let origin = measurement.crown.map_or(0.0, |crown| crown.offset);
                profile.projected_boundaries(origin, lama.elevation, &config.detection)
            }),
        };
        measurement.width = boundaries.and_then(|b| b.width());
        if measurement.width.is_none() {
            warn!("station {}: width not detected", station.pk_label);
        }

        print_json(&Report {
            station: &station.pk_label,
            profile_number: loaded.alignment.profile_number(station),
            revancha: measurement.revancha(),
            alerts: measurement.alerts(&config.alerts),
            measurement,
        })
    }
}

/// Accepts `K+MMM` labels or plain meters.
fn parse_pk(s: &str) -> Result<f64> {
    if s.contains('+') {
        Ok(s.parse::<Pk>()?.meters())
    } else {
        s.trim()
            .parse::<f64>()
            .with_context(|| format!("invalid PK '{s}'"))
    }
}
