use crate::{options::Profiles, progress};
use anyhow::Result;
use log::warn;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
};
use wallprof::{build_all_with, Profile};

#[derive(Serialize)]
#[serde(untagged)]
enum Entry {
    Profile(Profile),
    Failed { pk: String, error: String },
}

impl Profiles {
    pub fn run(&self) -> Result<()> {
        let loaded = self.inputs.load()?;
        let profile_config = loaded.config.profile;
        let stations = loaded.alignment.stations();

        let pb = progress::bar(
            format!("Profiling {}", loaded.alignment.name()),
            stations.len() as u64,
        )?;
        let results = build_all_with(
            &loaded.alignment,
            &loaded.grid,
            profile_config.width,
            profile_config.resolution,
            |_| pb.inc(1),
        );
        pb.finish_and_clear();

        let entries: Vec<Entry> = results
            .into_iter()
            .zip(stations)
            .map(|(result, station)| match result {
                Ok(profile) => Entry::Profile(profile),
                Err(e) => {
                    warn!("station {}: {e}", station.pk_label);
                    Entry::Failed {
                        pk: station.pk_label.clone(),
                        error: e.to_string(),
                    }
                }
            })
            .collect();

        let mut wtr: Box<dyn Write> = match &self.out {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(std::io::stdout().lock()),
        };
        serde_json::to_writer(&mut wtr, &entries)?;
        writeln!(wtr)?;
        wtr.flush()?;
        Ok(())
    }
}
