use crate::{options::Summary, print_json};
use anyhow::Result;
use log::warn;
use serde::Serialize;
use wallprof::{build_all, Profile, WallSummary};

#[derive(Serialize)]
struct NamedSummary<'a> {
    name: &'a str,
    #[serde(flatten)]
    summary: WallSummary,
}

impl Summary {
    pub fn run(&self) -> Result<()> {
        let loaded = self.inputs.load()?;
        let profile_config = loaded.config.profile;
        let profiles: Vec<Profile> = build_all(
            &loaded.alignment,
            &loaded.grid,
            profile_config.width,
            profile_config.resolution,
        )
        .into_iter()
        .zip(loaded.alignment.stations())
        .filter_map(|(result, station)| match result {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("station {}: {e}", station.pk_label);
                None
            }
        })
        .collect();

        print_json(&NamedSummary {
            name: loaded.alignment.name(),
            summary: WallSummary::from_profiles(&profiles),
        })
    }
}
