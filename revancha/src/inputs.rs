use crate::options::Inputs;
use anyhow::{Context, Result};
use ascgrid::AscGrid;
use log::info;
use std::{fs::File, io::BufReader};
use wallprof::{Alignment, AlignmentDef, Config};

/// Everything an alignment command works from.
pub struct Loaded {
    pub grid: AscGrid,
    pub alignment: Alignment,
    pub config: Config,
}

impl Inputs {
    pub fn load(&self) -> Result<Loaded> {
        let config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Config::default(),
        };
        config.validate()?;

        let file = File::open(&self.alignment)
            .with_context(|| format!("opening alignment {}", self.alignment.display()))?;
        let def: AlignmentDef = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing alignment {}", self.alignment.display()))?;
        let alignment = def.build()?;

        let grid = AscGrid::load(&self.dem)
            .with_context(|| format!("loading DEM {}", self.dem.display()))?;

        info!(
            "loaded {:?}: {} stations over {}",
            alignment.name(),
            alignment.stations().len(),
            self.dem.display()
        );

        Ok(Loaded {
            grid,
            alignment,
            config,
        })
    }
}
