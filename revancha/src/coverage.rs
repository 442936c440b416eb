use crate::{options::Coverage, print_json};
use anyhow::Result;
use wallprof::coverage_check;

impl Coverage {
    pub fn run(&self) -> Result<()> {
        let loaded = self.inputs.load()?;
        let coverage = coverage_check(
            loaded.grid.extent(),
            loaded.alignment.bounds(),
            loaded.config.profile.buffer,
        );
        print_json(&coverage)
    }
}
