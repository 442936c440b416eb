use crate::{options::Info, print_json};
use anyhow::Result;
use ascgrid::AscGrid;
use serde::Serialize;
use wallprof::Bounds;

#[derive(Serialize)]
struct GridInfo {
    ncols: usize,
    nrows: usize,
    cellsize: f64,
    nodata: f64,
    extent: Bounds,
    min_elevation: Option<f64>,
    max_elevation: Option<f64>,
}

impl Info {
    pub fn run(&self) -> Result<()> {
        let grid = AscGrid::load(&self.dem)?;
        let header = grid.header();
        print_json(&GridInfo {
            ncols: header.ncols,
            nrows: header.nrows,
            cellsize: header.cellsize,
            nodata: header.nodata,
            extent: Bounds::from(grid.extent()),
            min_elevation: grid.min_elevation(),
            max_elevation: grid.max_elevation(),
        })
    }
}
