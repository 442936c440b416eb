use ascgrid::AscGridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WallprofError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("an alignment needs at least 2 stations, got {0}")]
    TooFewStations(usize),

    #[error("stations must strictly increase in PK, {prev} is followed by {next}")]
    NonIncreasingPk { prev: f64, next: f64 },

    #[error("invalid {field}: {value}")]
    InvalidParameter { field: &'static str, value: f64 },

    #[error("invalid heading '{0}'")]
    Heading(String),

    #[error("invalid PK '{0}'")]
    Pk(String),

    #[error("station {0} has a non-finite position")]
    StationPosition(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    AscGrid(#[from] AscGridError),
}
