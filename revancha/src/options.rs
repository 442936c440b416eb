use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// Profile retaining wall alignments over an ASCII grid DEM.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Print a DEM's header, extent and elevation range.
    Info(Info),

    /// Check that a DEM covers an alignment and its cross-sections.
    Coverage(Coverage),

    /// Write every cross-section profile of an alignment as JSON.
    Profiles(Profiles),

    /// Measure crest width and revancha at one station.
    Width(Width),

    /// Summarize terrain along an alignment.
    Summary(Summary),
}

/// Inputs shared by every alignment command.
#[derive(Debug, Clone, Args)]
pub struct Inputs {
    /// ESRI ASCII grid (.asc) elevation file.
    #[arg(short, long)]
    pub dem: PathBuf,

    /// Alignment definition (JSON).
    #[arg(short, long)]
    pub alignment: PathBuf,

    /// Optional tuning parameters (JSON). Missing fields keep their
    /// defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct Info {
    /// ESRI ASCII grid (.asc) elevation file.
    pub dem: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Coverage {
    #[command(flatten)]
    pub inputs: Inputs,
}

#[derive(Debug, Clone, Args)]
pub struct Profiles {
    #[command(flatten)]
    pub inputs: Inputs,

    /// Output file, stdout if omitted.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Outermost crossings on each side of the crown, at crown elevation.
    Directional,

    /// Nearest and farthest crossings at LAMA elevation plus the
    /// projected offset.
    Projected,
}

#[derive(Debug, Clone, Args)]
pub struct Width {
    #[command(flatten)]
    pub inputs: Inputs,

    /// Station PK, as `1+434` or plain meters.
    #[arg(long)]
    pub pk: String,

    #[arg(long, value_enum, default_value_t = Policy::Directional)]
    pub policy: Policy,

    /// Crown offset. The highest terrain sample is used if omitted.
    #[arg(long)]
    pub crown: Option<f64>,

    /// LAMA points file (`profile,x,y` per line).
    #[arg(long)]
    pub lama: Option<PathBuf>,

    /// Hand-corrected LAMA offset, preferred over the surveyed point.
    #[arg(long)]
    pub lama_offset: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct Summary {
    #[command(flatten)]
    pub inputs: Inputs,
}
