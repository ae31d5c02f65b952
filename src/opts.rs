use std::path::PathBuf;

use argh::FromArgs;
use log::LevelFilter;

use crate::approx::Problem;
use crate::format::Format;
use crate::functions::Builtin;
use crate::precision::Precision;

/// Minimax polynomial coefficient generator.
#[derive(FromArgs)]
pub struct Opts {
    /// functions to approximate (default: all built-ins)
    #[argh(positional)]
    pub functions: Vec<Builtin>,

    /// polynomial degree
    #[argh(option, default = "3")]
    pub order: usize,

    /// number of equal-width segments
    #[argh(option, short = 's', default = "1")]
    pub segments: usize,

    /// working precision in decimal digits
    #[argh(option, default = "Precision::DEFAULT_DIGITS")]
    pub digits: u32,

    /// coefficient format
    #[argh(option, default = "Default::default()")]
    pub format: Format,

    /// seed for search starting points
    #[argh(option, default = "0")]
    pub seed: u64,

    /// maximum number of exchange steps per fit
    #[argh(option, default = "Problem::DEFAULT_MAX_ITERATIONS")]
    pub max_iterations: usize,

    /// output file
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,

    /// logging level
    #[argh(option, long = "log", default = "LevelFilter::Warn")]
    pub log_level: LevelFilter,
}

impl Opts {
    /// Parse options from `env::args`.
    pub fn parse() -> Opts {
        argh::from_env()
    }
}
