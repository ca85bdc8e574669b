use std::path::PathBuf;

use clap::Parser;

use crate::chart::{DEFAULT_BINS, MAX_BINS};
use crate::data::reference::SPECIES_COLUMN;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dataset-report",
    about = "Load a table, print descriptive statistics and show four standard charts",
    version
)]
pub struct Config {
    /// Table file to load (.csv, .tsv, .json, .parquet); the bundled iris
    /// dataset is used when the file does not exist
    #[arg(default_value = "iris.csv")]
    pub path: PathBuf,

    /// Column whose values group rows for grouped means, bar and scatter charts
    #[arg(long, default_value = SPECIES_COLUMN)]
    pub category: String,

    /// Number of histogram buckets (1 to 10000)
    #[arg(long, default_value_t = DEFAULT_BINS, value_parser = parse_bins)]
    pub bins: usize,

    /// Rows shown in the preview
    #[arg(long, default_value_t = 5)]
    pub head: usize,

    /// Print the report without opening the chart viewer
    #[arg(long)]
    pub no_window: bool,
}

fn parse_bins(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if (1..=MAX_BINS).contains(&n) => Ok(n),
        Ok(_) => Err(format!("must be between 1 and {MAX_BINS}")),
        Err(e) => Err(e.to_string()),
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["dataset-report"])
    }
}
