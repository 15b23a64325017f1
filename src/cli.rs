// src/cli.rs

use clap::Parser;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::config::ContaminationConfig;
use crate::RunOptions;

const FRACTION: RangeInclusive<f64> = 0f64..=1f64;

/// Flags IRMA influenza output folders for potential contamination or co-infection.
///
/// Run it from the directory holding the IRMA output folders (e.g. `.../run/human`),
/// or point `--root` at it.
#[derive(Parser, Debug, Clone)]
#[command(name = "flu-contam", version, about, long_about = None)]
pub struct Args {
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        help = "Directory holding the IRMA output folders [default: current directory]"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        long,
        value_parser = parse_fraction,
        default_value_t = ContaminationConfig::default().max_variant_percentage,
        help = "Fraction of a segment's length expected to carry minority variants"
    )]
    pub max_variant_percentage: f64,

    #[arg(
        long,
        value_parser = parse_fraction,
        default_value_t = ContaminationConfig::default().max_freq,
        help = "Variants above this frequency are high frequency variants"
    )]
    pub max_freq: f64,

    #[arg(
        long,
        value_parser = parse_fraction,
        default_value_t = ContaminationConfig::default().max_freq_prop,
        help = "Max proportion of high frequency variants out of all variants"
    )]
    pub max_freq_prop: f64,

    #[arg(
        long,
        default_value_t = ContaminationConfig::default().max_secondary_size,
        help = "Max size of secondary data compared to primary data"
    )]
    pub max_secondary_size: f64,

    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(1..=5),
        default_value_t = 2,
        help = "Number of raised flags at which a sample is flagged"
    )]
    pub max_flags: u8,

    #[arg(
        short = 'k',
        long = "keep-going",
        help = "Skip samples that fail instead of stopping the run"
    )]
    pub keep_going: bool,

    #[arg(
        short = 'j',
        long = "jobs",
        value_parser = clap::value_parser!(u16).range(1..),
        default_value_t = 1,
        help = "Number of samples evaluated at the same time"
    )]
    pub jobs: u16,

    #[arg(short = 'v', long = "verbose", action)]
    pub verbose: bool,
}

impl Args {
    pub fn config(&self) -> ContaminationConfig {
        ContaminationConfig {
            max_variant_percentage: self.max_variant_percentage,
            max_freq: self.max_freq,
            max_freq_prop: self.max_freq_prop,
            max_secondary_size: self.max_secondary_size,
            max_flags: usize::from(self.max_flags),
            ..Default::default()
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            keep_going: self.keep_going,
            jobs: usize::from(self.jobs),
        }
    }
}

fn parse_fraction(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .parse()
        .map_err(|_| format!("'{input}' is not a number"))?;
    if FRACTION.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "value not in the range {} - {}",
            FRACTION.start(),
            FRACTION.end()
        ))
    }
}
