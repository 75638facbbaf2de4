//! Command-line parsing for the `bls` transit search.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! search code. Search parameters can also come from `BLS_*` environment
//! variables (a `.env` file is loaded at startup); explicit flags win.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::data::SquareWave;
use crate::domain::{BlsParams, Direction, OutputFormat, SegmentAnchor};
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bls", version, about = "Segmented box-least-squares transit search")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search a light curve (CSV or JSON, path or http(s) URL) for transits.
    Search(SearchArgs),
    /// Write a synthetic square-wave light curve to CSV.
    Synth(SynthArgs),
    /// Generate the synthetic light curve in memory and search it.
    Demo(DemoArgs),
    /// Print a results JSON written by `bls search --export-json`.
    Show(ShowArgs),
}

/// Core search parameters.
#[derive(Debug, Args, Clone)]
pub struct ParamArgs {
    /// Requested bins per segment (reduced when a segment has fewer samples).
    #[arg(long, env = "BLS_NBINS", default_value_t = 1000)]
    pub nbins: usize,

    /// Segment length (days).
    #[arg(long, env = "BLS_SEGMENT_SIZE", default_value_t = 2.0)]
    pub segment_size: f64,

    /// Shortest transit duration to consider (days).
    #[arg(long, env = "BLS_MIN_DURATION", default_value_t = 0.0833)]
    pub min_duration: f64,

    /// Longest transit duration to consider (days).
    #[arg(long, env = "BLS_MAX_DURATION", default_value_t = 0.5)]
    pub max_duration: f64,

    /// Signal polarity: dip, either, rise (or -1, 0, +1).
    #[arg(
        long,
        env = "BLS_DIRECTION",
        default_value = "dip",
        value_parser = parse_direction,
        allow_negative_numbers = true
    )]
    pub direction: Direction,

    /// Where segment windows start: absolute zero or the first sample.
    #[arg(long, value_enum, env = "BLS_ANCHOR", default_value_t = SegmentAnchor::Zero)]
    pub anchor: SegmentAnchor,
}

fn parse_direction(value: &str) -> Result<Direction, AppError> {
    value.parse()
}

impl ParamArgs {
    pub fn to_params(&self) -> BlsParams {
        BlsParams {
            nbins: self.nbins,
            segment_size: self.segment_size,
            min_duration: self.min_duration,
            max_duration: self.max_duration,
            direction: self.direction,
            anchor: self.anchor,
        }
    }
}

/// Output options shared by `search` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Terminal output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Export per-segment results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export results (params + per-segment candidates) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for searching a light curve.
#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Light curve file or http(s) URL (`.json` → JSON, otherwise CSV).
    pub input: String,

    #[command(flatten)]
    pub params: ParamArgs,

    /// Added to every time stamp on ingest (days).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub time_offset: f64,

    /// Keep samples with a non-zero quality flag.
    #[arg(long)]
    pub keep_flagged: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Shape of the synthetic square wave.
#[derive(Debug, Args, Clone)]
pub struct WaveArgs {
    /// Number of samples.
    #[arg(long, default_value_t = 20_000)]
    pub samples: usize,

    /// Time between samples (days).
    #[arg(long, default_value_t = 0.020433)]
    pub cadence: f64,

    /// Samples per period.
    #[arg(long, default_value_t = 200)]
    pub period: usize,

    /// Samples per transit.
    #[arg(long, default_value_t = 20)]
    pub width: usize,

    /// Offset of the first transit (samples).
    #[arg(long, default_value_t = 30)]
    pub phase: usize,

    /// Flux added inside a transit.
    #[arg(long, default_value_t = -10.0, allow_negative_numbers = true)]
    pub depth: f64,

    /// Flux outside transits.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub baseline: f64,

    /// Gaussian noise sigma (0 disables noise).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl WaveArgs {
    pub fn to_spec(&self) -> SquareWave {
        SquareWave {
            samples: self.samples,
            cadence: self.cadence,
            period: self.period,
            width: self.width,
            phase: self.phase,
            depth: self.depth,
            baseline: self.baseline,
            noise_sigma: self.noise,
            seed: self.seed,
        }
    }
}

/// Options for writing a synthetic light curve.
#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Output CSV path.
    #[arg(long, short = 'o', value_name = "CSV")]
    pub output: PathBuf,

    #[command(flatten)]
    pub wave: WaveArgs,
}

/// Options for the in-memory demo.
#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    #[command(flatten)]
    pub wave: WaveArgs,

    /// Signal polarity: dip, either, rise (or -1, 0, +1).
    #[arg(long, default_value = "dip", value_parser = parse_direction, allow_negative_numbers = true)]
    pub direction: Direction,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for printing a saved results file.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Results JSON produced by `bls search --export-json`.
    #[arg(value_name = "JSON")]
    pub file: PathBuf,

    /// Terminal output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}
