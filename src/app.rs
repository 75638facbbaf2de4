//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - runs the search pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, DemoArgs, OutputArgs, SearchArgs, ShowArgs, SynthArgs};
use crate::domain::{OutputFormat, SearchConfig};
use crate::error::AppError;
use crate::io::results::{ResultsFile, read_results_json, write_results_json};

pub mod pipeline;

/// Entry point for the `bls` binary.
pub fn run() -> Result<(), AppError> {
    // Environment defaults for `BLS_*` flags and `RUST_LOG`.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Search(args) => handle_search(args),
        Command::Synth(args) => handle_synth(args),
        Command::Demo(args) => handle_demo(args),
        Command::Show(args) => handle_show(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // A logger may already be installed when embedded; keep the existing one.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    let config = search_config_from_args(&args);
    let run = pipeline::run_search(&config)?;
    emit(&run, config.format, config.export_results.as_deref(), config.export_json.as_deref())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let spec = args.wave.to_spec();
    let run = pipeline::run_demo(&spec, args.direction)?;
    let OutputArgs {
        format,
        export,
        export_json,
    } = &args.output;
    emit(&run, *format, export.as_deref(), export_json.as_deref())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let curve = crate::data::generate_square_wave(&args.wave.to_spec())?;
    crate::io::export::write_light_curve_csv(&args.output, &curve)?;
    println!("Wrote {} samples to {}", curve.len(), args.output.display());
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let file = read_results_json(&args.file)?;
    print_results(&file.source, None, &file.params, &file.results, args.format);
    Ok(())
}

fn emit(
    run: &pipeline::RunOutput,
    format: OutputFormat,
    export_results: Option<&std::path::Path>,
    export_json: Option<&std::path::Path>,
) -> Result<(), AppError> {
    print_results(&run.source, run.stats.as_ref(), &run.params, &run.results, format);

    if let Some(path) = export_results {
        crate::io::export::write_results_csv(path, &run.results)?;
    }
    if let Some(path) = export_json {
        write_results_json(path, &ResultsFile::new(&run.source, &run.params, &run.results))?;
    }
    Ok(())
}

fn print_results(
    source: &str,
    stats: Option<&crate::io::ingest::IngestStats>,
    params: &crate::domain::BlsParams,
    results: &crate::domain::SegmentResultSet,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Table => {
            println!("{}", crate::report::format_run_summary(source, stats, params, results));
            print!("{}", crate::report::format_segment_table(results));
        }
        OutputFormat::Tsv => print!("{}", crate::report::format_tsv(results)),
        OutputFormat::None => {}
    }
}

pub fn search_config_from_args(args: &SearchArgs) -> SearchConfig {
    SearchConfig {
        input: args.input.clone(),
        time_offset: args.time_offset,
        keep_flagged: args.keep_flagged,
        params: args.params.to_params(),
        format: args.output.format,
        export_results: args.output.export.clone(),
        export_json: args.output.export_json.clone(),
    }
}

/// Rewrite argv so a bare input path means `search`.
///
/// Rules:
/// - `bls lc.csv ...`          -> `bls search lc.csv ...`
/// - `bls --help/--version/-h` -> unchanged
/// - `bls <subcommand> ...`    -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_subcommand = matches!(arg1.as_str(), "search" | "synth" | "demo" | "show" | "help");
    if is_subcommand || arg1.starts_with('-') {
        return argv;
    }

    argv.insert(1, "search".to_string());
    argv
}
