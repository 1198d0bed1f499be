//! CAN Codegen CLI Application
//!
//! This is the command-line interface for the CAN declaration generator.
//! It uses the can-codegen library and adds:
//! - Mode and path selection from flags or a TOML config file
//! - Logging setup
//! - Optional JSON run summary

use anyhow::{anyhow, Context, Result};
use can_codegen::{Generator, GeneratorConfig, IdentifierMode, QuotePolicy};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod config;
mod report;

use config::AppConfig;

/// Mode names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Name from column 1, suffixed with the row index
    Input,
    /// Name from column 3, no suffix
    Output,
}

impl From<ModeArg> for IdentifierMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Input => IdentifierMode::Input,
            ModeArg::Output => IdentifierMode::Output,
        }
    }
}

/// CAN Codegen - Generate CanMessage declarations from a CSV message table
#[derive(Parser, Debug)]
#[command(name = "can-codegen")]
#[command(about = "Generate CanMessage declarations from a CSV message table", long_about = None)]
#[command(version)]
struct Args {
    /// Which table to read and how to name declarations
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// CSV table to read (default: the table selected by the mode)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// File to write declarations to (truncated on every run)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a JSON run summary to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Copy quotes and backslashes into string literals instead of failing
    #[arg(long)]
    allow_unquotable: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Fully resolved settings for one run
#[derive(Debug)]
struct RunSettings {
    input: PathBuf,
    output: PathBuf,
    summary: Option<PathBuf>,
    generator: GeneratorConfig,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("CAN Codegen CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using codegen library v{}", can_codegen::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let settings = resolve_settings(&args, &app_config)?;
    log::debug!("Resolved settings: {:?}", settings);

    let generator = Generator::new(settings.generator);
    let mode = generator.config().mode;
    let generation = generator
        .generate_file(&settings.input, &settings.output)
        .with_context(|| format!("Generation from {:?} failed", settings.input))?;

    if !generation.is_collision_free() {
        log::warn!(
            "{} declarations share an identifier with an earlier row",
            generation.collisions.len()
        );
    }

    let rows = generation.rows;
    if let Some(summary_path) = &settings.summary {
        let summary =
            report::RunSummary::new(mode, &settings.input, &settings.output, generation);
        report::write_summary(summary_path, &summary)?;
    }

    log::info!("Done: {} declarations in {:?}", rows, settings.output);
    Ok(())
}

/// Merge command line flags over the config file over built-in defaults
fn resolve_settings(args: &Args, app_config: &AppConfig) -> Result<RunSettings> {
    let mode: IdentifierMode = args
        .mode
        .map(IdentifierMode::from)
        .or(app_config.mode)
        .ok_or_else(|| {
            anyhow!("no mode selected: pass --mode input|output or set `mode` in the config file")
        })?;

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| app_config.inputs.for_mode(mode).to_path_buf());

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| app_config.output.file.clone());

    let summary = args
        .summary
        .clone()
        .or_else(|| app_config.output.summary.clone());

    let quote_policy = if args.allow_unquotable || app_config.generator.allow_unquotable {
        QuotePolicy::Verbatim
    } else {
        QuotePolicy::Reject
    };

    let generator = GeneratorConfig::new(mode)
        .with_delimiter(app_config.generator.delimiter_byte()?)
        .with_quote_policy(quote_policy)
        .with_collision_warnings(app_config.generator.warn_on_collision);

    Ok(RunSettings {
        input,
        output,
        summary,
        generator,
    })
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
