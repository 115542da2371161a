// ldp-synth — Local Differential Privacy Synthetic Data Generator
//
// Reads a CSV file, perturbs every column with a mechanism chosen by its
// type, and writes a CSV file of the same shape.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use ldp_synth_core::{
    read_csv_path, write_csv_path, Calibration, ColumnKind, Dispatcher, Mode, Table,
    TransformConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ldp-synth")]
#[command(about = "LDP Synth — Local Differential Privacy Synthetic Data Generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log per-column calibration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a privacy-perturbed copy of a CSV file
    Generate {
        /// Path to input CSV
        #[arg(short, long)]
        input: PathBuf,
        /// Privacy budget ε
        #[arg(short, long, allow_negative_numbers = true)]
        epsilon: f64,
        /// laplace (numeric), rr (categorical), all (both)
        #[arg(short, long)]
        mechanism: Option<String>,
        /// Path to output synthetic CSV
        #[arg(short, long)]
        output: PathBuf,
        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,
        /// Field delimiter (single character, or "tab")
        #[arg(short, long)]
        delimiter: Option<String>,
    },
    /// Show column types and calibration without writing anything
    Inspect {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "1.0", allow_negative_numbers = true)]
        epsilon: f64,
        #[arg(short, long)]
        mechanism: Option<String>,
        #[arg(short, long)]
        delimiter: Option<String>,
    },
    /// Configure defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
    Get { key: String },
    List,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            input,
            epsilon,
            mechanism,
            output,
            seed,
            delimiter,
        } => cmd_generate(input, epsilon, mechanism, output, seed, delimiter),
        Commands::Inspect {
            input,
            epsilon,
            mechanism,
            delimiter,
        } => cmd_inspect(input, epsilon, mechanism, delimiter),
        Commands::Config { action } => cmd_config(action),
    }
}

/// Flags override the config file.
fn resolve_mode(flag: Option<&str>, config: &config::Config) -> Result<Mode> {
    match flag {
        Some(name) => Ok(name.parse::<Mode>()?),
        None => Ok(config.default_mechanism),
    }
}

fn resolve_delimiter(flag: Option<&str>, config: &config::Config) -> Result<u8> {
    match flag {
        Some(value) => config::delimiter_byte(config::parse_delimiter(value)?),
        None => config.delimiter_byte(),
    }
}

fn load_table(path: &Path, delimiter: u8) -> Result<Table> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    read_csv_path(path, delimiter)
        .with_context(|| format!("Failed to read input table {}", path.display()))
}

fn cmd_generate(
    input: PathBuf,
    epsilon: f64,
    mechanism: Option<String>,
    output: PathBuf,
    seed: Option<u64>,
    delimiter: Option<String>,
) -> Result<()> {
    let config = config::Config::load()?;
    generate(
        &input,
        &output,
        epsilon,
        mechanism.as_deref(),
        seed,
        delimiter.as_deref(),
        &config,
    )?;

    println!(
        "{} Synthetic data written to {}",
        "✓".green(),
        output.display()
    );
    Ok(())
}

/// Read `input`, perturb it and write `output`. On any error before the
/// write, `output` is not created.
fn generate(
    input: &Path,
    output: &Path,
    epsilon: f64,
    mechanism: Option<&str>,
    seed: Option<u64>,
    delimiter: Option<&str>,
    config: &config::Config,
) -> Result<()> {
    let mode = resolve_mode(mechanism, config)?;
    let delimiter = resolve_delimiter(delimiter, config)?;
    let seed = seed.or(config.seed);

    // Budget is checked before any file is touched
    let dispatcher = Dispatcher::new(TransformConfig::new(epsilon, mode)?);

    let table = load_table(input, delimiter)?;
    tracing::info!(
        "Loaded {} columns x {} rows from {}",
        table.column_count(),
        table.row_count(),
        input.display()
    );

    let synthetic = match seed {
        Some(seed) => dispatcher.transform(&table, &mut ChaCha20Rng::seed_from_u64(seed))?,
        None => dispatcher.transform(&table, &mut rand::thread_rng())?,
    };

    write_csv_path(output, &synthetic, delimiter)
        .with_context(|| format!("Failed to write output table {}", output.display()))
}

fn cmd_inspect(
    input: PathBuf,
    epsilon: f64,
    mechanism: Option<String>,
    delimiter: Option<String>,
) -> Result<()> {
    let config = config::Config::load()?;
    let mode = resolve_mode(mechanism.as_deref(), &config)?;
    let delimiter = resolve_delimiter(delimiter.as_deref(), &config)?;
    let transform_config = TransformConfig::new(epsilon, mode)?;

    let table = load_table(&input, delimiter)?;
    let plans = Dispatcher::new(transform_config).plan(&table)?;

    println!("{}", "Table".bold());
    println!("  {:<14} {}", "file".bright_cyan(), input.display());
    println!("  {:<14} {}", "rows".bright_cyan(), table.row_count());
    println!("  {:<14} {}", "columns".bright_cyan(), table.column_count());
    println!("  {:<14} {}", "budget".bright_cyan(), transform_config.budget);
    println!("  {:<14} {}", "mechanism".bright_cyan(), mode);
    println!();

    println!("{}", "Columns".bold());
    for plan in &plans {
        let kind = match plan.kind {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        };
        let detail = match &plan.calibration {
            Calibration::Passthrough => "passthrough".dimmed().to_string(),
            Calibration::Laplace { sensitivity, scale } => {
                format!("laplace  sensitivity={} scale={:.4}", sensitivity, scale)
            }
            Calibration::RandomizedResponse {
                categories,
                retention,
            } => format!("rr  k={} p={:.4}", categories, retention),
        };
        let marker = if plan.perturbed() {
            "●".yellow()
        } else {
            "○".dimmed()
        };
        println!("  {} {:<20} {:<12} {}", marker, plan.name, kind, detail);
    }

    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = config::Config::load()?;

    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} Set {} = {}", "✓".green(), key.bright_cyan(), value);
        }

        ConfigAction::Get { key } => {
            if let Some(value) = config.get(&key) {
                println!("{} = {}", key.bright_cyan(), value);
            } else {
                anyhow::bail!("Unknown config key: {}", key);
            }
        }

        ConfigAction::List => {
            println!("{}", "Configuration".bold());
            println!();

            for (key, value) in config.list() {
                println!("  {:<20} {}", key.bright_cyan(), value);
            }
        }

        ConfigAction::Path => {
            println!("{}", config::Config::config_file()?.display());
        }
    }

    Ok(())
}
