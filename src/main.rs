//! riskmap-tools: composite spatial risk scoring for geographic zones
//!
//! Scores zones from tabulated risk factors and exports the classified
//! result for choropleth mapping.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use riskmap_tools::{
    cli,
    config::{AppConfig, AppConfigBuilder, ConfigPreset},
    pipeline::exit_codes,
    reports::ExportFormat,
    scoring::CutPoints,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nInput Formats:",
        "\n  CSV, JSON record array, GeoJSON FeatureCollection",
        "\n\nExport Formats:",
        "\n  tabular (csv), geo (geojson), json",
        "\n\nPresets:",
        "\n  balanced, h5n1"
    )
}

#[derive(Parser)]
#[command(name = "riskmap-tools")]
#[command(version, long_version = build_long_version())]
#[command(about = "Composite spatial risk scoring for geographic zones", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  A zone scored at or above --fail-above
    3  Error occurred

EXAMPLES:
    # Score NYC zip codes with the H5N1 weights and write a GeoJSON layer
    riskmap-tools score zones.csv --preset h5n1 --geometry modzcta.geojson -f geo -O risk.geojson

    # Custom weights
    riskmap-tools score zones.csv -w bird_density=0.6 -w population_density=0.4

    # Ten highest-risk zones with the score distribution
    riskmap-tools rank zones.csv --top 10")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Model and input options shared by `score` and `rank`
#[derive(Parser)]
struct ModelArgs {
    /// Zone attribute file (CSV, JSON or GeoJSON)
    input: PathBuf,

    /// Weight preset (balanced, h5n1)
    #[arg(short, long)]
    preset: Option<String>,

    /// Factor weight as FACTOR=WEIGHT; repeat for each factor. Weights must sum to 1.0
    #[arg(short, long = "weight", value_name = "FACTOR=WEIGHT")]
    weights: Vec<String>,

    /// Tier boundaries as MEDIUM,HIGH,VERY_HIGH (default 0.25,0.5,0.75)
    #[arg(long, value_name = "C1,C2,C3")]
    cut_points: Option<String>,

    /// Normalized value given to missing factors
    #[arg(long)]
    default_fill: Option<f64>,

    /// GeoJSON boundary file joined onto zones by identifier
    #[arg(short, long)]
    geometry: Option<PathBuf>,

    /// Column or property holding the zone identifier
    #[arg(long)]
    id_column: Option<String>,

    /// Keep numeric identifiers as given instead of zero-padding to five digits
    #[arg(long)]
    no_pad: bool,
}

/// Arguments for the `score` subcommand
#[derive(Parser)]
struct ScoreArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Export format
    #[arg(short, long, value_enum)]
    format: Option<ExportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Append population, area and raw factor values to the export
    #[arg(long)]
    include_attributes: bool,

    /// Decimal places on exported scores
    #[arg(long)]
    precision: Option<u32>,

    /// Exit with code 1 if any zone scores at or above this value
    #[arg(long, value_name = "SCORE")]
    fail_above: Option<f64>,
}

/// Arguments for the `rank` subcommand
#[derive(Parser)]
struct RankArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Number of zones to list
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// List every zone scoring at or above this value instead of the top N
    #[arg(short, long)]
    threshold: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score zones and export the classified result
    Score(ScoreArgs),

    /// Show the score distribution and the highest-risk zones
    Rank(RankArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show, explain, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Print an example config file
    Example {
        /// Include every option with its default
        #[arg(long)]
        full: bool,
    },
    /// Generate an example .riskmap-tools.yaml in the current directory
    Init,
    /// Print the JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the weight presets
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match dispatch(cli) {
        Ok(code) if code != exit_codes::SUCCESS => std::process::exit(code),
        Ok(_) => Ok(()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Dispatch to command handlers, returning the process exit code.
fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Score(args) => {
            let mut overrides = model_overrides(&args.model, cli.no_color, cli.quiet)?
                .output_file(args.output_file)
                .include_attributes(args.include_attributes);
            if let Some(format) = args.format {
                overrides = overrides.output_format(format);
            }
            if let Some(precision) = args.precision {
                overrides = overrides.precision(precision);
            }
            let config = effective_config(cli.config.as_deref(), &overrides.build(), &args.model)?;

            cli::run_score(cli::ScoreRequest {
                input: args.model.input,
                config,
                fail_above: args.fail_above,
            })
        }

        Commands::Rank(args) => {
            let overrides = model_overrides(&args.model, cli.no_color, cli.quiet)?.build();
            let mut config = effective_config(cli.config.as_deref(), &overrides, &args.model)?;
            if let Some(top) = args.top {
                config.output.top = top;
            }
            // Rankings always go to the terminal
            config.output.file = None;

            cli::run_rank(cli::RankRequest {
                input: args.model.input,
                config,
                threshold: args.threshold,
            })
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "riskmap-tools", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => run_config_action(action, cli.config.as_deref()),
    }
}

/// CLI overrides for the model and input sections.
fn model_overrides(
    args: &ModelArgs,
    no_color: bool,
    quiet: bool,
) -> Result<AppConfigBuilder> {
    let mut builder = AppConfig::builder()
        .geometry_file(args.geometry.clone())
        .no_color(no_color)
        .quiet(quiet);

    if let Some(ref name) = args.preset {
        let preset = ConfigPreset::from_name(name).with_context(|| {
            let names: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
            format!("Unknown preset '{name}'. Valid options: {}", names.join(", "))
        })?;
        builder = builder.preset(preset.weights());
    }
    if !args.weights.is_empty() {
        builder = builder.weights(cli::parse_weights(&args.weights)?);
    }
    if let Some(ref spec) = args.cut_points {
        builder = builder.cut_points(parse_cut_points(spec)?);
    }
    if let Some(fill) = args.default_fill {
        builder = builder.default_fill(fill);
    }
    if let Some(ref column) = args.id_column {
        builder = builder.id_column(column.clone());
    }
    Ok(builder)
}

/// Load the config file and layer CLI overrides on top.
fn effective_config(
    config_path: Option<&std::path::Path>,
    overrides: &AppConfig,
    args: &ModelArgs,
) -> Result<AppConfig> {
    let (mut config, loaded_from) = AppConfig::from_file_with_overrides(config_path, overrides)
        .context("Failed to load configuration")?;
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    if args.no_pad {
        config.input.pad_zip_codes = false;
    }
    Ok(config)
}

fn parse_cut_points(spec: &str) -> Result<CutPoints> {
    let values = spec
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid cut point '{}'", part.trim()))
        })
        .collect::<Result<Vec<_>>>()?;
    match values.as_slice() {
        [medium, high, very_high] => {
            CutPoints::new(*medium, *high, *very_high).context("Invalid --cut-points")
        }
        _ => anyhow::bail!("Expected three cut points, got {}", values.len()),
    }
}

fn run_config_action(action: ConfigAction, config_path: Option<&std::path::Path>) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = riskmap_tools::config::load_or_default(config_path)
                .context("Failed to load configuration")?;
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                ::dirs::config_dir().map(|p| p.join("riskmap-tools").display().to_string()),
                ::dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in riskmap_tools::config::file::CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match riskmap_tools::config::discover_config_file(config_path) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Example { full } => {
            if full {
                print!("{}", riskmap_tools::config::generate_full_example_config());
            } else {
                print!("{}", riskmap_tools::config::generate_example_config());
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".riskmap-tools.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            let content = riskmap_tools::config::generate_full_example_config();
            std::fs::write(&target, content)
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
        ConfigAction::Schema { output } => {
            let schema = riskmap_tools::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
        ConfigAction::Presets => {
            for preset in ConfigPreset::all() {
                println!("{:<10} {}", preset.name(), preset.description());
                for (factor, weight) in preset.weights().weights() {
                    println!("    {factor:<22} {weight:.2}");
                }
            }
        }
    }
    Ok(exit_codes::SUCCESS)
}
