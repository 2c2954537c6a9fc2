//! Binary entry point for dxnorm.
//!
//! Drives the category compiler and the requirement classifier over
//! directories of raw JSON records and writes the aggregated output.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use dxnorm::config::DxnormConfig;
use dxnorm::observability;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// dxnorm - Normalizes degree-planner categories, programs, and courses.
#[derive(Parser)]
#[command(name = "dxnorm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "DXNORM_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compile every category record into a course-code regex.
    Categories {
        /// Directory of raw category records.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: `<output_dir>/categories.json`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory of category files consulted for codes the batch lacks.
        #[arg(long)]
        resolve_dir: Option<PathBuf>,
    },

    /// Normalize every program record.
    Programs {
        /// Directory of raw program records.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: `<output_dir>/programs.json`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize every course record.
    Courses {
        /// Directory of raw course records.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: `<output_dir>/courses.json`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the kind of each code.
    ClassifyCode {
        /// Codes to classify.
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(Some(&config.logging), cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &DxnormConfig) -> dxnorm::Result<()> {
    match command {
        Commands::Categories {
            input,
            output,
            resolve_dir,
        } => {
            let input = input.unwrap_or_else(|| config.categories_dir.clone());
            let output = output.unwrap_or_else(|| config.output_dir.join("categories.json"));
            commands::cmd_categories(&input, &output, resolve_dir.as_deref())
        },
        Commands::Programs { input, output } => {
            let input = input.unwrap_or_else(|| config.programs_dir.clone());
            let output = output.unwrap_or_else(|| config.output_dir.join("programs.json"));
            commands::cmd_programs(&input, &output)
        },
        Commands::Courses { input, output } => {
            let input = input.unwrap_or_else(|| config.courses_dir.clone());
            let output = output.unwrap_or_else(|| config.output_dir.join("courses.json"));
            commands::cmd_courses(&input, &output)
        },
        Commands::ClassifyCode { codes } => {
            commands::cmd_classify_code(&codes);
            Ok(())
        },
    }
}

/// Loads configuration from the given file, or the default location.
fn load_config(path: Option<&Path>) -> dxnorm::Result<DxnormConfig> {
    match path {
        Some(config_path) => DxnormConfig::load_from_file(config_path),
        // Logging is not up yet, so a broken default file is reported here.
        None => Ok(DxnormConfig::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: ignoring unreadable default config: {e}");
            DxnormConfig::default()
        })),
    }
}
