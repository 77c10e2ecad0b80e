//! Reel CLI - asset library and structured prompt builder for AI video

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{asset, prompt, template};
use reel_core::ReelConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Media asset library and five-element video prompt builder", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory (overrides config files and REEL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read settings from this file instead of the standard locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Asset library operations
    #[command(subcommand)]
    Asset(asset::AssetCommands),

    /// Prompt document operations
    #[command(subcommand)]
    Prompt(prompt::PromptCommands),

    /// Browse preset prompt templates
    #[command(subcommand)]
    Template(template::TemplateCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReelConfig::load_from_file(path)?,
        None => ReelConfig::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    let _log_guard = logging::init(&config.logs_dir());

    match cli.command {
        Commands::Asset(cmd) => asset::run(cmd, &config),
        Commands::Prompt(cmd) => prompt::run(cmd, &config),
        Commands::Template(cmd) => template::run(cmd),
    }
}
