use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nextstep::config::{Config, OutputFormat};
use nextstep::logging;
use nextstep::render::{render_json, render_markdown};
use nextstep::status::{attach_project, load_status, WholeStatus};
use nextstep::steps::{select_best_step, select_steps, Catalog};

#[derive(Parser)]
#[command(name = "nextstep")]
#[command(about = "Suggest the next development step for a Teams app project")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the steps that apply to a status snapshot
    Suggest {
        /// Status snapshot JSON (default: nothing open, nobody signed in)
        #[arg(short, long)]
        status: Option<PathBuf>,

        /// Project directory to treat as open; README and launch.json are read from it
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Only show the most urgent step
        #[arg(short, long)]
        best: bool,

        /// Output format (default from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the built-in catalog
    Catalog,

    /// Write the default configuration as TOML
    InitConfig {
        /// Destination (default: .nextstep/config.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let logging_handle = logging::init_logging(&config, cli.debug)?;
    if let Some(path) = &logging_handle.log_file_path {
        eprintln!("Logging to {}", path.display());
    }

    match cli.command {
        Commands::Suggest {
            status,
            project,
            best,
            format,
        } => cmd_suggest(&config, status, project, best, format),
        Commands::Catalog => cmd_catalog(),
        Commands::InitConfig { path } => cmd_init_config(path),
    }
}

fn cmd_suggest(
    config: &Config,
    status_path: Option<PathBuf>,
    project: Option<PathBuf>,
    best: bool,
    format: Option<OutputFormat>,
) -> Result<()> {
    let mut status = match status_path {
        Some(path) => load_status(&path)?,
        None => WholeStatus::default(),
    };

    if let Some(dir) = project {
        attach_project(&mut status, &dir);
    }

    let catalog = Catalog::builtin().context("Built-in catalog is invalid")?;
    let steps: Vec<_> = if best {
        select_best_step(catalog, &status).into_iter().collect()
    } else {
        select_steps(catalog, &status)
    };
    tracing::info!(count = steps.len(), "Selected next steps");

    let options = config.suggestions.render_options();

    let output = match format.unwrap_or(config.suggestions.format) {
        OutputFormat::Markdown => render_markdown(&steps, &options)?,
        OutputFormat::Json => render_json(&steps, &options)?,
    };
    println!("{}", output);

    Ok(())
}

fn cmd_catalog() -> Result<()> {
    let catalog = Catalog::builtin().context("Built-in catalog is invalid")?;

    println!("{:<4} {:<8} Title", "#", "Priority");
    for (index, step) in catalog.steps().iter().enumerate() {
        println!("{:<4} {:<8} {}", index + 1, step.priority, step.title);
    }

    Ok(())
}

fn cmd_init_config(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(Config::local_config_path);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    Config::default().save_to(&path)?;
    println!("Wrote {}", path.display());

    Ok(())
}
