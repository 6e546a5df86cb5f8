// src/bin/srcvet.rs
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;

use srcvet_core::config::Config;
use srcvet_core::engine::Engine;
use srcvet_core::report::{self, Format};

#[derive(Parser)]
#[command(name = "srcvet")]
#[command(about = "Static code-quality analysis: structural metrics and risk patterns")]
#[command(version)]
struct Cli {
    /// Files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Path to a .srcvetrc config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Markdown => Self::Markdown,
            OutputFormat::Json => Self::Json,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let engine = Engine::new(config);
    let report = engine.scan(&cli.files);

    let rendered = report::render(&report, cli.format.into())?;
    match &cli.output {
        Some(path) => fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }

    // High-severity or parse-error issues fail the run.
    if report.has_blocking_issues() {
        process::exit(1);
    }
    Ok(())
}
