//! CLI tool for cardgen - lays out user-story cards and writes the workbook
//!
//! Usage:
//!   cardgen_cli <input.xlsx>                       # writes output/output.xlsx
//!   cardgen_cli <input.xlsx> -o cards.xlsx         # writes output/cards.xlsx
//!   cardgen_cli <input.xlsx> --output-dir out --config layout.json

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use cardgen::logging::init_logging;
use cardgen::pipeline::run;
use cardgen::{Document, LayoutOptions};

#[derive(Debug, Parser)]
#[command(name = "cardgen_cli", version, about = "Lay out printable user-story cards")]
struct Cli {
    /// Workbook holding the "US Template", "US Data" and "Feature Data" sheets
    input: PathBuf,

    /// File name of the generated workbook
    #[arg(short, long, default_value = "output.xlsx")]
    output: String,

    /// Directory the generated workbook is written into
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// JSON file overriding layout options
    #[arg(long, value_name = "FILE.json")]
    config: Option<PathBuf>,

    /// One of error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let options = match &cli.config {
        Some(path) => LayoutOptions::from_path(path)
            .with_context(|| format!("reading layout options from {}", path.display()))?,
        None => LayoutOptions::default(),
    };

    let mut document = Document::open_path(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let report = run(&mut document, &options)
        .with_context(|| format!("generating cards from {}", cli.input.display()))?;

    let output_path = prepare_output_file(&cli.output_dir, &cli.output)?;
    document
        .save_to_path(&output_path)
        .with_context(|| format!("writing {}", output_path.display()))?;
    log::info!("Time at which file was generated: {}", chrono::Local::now());

    let summary = json!({
        "output": output_path.display().to_string(),
        "report": report,
    });
    println!("{summary}");
    Ok(())
}

/// Create `dir` if needed and clear any previous file at `dir/name`.
fn prepare_output_file(dir: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    if path.exists() {
        fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
    }
    Ok(path)
}
