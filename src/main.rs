mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use app::NameExplorerApp;
use clap::Parser;
use eframe::egui;

use data::filter::MatchMode;
use state::{AppState, Selections};

/// Explore how given-name popularity changes over time.
#[derive(Debug, Parser)]
#[command(name = "name-explorer", version)]
struct Cli {
    /// Name table to load (.csv.gz, .csv, .parquet or .json)
    #[arg(env = "NAME_EXPLORER_DATA", default_value = "names.csv.gz")]
    dataset: PathBuf,

    /// Initial search pattern
    #[arg(long, default_value = "John")]
    pattern: String,

    /// Treat the initial pattern as a regular expression
    #[arg(long)]
    regex: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = data::loader::load_file(&cli.dataset)
        .inspect_err(|e| log::error!("Failed to load {}: {e}", cli.dataset.display()))
        .with_context(|| format!("loading dataset {}", cli.dataset.display()))?;
    log::info!("Loaded {} rows from {}", dataset.len(), cli.dataset.display());
    let index = data::index::build_index(&dataset);

    let selections = Selections {
        pattern: cli.pattern,
        mode: if cli.regex {
            MatchMode::Regex
        } else {
            MatchMode::Literal
        },
        ..Selections::default()
    };
    let state = AppState::new(dataset, index, selections);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Name Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(NameExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow!("failed to open window: {e}"))
}
