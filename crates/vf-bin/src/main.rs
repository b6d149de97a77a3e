//! Command-line entry: analyze a keystroke transcript and print cheaper
//! alternatives.
//!
//! Takes a start snapshot, an end snapshot, and the sequence the user typed;
//! prints `<sequence> <cost>` lines, best first, or `res is empty`.
//! `RUST_LOG=debug` surfaces the search traces.

mod config;
mod snapshot;

use anyhow::{Context, Result};
use clap::Parser;
use core_text::Position;
use snapshot::load_snapshot;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "vimficiency",
    about = "Suggest lower-effort keystroke sequences for a modal-editor transcript"
)]
struct Cli {
    /// Snapshot of the buffer before the edit.
    start_snapshot: PathBuf,
    /// Snapshot of the buffer after the edit.
    end_snapshot: PathBuf,
    /// The sequence the user actually typed.
    user_sequence: String,

    /// Keyboard layout: uniform, qwerty, colemak-dh.
    #[arg(long)]
    layout: Option<String>,
    /// TOML file with layout/weight/key overrides.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = load_snapshot(&cli.start_snapshot).context("loading start snapshot")?;
    let end = load_snapshot(&cli.end_snapshot).context("loading end snapshot")?;
    tracing::debug!(
        target: "cli",
        start_row = start.row,
        start_col = start.col,
        end_row = end.row,
        end_col = end.col,
        "snapshots loaded"
    );

    let file_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::Config::default(),
    };
    let analyzer = config::build_analyzer(cli.layout.as_deref(), &file_config)?;

    let start_pos = start.lines.clamp(Position::new(start.row, start.col));
    let results = analyzer.analyze_results(
        &start.lines.flatten(),
        start_pos.line,
        start_pos.col,
        &end.lines.flatten(),
        end.row,
        end.col,
        &cli.user_sequence,
    );

    if results.is_empty() {
        println!("res is empty");
    } else {
        for result in &results {
            println!("{} {:.3}", result.flat(), result.key_cost);
        }
    }

    Ok(())
}
