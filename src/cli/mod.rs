//! CLI module for Mindmesh.
//!
//! Subcommands:
//! - `visualize`: Open the interactive 3D graph window
//! - `layout`: Run the load-time layout headlessly and print the result

mod layout;
mod visualize;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use layout::{LayoutCommand, LayoutSummary};
pub use visualize::VisualizeCommand;

use crate::config::Config;
use crate::models::{GraphSnapshot, NodeContentMap};
use crate::source::{load_inputs, FileSource};

/// Mindmesh - Topic Graph Visualizer
#[derive(Parser)]
#[command(name = "mindmesh")]
#[command(about = "Interactive 3D visualizer for conversation topic graphs")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a snapshot in the 3D visualizer
    Visualize(VisualizeCommand),

    /// Resolve the initial layout and print node positions as JSON
    Layout(LayoutCommand),
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Visualize(cmd) => cmd.run().await,
            Command::Layout(cmd) => cmd.run().await,
        }
    }
}

/// Input locations shared by subcommands. Flags override config.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Graph snapshot JSON (chart-style `data` array)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Node listing JSON supplying tooltip content
    #[arg(long)]
    pub nodes: Option<PathBuf>,
}

impl InputArgs {
    /// Resolve the flag or configured paths into a file source.
    pub fn source(&self, config: &Config) -> color_eyre::Result<FileSource> {
        let snapshot = self
            .snapshot
            .clone()
            .or_else(|| config.source.snapshot.clone())
            .ok_or_else(|| {
                color_eyre::eyre::eyre!(
                    "No snapshot given; pass --snapshot or set source.snapshot in config"
                )
            })?;
        let nodes = self.nodes.clone().or_else(|| config.source.nodes.clone());
        Ok(FileSource::new(snapshot, nodes))
    }

    /// Load snapshot and content from the flag or configured paths.
    pub async fn load(
        &self,
        config: &Config,
    ) -> color_eyre::Result<(GraphSnapshot, NodeContentMap)> {
        let source = self.source(config)?;
        let inputs = load_inputs(&source).await?;
        Ok(inputs)
    }
}
