//! Visualize subcommand - open a snapshot in the 3D window.

use clap::Parser;
use tokio::sync::oneshot;

use super::InputArgs;
use crate::config::Config;
use crate::models::NodeContentMap;
use crate::source::{load_content, GraphSource};
use crate::visualization::{run_visualizer, HostState};

/// Open a graph snapshot in the interactive visualizer.
#[derive(Parser)]
pub struct VisualizeCommand {
    #[command(flatten)]
    pub input: InputArgs,

    /// Use the light palette
    #[arg(long)]
    pub light: bool,

    /// Allow orbiting with the right mouse button
    #[arg(long)]
    pub rotate: bool,

    /// Enable HDR bloom post-processing
    #[arg(long)]
    pub bloom: bool,
}

impl VisualizeCommand {
    /// Run the visualize command. Blocks until the window is closed.
    pub async fn run(self) -> color_eyre::Result<()> {
        let mut config = Config::load()?;
        if self.light {
            config.visualizer.dark_mode = false;
        }
        config.visualizer.rotate |= self.rotate;
        config.visualizer.bloom |= self.bloom;

        // The window opens on the snapshot; the listing follows when ready.
        let source = self.input.source(&config)?;
        let snapshot = source.snapshot().await?;
        let (sender, receiver) = oneshot::channel();
        tokio::spawn(async move {
            let content = load_content(&source).await;
            if sender.send(content).is_err() {
                tracing::debug!("Visualizer closed before the node listing arrived");
            }
        });

        tracing::info!(
            series = snapshot.data.len(),
            dark_mode = config.visualizer.dark_mode,
            "Opening visualizer"
        );

        let host = HostState::new(snapshot, NodeContentMap::new(), config.visualizer.clone())
            .with_pending_content(receiver);
        run_visualizer(host, &config);
        Ok(())
    }
}
