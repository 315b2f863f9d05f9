//! Layout subcommand - resolve initial overlaps and print the result.

use clap::Parser;
use serde::Serialize;

use super::InputArgs;
use crate::config::{Config, VisualizerConfig};
use crate::models::{GraphSnapshot, NodeContentMap};
use crate::visualization::{GraphSession, TopicGraph};

/// Run the load-time layout pass without opening a window.
#[derive(Parser)]
pub struct LayoutCommand {
    #[command(flatten)]
    pub input: InputArgs,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Result of the headless layout pass.
#[derive(Debug, Serialize)]
pub struct LayoutSummary {
    pub iterations: usize,
    pub converged: bool,
    pub nodes: Vec<NodePlacement>,
    /// Edges as `[start_id, end_id]`.
    pub edges: Vec<[String; 2]>,
}

#[derive(Debug, Serialize)]
pub struct NodePlacement {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
}

impl LayoutSummary {
    /// Map the snapshot and run the initial collision pass.
    pub fn compute(
        snapshot: &GraphSnapshot,
        content: &NodeContentMap,
        config: &VisualizerConfig,
    ) -> Self {
        let graph = TopicGraph::from_snapshot(snapshot, content, config.position_scale);
        let session = GraphSession::new(graph, config.clone());
        let report = session.layout_report();
        let graph = &session.graph;

        Self {
            iterations: report.iterations,
            converged: report.converged,
            nodes: graph
                .nodes
                .iter()
                .map(|n| NodePlacement {
                    id: n.id.clone(),
                    label: n.label.clone(),
                    x: n.position.x,
                    y: n.position.y,
                })
                .collect(),
            edges: graph
                .edges
                .iter()
                .map(|e| [graph.nodes[e.start].id.clone(), graph.nodes[e.end].id.clone()])
                .collect(),
        }
    }
}

impl LayoutCommand {
    /// Run the layout command.
    pub async fn run(self) -> color_eyre::Result<()> {
        let config = Config::load()?;
        let (snapshot, content) = self.input.load(&config).await?;

        let summary = LayoutSummary::compute(&snapshot, &content, &config.visualizer);
        if !summary.converged {
            tracing::warn!(
                iterations = summary.iterations,
                "Layout stopped at the iteration cap with overlaps remaining"
            );
        }

        let json = if self.pretty {
            serde_json::to_string_pretty(&summary)?
        } else {
            serde_json::to_string(&summary)?
        };
        println!("{json}");
        Ok(())
    }
}
