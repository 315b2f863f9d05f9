//! 3D Topic Graph Visualization Module
//!
//! Renders a topic graph snapshot as an interactive node-link scene using
//! Bevy: collision layout at load, draggable nodes that bounce apart when
//! released on top of each other, hover highlighting with a tooltip, and
//! pulsing glow on the hovered neighbourhood.
//!
//! ## Module Structure
//!
//! - `graph` - Topic nodes/edges and the snapshot mapper
//! - `layout` - Collision resolution and elastic bounce animation
//! - `session` - Per-instance interaction state (hover, drag, settle)
//! - `effects` - Glow and pulse parameters
//! - `lifecycle` - Mount, cleanup, and the shared tooltip
//! - `components` - ECS components for instances, nodes, edges, labels
//! - `resources` - ECS resources for pointer state
//! - `systems` - ECS systems (camera, interaction, layout, UI)
//! - `setup` - Scene initialization
//! - `plugin` - Bevy plugin definition
//! - `host` - Desktop window host
//! - `constants` - Colors, sizes, and other constants

pub mod components;
pub mod constants;
pub mod effects;
pub mod graph;
mod host;
pub mod layout;
mod lifecycle;
mod plugin;
pub mod resources;
pub mod session;
mod setup;
pub mod systems;

pub use graph::{HighlightState, TopicEdge, TopicGraph, TopicNode};
pub use host::{HostPlugin, HostState};
pub use layout::LayoutReport;
pub use lifecycle::{
    ensure_tooltip, mount_visualizer, try_mount, VisualizerHandle, VisualizerRequest, TOOLTIP_KEY,
};
pub use plugin::{VisualizationPlugin, VisualizerSet};
pub use session::{GraphSession, TooltipContent};

use bevy::log::LogPlugin;
use bevy::prelude::*;

use crate::config::Config;

/// Run the visualizer from a prepared host state.
///
/// This opens a Bevy window with the 3D graph visualization and blocks
/// until the window is closed. Logging stays with the process-wide tracing
/// subscriber, so Bevy's own log plugin is disabled.
pub fn run_visualizer(host: HostState, config: &Config) {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.window.title.clone(),
                        resolution: (config.window.width, config.window.height).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<LogPlugin>(),
        )
        .add_plugins(VisualizationPlugin)
        .add_plugins(HostPlugin::new(host))
        .run();
}
