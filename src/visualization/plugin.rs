//! Visualization plugin for Bevy.

use bevy::prelude::*;

use super::resources::PointerGesture;
use super::systems;

/// Per-frame phases, run in declaration order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum VisualizerSet {
    /// Pointer and wheel input.
    Input,
    /// Settle timers and bounce animations.
    Layout,
    /// Session state copied onto transforms.
    Sync,
    /// Materials, labels and the tooltip.
    Effects,
}

/// Plugin that drives every mounted graph instance.
///
/// Instances themselves are created with
/// [`mount_visualizer`](super::mount_visualizer); this plugin only supplies
/// the systems that run them.
pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerGesture>()
            .configure_sets(
                Update,
                (
                    VisualizerSet::Input,
                    VisualizerSet::Layout,
                    VisualizerSet::Sync,
                    VisualizerSet::Effects,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    systems::camera_control_system,
                    systems::drag_node_system,
                    systems::hover_system,
                )
                    .chain()
                    .in_set(VisualizerSet::Input),
            )
            .add_systems(
                Update,
                systems::advance_sessions_system.in_set(VisualizerSet::Layout),
            )
            .add_systems(
                Update,
                systems::sync_graph_transforms_system.in_set(VisualizerSet::Sync),
            )
            .add_systems(
                Update,
                (
                    systems::update_glow_system,
                    systems::update_labels_system,
                    systems::update_tooltip_system,
                )
                    .in_set(VisualizerSet::Effects),
            );
    }
}
