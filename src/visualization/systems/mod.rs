//! ECS systems for graph visualization.
//!
//! Systems are functions that operate on components and resources each frame.

pub mod camera;
pub mod interaction;
pub mod layout;
pub mod ui;

pub use camera::camera_control_system;
pub use interaction::{drag_node_system, hover_system};
pub use layout::{advance_sessions_system, sync_graph_transforms_system};
pub use ui::{update_glow_system, update_labels_system, update_tooltip_system};
