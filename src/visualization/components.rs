//! ECS components for graph visualization.
//!
//! Every entity spawned for a mounted graph carries [`InstanceMember`] so the
//! whole instance can be found and torn down together.

use bevy::prelude::*;
use ulid::Ulid;

use super::session::GraphSession;

/// Identity of one mounted visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub Ulid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Root of a mounted visualizer: the live session plus the entities it
/// renders through.
#[derive(Component)]
pub struct GraphInstance {
    pub id: InstanceId,
    /// Window entity the instance draws into.
    pub mount: Entity,
    /// Camera rendering this instance.
    pub camera: Entity,
    /// Shared tooltip overlay (may be owned by another instance).
    pub tooltip: Entity,
    pub dark_mode: bool,
    pub session: GraphSession,
}

/// Present while the instance's pointer handlers are attached.
#[derive(Component)]
pub struct PointerListeners;

/// Present while the instance's per-frame loop is running.
#[derive(Component)]
pub struct FrameLoop;

/// Tags an entity as belonging to the instance rooted at `.0`.
#[derive(Component, Clone, Copy)]
pub struct InstanceMember(pub Entity);

/// Placed on a mount entity while a visualizer is attached to it.
#[derive(Component, Debug, Clone, Copy)]
pub struct MountedVisualizer {
    pub root: Entity,
    pub id: InstanceId,
}

/// Mesh and material assets allocated for one instance.
#[derive(Component, Default)]
pub struct InstanceAssets {
    pub meshes: Vec<Handle<Mesh>>,
    pub materials: Vec<Handle<StandardMaterial>>,
}

/// Whether an entity can intercept pointer rays.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRole {
    /// Node bodies.
    HitTestable,
    /// Labels, glow shells and other ornaments.
    DecorationOnly,
}

/// Sphere mesh representing a node.
#[derive(Component)]
pub struct NodeBody {
    /// Index in the session graph's node array.
    pub node_idx: usize,
    /// Visual radius of this node.
    pub radius: f32,
}

/// Translucent shell around a node, brightened by glow.
#[derive(Component)]
pub struct GlowShell {
    pub node_idx: usize,
}

/// Sphere a pointer ray is tested against. Only entities whose
/// [`RenderRole`] is `HitTestable` can be picked.
#[derive(Component, Debug, Clone, Copy)]
pub struct PickVolume {
    pub node_idx: usize,
    pub radius: f32,
}

/// Cylinder mesh representing an edge.
#[derive(Component)]
pub struct EdgeLine {
    /// Index in the session graph's edge array.
    pub edge_idx: usize,
}

/// Label component that follows a node in screen space.
#[derive(Component)]
pub struct NodeLabel {
    pub node_idx: usize,
}

/// Orbit/pan/dolly controls attached to an instance camera.
#[derive(Component, Debug, Clone)]
pub struct OrbitControls {
    /// Horizontal rotation angle (radians).
    pub yaw: f32,
    /// Vertical rotation angle (radians).
    pub pitch: f32,
    /// Distance from target.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Off while a node is being dragged.
    pub enabled: bool,
    /// Rotation may be disabled while pan and dolly stay active.
    pub rotate_enabled: bool,
    /// Fraction of pending motion applied per frame.
    pub damping: f32,
    /// Motion queued by input and not yet applied: (yaw, pitch).
    pub pending_rotation: Vec2,
    /// Motion queued by input and not yet applied: target offset.
    pub pending_pan: Vec3,
}

impl OrbitControls {
    pub fn new(distance: f32, rotate_enabled: bool) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            target: Vec3::ZERO,
            enabled: true,
            rotate_enabled,
            damping: 0.25,
            pending_rotation: Vec2::ZERO,
            pending_pan: Vec3::ZERO,
        }
    }
}

/// Process-wide tooltip overlay. Created once, reused by later instances,
/// and removed only by the instance that created it.
#[derive(Component, Debug, Clone, Copy)]
pub struct TooltipOverlay {
    pub key: &'static str,
    pub owner: InstanceId,
}

/// Title line inside the tooltip.
#[derive(Component)]
pub struct TooltipTitle;

/// Body text inside the tooltip.
#[derive(Component)]
pub struct TooltipBody;
