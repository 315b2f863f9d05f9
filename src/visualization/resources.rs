//! ECS resources for graph visualization state.
//!
//! There is one pointer device, so the gesture in progress is global; the
//! instance it applies to is recorded alongside it.

use bevy::prelude::*;

/// What the primary pointer is currently doing.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerGesture {
    /// No button gesture in progress.
    #[default]
    Idle,
    /// Moving a node of the instance rooted at `root`.
    DragNode { root: Entity },
    /// Panning the camera of `root`.
    Pan { root: Entity },
    /// Orbiting the camera of `root`.
    Rotate { root: Entity },
}

impl PointerGesture {
    /// Instance the gesture belongs to, if any.
    pub fn root(&self) -> Option<Entity> {
        match *self {
            PointerGesture::Idle => None,
            PointerGesture::DragNode { root }
            | PointerGesture::Pan { root }
            | PointerGesture::Rotate { root } => Some(root),
        }
    }
}
