//! Interaction state for one mounted graph.
//!
//! `GraphSession` owns the graph and everything pointer input can change:
//! hover, the active drag, the post-drag settle timer and running bounce
//! animations. ECS systems translate window input into calls here; nothing
//! in this module reads input or touches the render world.

use std::time::Duration;

use bevy::math::{Ray3d, Vec3};
use bevy::time::{Timer, TimerMode};

use super::components::RenderRole;
use super::effects::SceneClock;
use super::graph::TopicGraph;
use super::layout::{bounces_for, plan_separation, resolve_initial_overlaps, Bounce, LayoutReport};
use crate::config::VisualizerConfig;

/// Text shown in the floating tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub label: String,
    pub content: String,
}

/// A sphere that may intercept a pointer ray.
#[derive(Debug, Clone, Copy)]
pub struct PickTarget {
    pub node_idx: usize,
    pub center: Vec3,
    pub radius: f32,
    pub role: RenderRole,
}

/// Nearest hit-testable node along `ray`. Decoration targets never hit.
pub fn pick_node(ray: Ray3d, targets: impl IntoIterator<Item = PickTarget>) -> Option<usize> {
    let dir = *ray.direction;
    let mut closest: Option<(usize, f32)> = None;

    for target in targets {
        if target.role != RenderRole::HitTestable {
            continue;
        }
        let to_center = target.center - ray.origin;
        let along = to_center.dot(dir);
        let miss_sq = to_center.length_squared() - along * along;
        let radius_sq = target.radius * target.radius;
        if miss_sq > radius_sq {
            continue;
        }
        let t = along - (radius_sq - miss_sq).sqrt();
        if t < 0.0 {
            continue;
        }
        if closest.map_or(true, |(_, best)| t < best) {
            closest = Some((target.node_idx, t));
        }
    }

    closest.map(|(idx, _)| idx)
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    node_idx: usize,
    /// Node center minus the grab point, so the node does not jump.
    grab_offset: Vec3,
}

/// Graph plus interaction state for one visualizer instance.
#[derive(Debug)]
pub struct GraphSession {
    pub graph: TopicGraph,
    config: VisualizerConfig,
    layout_report: LayoutReport,
    hovered: Option<usize>,
    drag: Option<ActiveDrag>,
    settle: Option<Timer>,
    bounces: Vec<Bounce>,
    clock: SceneClock,
}

impl GraphSession {
    /// Take ownership of a freshly mapped graph and run the load-time
    /// layout pass before anything is drawn.
    pub fn new(mut graph: TopicGraph, config: VisualizerConfig) -> Self {
        let layout_report = resolve_initial_overlaps(
            &mut graph,
            config.initial_collision_radius,
            config.max_layout_iterations,
        );
        Self {
            graph,
            config,
            layout_report,
            hovered: None,
            drag: None,
            settle: None,
            bounces: Vec::new(),
            clock: SceneClock::default(),
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn layout_report(&self) -> LayoutReport {
        self.layout_report
    }

    pub fn clock(&self) -> SceneClock {
        self.clock
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Update hover target. Returns `true` if it changed.
    pub fn hover(&mut self, node_idx: Option<usize>) -> bool {
        let node_idx = node_idx.filter(|&i| i < self.graph.nodes.len());
        if node_idx == self.hovered {
            return false;
        }
        self.hovered = node_idx;
        self.graph.set_hover(node_idx);
        true
    }

    /// Tooltip for the hovered node; hidden while dragging.
    pub fn tooltip(&self) -> Option<TooltipContent> {
        if self.drag.is_some() {
            return None;
        }
        let node = self.graph.nodes.get(self.hovered?)?;
        Some(TooltipContent {
            label: node.label.clone(),
            content: node.content().to_string(),
        })
    }

    pub fn dragged(&self) -> Option<usize> {
        self.drag.map(|d| d.node_idx)
    }

    /// Start dragging `node_idx`, grabbed at `grab_point` on the z = 0 plane.
    ///
    /// A pending settle pass is cancelled and any bounce still moving the
    /// node is dropped so the pointer owns its position.
    pub fn begin_drag(&mut self, node_idx: usize, grab_point: Vec3) -> bool {
        let Some(node) = self.graph.nodes.get(node_idx) else {
            return false;
        };
        let grab_offset = (node.position - grab_point).truncate().extend(0.0);
        self.drag = Some(ActiveDrag {
            node_idx,
            grab_offset,
        });
        self.settle = None;
        self.bounces.retain(|b| b.node_idx != node_idx);
        tracing::debug!(node = node_idx, "Drag started");
        true
    }

    /// Move the dragged node to follow `pointer`; `z` stays 0.
    pub fn drag_to(&mut self, pointer: Vec3) {
        let Some(drag) = self.drag else {
            return;
        };
        let Some(node) = self.graph.nodes.get_mut(drag.node_idx) else {
            return;
        };
        let target = pointer + drag.grab_offset;
        node.position = Vec3::new(target.x, target.y, 0.0);
        self.graph.refresh_incident_edges(drag.node_idx);
    }

    /// Release the drag and arm the settle timer. Returns the released node.
    pub fn end_drag(&mut self) -> Option<usize> {
        let drag = self.drag.take()?;
        self.settle = Some(Timer::new(self.config.settle_delay(), TimerMode::Once));
        tracing::debug!(node = drag.node_idx, "Drag ended");
        Some(drag.node_idx)
    }

    pub fn settle_pending(&self) -> bool {
        self.settle.is_some()
    }

    pub fn bounces(&self) -> &[Bounce] {
        &self.bounces
    }

    /// Advance one frame: clock, settle timer, bounces, then the
    /// authoritative edge refresh.
    ///
    /// Bounces started by a settle pass that fires mid-frame only advance by
    /// the part of `dt` after the timer ran out.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt.as_secs_f32());

        let overflow = match &mut self.settle {
            Some(timer) => {
                let remaining = timer.remaining();
                timer
                    .tick(dt)
                    .finished()
                    .then(|| dt.saturating_sub(remaining))
            }
            None => None,
        };

        let graph = &mut self.graph;
        self.bounces.retain_mut(|bounce| !bounce.advance(dt, graph));

        if let Some(overflow) = overflow {
            self.settle = None;
            let mut started = self.start_settle();
            let graph = &mut self.graph;
            started.retain_mut(|bounce| !bounce.advance(overflow, graph));
            self.bounces.extend(started);
        }

        self.graph.refresh_edges();
    }

    fn start_settle(&mut self) -> Vec<Bounce> {
        let plan = plan_separation(&self.graph, self.config.settle_collision_radius);
        if plan.is_empty() {
            return Vec::new();
        }
        tracing::debug!(pairs = plan.len(), "Separating overlaps after drag");
        bounces_for(&plan, &self.graph, self.config.bounce_duration())
    }
}
