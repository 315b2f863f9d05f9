//! Overlap removal for node discs.
//!
//! Two passes share the same pairwise push: the load-time pass relaxes
//! positions in place until no pair overlaps or the iteration ceiling is hit;
//! the post-drag pass runs once and turns each overlapping pair into a pair
//! of elastic bounce animations.

use std::time::Duration;

use bevy::math::{Vec2, Vec3};

use super::graph::TopicGraph;

/// Below this center distance the pair has no usable separation axis.
const MIN_SEPARATION: f32 = 1e-4;
/// Spreads fallback directions for coincident pairs.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Outcome of the load-time layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutReport {
    /// Relaxation passes executed.
    pub iterations: usize,
    /// The final pass found no overlapping pair.
    pub converged: bool,
}

impl LayoutReport {
    /// Stopped at the iteration ceiling with overlap possibly remaining.
    pub fn cap_reached(&self) -> bool {
        !self.converged
    }
}

/// One overlapping pair and where each node should end up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    pub node_a: usize,
    pub node_b: usize,
    pub target_a: Vec3,
    pub target_b: Vec3,
}

/// Displacement applied to `b` (and negated for `a`) when their discs
/// overlap, or `None` if they are at least `radius` apart.
fn push_apart(a: Vec3, b: Vec3, radius: f32, pair: (usize, usize)) -> Option<Vec3> {
    let delta = (b - a).truncate();
    let distance = delta.length();
    if distance >= radius {
        return None;
    }
    let overlap = (radius - distance) / 2.0;
    let dir = if distance > MIN_SEPARATION {
        delta / distance
    } else {
        Vec2::from_angle((pair.0 * 31 + pair.1) as f32 * GOLDEN_ANGLE)
    };
    Some((dir * overlap).extend(0.0))
}

/// Relax node positions until no two centers are closer than `radius`,
/// running at most `max_iterations` passes. Residual overlap after the cap
/// is accepted. Edge segments are recomputed from the final positions.
pub fn resolve_initial_overlaps(
    graph: &mut TopicGraph,
    radius: f32,
    max_iterations: usize,
) -> LayoutReport {
    let n = graph.nodes.len();
    let mut iterations = 0;
    let mut has_collision = n > 1;

    while has_collision && iterations < max_iterations {
        has_collision = false;
        for i in 0..n {
            for j in (i + 1)..n {
                let a = graph.nodes[i].position;
                let b = graph.nodes[j].position;
                if let Some(push) = push_apart(a, b, radius, (i, j)) {
                    graph.nodes[i].position -= push;
                    graph.nodes[j].position += push;
                    has_collision = true;
                }
            }
        }
        iterations += 1;
    }

    graph.refresh_edges();

    let report = LayoutReport {
        iterations,
        converged: !has_collision,
    };
    if report.cap_reached() {
        tracing::warn!(iterations, nodes = n, "Initial layout hit iteration cap");
    } else {
        tracing::debug!(iterations, nodes = n, "Initial layout converged");
    }
    report
}

/// Single pairwise overlap check against current positions. Positions are
/// not modified; each overlapping pair yields independent targets.
pub fn plan_separation(graph: &TopicGraph, radius: f32) -> Vec<Separation> {
    let n = graph.nodes.len();
    let mut plan = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let a = graph.nodes[i].position;
            let b = graph.nodes[j].position;
            if let Some(push) = push_apart(a, b, radius, (i, j)) {
                plan.push(Separation {
                    node_a: i,
                    node_b: j,
                    target_a: a - push,
                    target_b: b + push,
                });
            }
        }
    }
    plan
}

/// Elastic ease-out: `2^(-10t) · sin((10t − 0.75) · 2π/3) + 1`, pinned to
/// 0 and 1 at the ends.
pub fn ease_out_elastic(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c4 = (2.0 * std::f32::consts::PI) / 3.0;
    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

/// An in-flight animation moving one node toward a target.
#[derive(Debug, Clone)]
pub struct Bounce {
    pub node_idx: usize,
    pub from: Vec3,
    pub to: Vec3,
    pub elapsed: Duration,
    pub duration: Duration,
}

impl Bounce {
    pub fn new(node_idx: usize, from: Vec3, to: Vec3, duration: Duration) -> Self {
        Self {
            node_idx,
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Step the animation and write the eased position. Returns `true` once
    /// finished. A node index that no longer exists finishes immediately.
    pub fn advance(&mut self, dt: Duration, graph: &mut TopicGraph) -> bool {
        self.elapsed += dt;
        let Some(node) = graph.nodes.get_mut(self.node_idx) else {
            return true;
        };

        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON);
        if t < 1.0 {
            node.position = self.from.lerp(self.to, ease_out_elastic(t));
            false
        } else {
            node.position = self.to;
            true
        }
    }
}

/// Build both animations for every planned pair.
pub fn bounces_for(plan: &[Separation], graph: &TopicGraph, duration: Duration) -> Vec<Bounce> {
    plan.iter()
        .flat_map(|s| {
            [
                Bounce::new(s.node_a, graph.nodes[s.node_a].position, s.target_a, duration),
                Bounce::new(s.node_b, graph.nodes[s.node_b].position, s.target_b, duration),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GraphSnapshot, NodeContentMap};

    fn graph_from_points(points: &[(f64, f64)], scale: f32) -> TopicGraph {
        let xs: Vec<String> = points.iter().map(|p| p.0.to_string()).collect();
        let ys: Vec<String> = points.iter().map(|p| p.1.to_string()).collect();
        let raw = format!(
            r#"{{"data": [{{"mode": "markers", "x": [{}], "y": [{}]}}]}}"#,
            xs.join(","),
            ys.join(",")
        );
        let snapshot = GraphSnapshot::from_json(&raw).unwrap();
        TopicGraph::from_snapshot(&snapshot, &NodeContentMap::new(), scale)
    }

    fn min_distance(graph: &TopicGraph) -> f32 {
        let mut min = f32::INFINITY;
        for i in 0..graph.nodes.len() {
            for j in (i + 1)..graph.nodes.len() {
                min = min.min(graph.nodes[i].position.distance(graph.nodes[j].position));
            }
        }
        min
    }

    #[test]
    fn test_ease_out_elastic_endpoints() {
        assert_eq!(ease_out_elastic(0.0), 0.0);
        assert_eq!(ease_out_elastic(1.0), 1.0);
        assert_eq!(ease_out_elastic(-0.5), 0.0);
        assert_eq!(ease_out_elastic(1.5), 1.0);
        // Overshoots past the target before settling.
        let peak = (1..100)
            .map(|i| ease_out_elastic(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
        assert!((ease_out_elastic(0.99) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_close_pair_separates_to_radius() {
        // A(0,0) and B(0.1,0) land 1 scene unit apart.
        let mut graph = graph_from_points(&[(0.0, 0.0), (0.1, 0.0)], 10.0);

        let report = resolve_initial_overlaps(&mut graph, 3.5, 50);

        let distance = graph.nodes[0].position.distance(graph.nodes[1].position);
        assert!(distance >= 3.5 - 1e-4 || report.iterations == 50);
        assert!(report.converged);
        assert!(graph.nodes.iter().all(|n| n.position.z == 0.0));
    }

    #[test]
    fn test_coincident_nodes_separate() {
        let mut graph = graph_from_points(&[(0.2, 0.2), (0.2, 0.2), (0.2, 0.2)], 10.0);

        let report = resolve_initial_overlaps(&mut graph, 3.5, 50);

        assert!(report.converged || report.iterations == 50);
        assert!(min_distance(&graph) > 1.0);
    }

    #[test]
    fn test_cap_reached_is_recorded() {
        let points: Vec<(f64, f64)> = (0..12).map(|i| (i as f64 * 0.01, 0.0)).collect();
        let mut graph = graph_from_points(&points, 10.0);

        let report = resolve_initial_overlaps(&mut graph, 3.5, 1);

        assert_eq!(report.iterations, 1);
        assert!(report.cap_reached());
    }

    #[test]
    fn test_layout_property_holds_for_dense_graph() {
        let points: Vec<(f64, f64)> = (0..20)
            .map(|i| ((i % 5) as f64 * 0.12, (i / 5) as f64 * 0.12))
            .collect();
        let mut graph = graph_from_points(&points, 10.0);

        let report = resolve_initial_overlaps(&mut graph, 3.5, 50);

        assert!(min_distance(&graph) >= 3.5 - 1e-3 || report.cap_reached());
    }

    #[test]
    fn test_plan_separation_leaves_positions_untouched() {
        let graph = graph_from_points(&[(0.0, 0.0), (0.3, 0.0), (5.0, 5.0)], 10.0);

        let plan = plan_separation(&graph, 5.0);

        assert_eq!(plan.len(), 1);
        let s = plan[0];
        assert_eq!((s.node_a, s.node_b), (0, 1));
        assert!((s.target_a.distance(s.target_b) - 5.0).abs() < 1e-4);
        assert_eq!(graph.nodes[0].position, Vec3::ZERO);
    }

    #[test]
    fn test_bounce_reaches_target() {
        let mut graph = graph_from_points(&[(0.0, 0.0)], 10.0);
        let target = Vec3::new(2.0, 0.0, 0.0);
        let mut bounce = Bounce::new(0, Vec3::ZERO, target, Duration::from_millis(600));

        assert!(!bounce.advance(Duration::from_millis(300), &mut graph));
        assert_ne!(graph.nodes[0].position, Vec3::ZERO);
        assert!(bounce.advance(Duration::from_millis(300), &mut graph));
        assert_eq!(graph.nodes[0].position, target);
    }

    #[test]
    fn test_bounce_on_missing_node_is_harmless() {
        let mut graph = TopicGraph::default();
        let mut bounce = Bounce::new(4, Vec3::ZERO, Vec3::ONE, Duration::from_millis(600));
        assert!(bounce.advance(Duration::from_millis(16), &mut graph));
    }
}
