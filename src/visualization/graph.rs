//! Topic graph entities and the snapshot mapper.

use bevy::color::Color;
use bevy::math::Vec3;

use super::constants::COLOR_NODE_DEFAULT;
use crate::models::{GraphSnapshot, NodeContentMap, CONTENT_PLACEHOLDER};

/// Per-node and per-edge highlight mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HighlightState {
    /// Nothing hovered nearby.
    #[default]
    Default,
    /// Under the pointer (or, for edges, incident to the hovered node).
    Hovered,
    /// Connected by an edge to the hovered node.
    Adjacent,
}

impl HighlightState {
    pub fn is_highlighted(self) -> bool {
        !matches!(self, HighlightState::Default)
    }
}

/// A topic vertex.
#[derive(Debug, Clone)]
pub struct TopicNode {
    /// Unique node ID.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Supplementary text; `None` until supplied.
    pub content: Option<String>,
    /// Scene position. `z` stays 0 at rest.
    pub position: Vec3,
    /// Color shown while not highlighted.
    pub base_color: Color,
    /// Current highlight state.
    pub state: HighlightState,
}

impl TopicNode {
    /// Content text, or the placeholder if none was supplied.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or(CONTENT_PLACEHOLDER)
    }
}

/// A connector between two nodes of the same graph.
#[derive(Debug, Clone)]
pub struct TopicEdge {
    /// Index of the start node.
    pub start: usize,
    /// Index of the end node.
    pub end: usize,
    /// Rendered line segment, derived from the endpoint positions.
    pub segment: [Vec3; 2],
    /// Current highlight state.
    pub state: HighlightState,
}

/// Nodes and edges of one loaded snapshot.
#[derive(Debug, Clone, Default)]
pub struct TopicGraph {
    pub nodes: Vec<TopicNode>,
    pub edges: Vec<TopicEdge>,
}

impl TopicGraph {
    /// Map a chart-style snapshot to typed nodes and edges.
    ///
    /// Edge endpoints are resolved by nearest-node search rather than by
    /// index: the points and lines series are generated independently and
    /// carry no shared ids, so each segment end is attached to the node with
    /// the smallest squared distance. This is a best-effort heuristic; a
    /// payload with explicit endpoint ids would make it unnecessary.
    pub fn from_snapshot(snapshot: &GraphSnapshot, content: &NodeContentMap, scale: f32) -> Self {
        let mut nodes = Vec::new();

        if let Some(points) = snapshot.points() {
            for (i, (x, y)) in points.x.iter().zip(&points.y).enumerate() {
                let (Some(x), Some(y)) = (x, y) else {
                    tracing::warn!(index = i, "Skipping point without coordinates");
                    continue;
                };
                let id = points.ids.get(i).cloned().unwrap_or_else(|| i.to_string());
                let label = points
                    .text
                    .get(i)
                    .cloned()
                    .flatten()
                    .unwrap_or_else(|| id.clone());

                nodes.push(TopicNode {
                    content: content.get(&id).map(str::to_string),
                    id,
                    label,
                    position: Vec3::new(*x as f32 * scale, *y as f32 * scale, 0.0),
                    base_color: COLOR_NODE_DEFAULT,
                    state: HighlightState::Default,
                });
            }
        }

        let mut edges = Vec::new();
        if let Some(lines) = snapshot.lines() {
            // Every run of three samples is (start, end, gap marker).
            for i in (0..lines.x.len()).step_by(3) {
                let start = sample(&lines.x, &lines.y, i, scale);
                let end = sample(&lines.x, &lines.y, i + 1, scale);
                let (Some(start), Some(end)) = (start, end) else {
                    continue;
                };
                let (Some(start), Some(end)) = (nearest(&nodes, start), nearest(&nodes, end))
                else {
                    continue;
                };
                edges.push(TopicEdge {
                    start,
                    end,
                    segment: [nodes[start].position, nodes[end].position],
                    state: HighlightState::Default,
                });
            }
        }

        tracing::debug!(nodes = nodes.len(), edges = edges.len(), "Mapped snapshot");
        Self { nodes, edges }
    }

    /// Indices of nodes sharing an edge with `idx`.
    pub fn neighbors(&self, idx: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.start == idx {
                    Some(e.end)
                } else if e.end == idx {
                    Some(e.start)
                } else {
                    None
                }
            })
            .filter(|&n| n != idx)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Recompute every edge segment from current node positions.
    pub fn refresh_edges(&mut self) {
        for edge in &mut self.edges {
            if let (Some(a), Some(b)) = (self.nodes.get(edge.start), self.nodes.get(edge.end)) {
                edge.segment = [a.position, b.position];
            }
        }
    }

    /// Recompute only the edges touching `idx`.
    pub fn refresh_incident_edges(&mut self, idx: usize) {
        for edge in &mut self.edges {
            if edge.start != idx && edge.end != idx {
                continue;
            }
            if let (Some(a), Some(b)) = (self.nodes.get(edge.start), self.nodes.get(edge.end)) {
                edge.segment = [a.position, b.position];
            }
        }
    }

    /// Mark `hovered` and its neighbors highlighted; reset everything else.
    pub fn set_hover(&mut self, hovered: Option<usize>) {
        let hovered = hovered.filter(|&h| h < self.nodes.len());
        let adjacent = hovered.map(|h| self.neighbors(h)).unwrap_or_default();

        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.state = if Some(i) == hovered {
                HighlightState::Hovered
            } else if adjacent.binary_search(&i).is_ok() {
                HighlightState::Adjacent
            } else {
                HighlightState::Default
            };
        }

        for edge in &mut self.edges {
            let incident = hovered.is_some_and(|h| edge.start == h || edge.end == h);
            edge.state = if incident {
                HighlightState::Hovered
            } else {
                HighlightState::Default
            };
        }
    }

    /// Attach content that arrived after the graph was built.
    pub fn supply_content(&mut self, content: &NodeContentMap) {
        for node in &mut self.nodes {
            if let Some(text) = content.get(&node.id) {
                node.content = Some(text.to_string());
            }
        }
    }

    /// Centroid and enclosing radius of all nodes.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        if self.nodes.is_empty() {
            return (Vec3::ZERO, 1.0);
        }
        let center: Vec3 =
            self.nodes.iter().map(|n| n.position).sum::<Vec3>() / self.nodes.len() as f32;
        let max_dist = self
            .nodes
            .iter()
            .map(|n| (n.position - center).length())
            .fold(0.0_f32, f32::max);
        (center, max_dist + 2.0)
    }
}

fn sample(xs: &[Option<f64>], ys: &[Option<f64>], i: usize, scale: f32) -> Option<Vec3> {
    let x = (*xs.get(i)?)?;
    let y = (*ys.get(i)?)?;
    Some(Vec3::new(x as f32 * scale, y as f32 * scale, 0.0))
}

fn nearest(nodes: &[TopicNode], point: Vec3) -> Option<usize> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let d = n.position.truncate() - point.truncate();
            (i, d.length_squared())
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
