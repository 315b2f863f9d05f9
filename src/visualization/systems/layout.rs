//! Per-frame layout advance and transform sync.

use bevy::prelude::*;

use crate::visualization::components::{
    EdgeLine, FrameLoop, GlowShell, GraphInstance, InstanceMember, NodeBody,
};

/// Transform placing a unit-height cylinder along `segment`.
pub fn edge_transform(segment: [Vec3; 2]) -> Transform {
    let [from, to] = segment;
    let direction = to - from;
    let length = direction.length();
    let rotation = if length > 1e-4 {
        Quat::from_rotation_arc(Vec3::Y, direction / length)
    } else {
        Quat::IDENTITY
    };
    Transform::from_translation((from + to) / 2.0)
        .with_rotation(rotation)
        .with_scale(Vec3::new(1.0, length, 1.0))
}

/// Advance every running session by the frame delta: settle timer, bounce
/// animations and the edge refresh.
pub fn advance_sessions_system(
    time: Res<Time>,
    mut instances: Query<&mut GraphInstance, With<FrameLoop>>,
) {
    let dt = time.delta();
    for mut instance in instances.iter_mut() {
        instance.session.advance(dt);
    }
}

/// Copy session positions onto node, shell and edge transforms.
pub fn sync_graph_transforms_system(
    instances: Query<&GraphInstance, With<FrameLoop>>,
    mut node_query: Query<
        (&mut Transform, &NodeBody, &InstanceMember),
        (Without<GlowShell>, Without<EdgeLine>),
    >,
    mut shell_query: Query<
        (&mut Transform, &GlowShell, &InstanceMember),
        (Without<NodeBody>, Without<EdgeLine>),
    >,
    mut edge_query: Query<
        (&mut Transform, &EdgeLine, &InstanceMember),
        (Without<NodeBody>, Without<GlowShell>),
    >,
) {
    for (mut transform, body, member) in node_query.iter_mut() {
        let Ok(instance) = instances.get(member.0) else {
            continue;
        };
        if let Some(node) = instance.session.graph.nodes.get(body.node_idx) {
            transform.translation = node.position;
        }
    }

    for (mut transform, shell, member) in shell_query.iter_mut() {
        let Ok(instance) = instances.get(member.0) else {
            continue;
        };
        if let Some(node) = instance.session.graph.nodes.get(shell.node_idx) {
            transform.translation = node.position;
        }
    }

    for (mut transform, line, member) in edge_query.iter_mut() {
        let Ok(instance) = instances.get(member.0) else {
            continue;
        };
        if let Some(edge) = instance.session.graph.edges.get(line.edge_idx) {
            *transform = edge_transform(edge.segment);
        }
    }
}
