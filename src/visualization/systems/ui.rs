//! UI systems for labels, the tooltip, and glow effects.

use bevy::prelude::*;
use bevy::ui::{Node as UiNode, TargetCamera};

use crate::visualization::components::{
    EdgeLine, FrameLoop, GlowShell, GraphInstance, InstanceMember, NodeBody, NodeLabel,
    PointerListeners, TooltipBody, TooltipOverlay, TooltipTitle,
};
use crate::visualization::constants::{tooltip_palette, COLOR_EDGE, LABEL_OFFSET};
use crate::visualization::effects::{
    edge_glow, emissive, node_color, node_glow, ACTIVE_GLOW, PULSE_AMPLITUDE,
};

/// Cursor offset for the tooltip box, in logical pixels.
const TOOLTIP_OFFSET: Vec2 = Vec2::new(12.0, 12.0);
/// Peak opacity of a glow shell.
const SHELL_MAX_ALPHA: f32 = 0.35;

/// Update label positions by projecting 3D node positions to screen space.
pub fn update_labels_system(
    instances: Query<&GraphInstance, With<FrameLoop>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut label_query: Query<(&mut UiNode, &mut Visibility, &NodeLabel, &InstanceMember)>,
) {
    for (mut node_ui, mut visibility, label, member) in label_query.iter_mut() {
        let Ok(instance) = instances.get(member.0) else {
            continue;
        };
        let Ok((camera, camera_transform)) = cameras.get(instance.camera) else {
            continue;
        };
        let Some(node) = instance.session.graph.nodes.get(label.node_idx) else {
            continue;
        };

        let offset = instance.session.config().node_radius * LABEL_OFFSET;
        let world_pos = node.position + Vec3::Y * offset;
        let in_front =
            (world_pos - camera_transform.translation()).dot(*camera_transform.forward()) > 0.0;

        match camera.world_to_viewport(camera_transform, world_pos) {
            Ok(viewport_pos) if in_front => {
                *visibility = Visibility::Visible;
                node_ui.left = Val::Px(viewport_pos.x - 40.0);
                node_ui.top = Val::Px(viewport_pos.y - 10.0);
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}

/// Show the tooltip next to the pointer while a node is hovered.
///
/// Instances share one overlay. The first instance with a hovered node and a
/// cursor in its window owns it for the frame and points it at its camera;
/// the overlay is hidden only when no instance has anything to show.
pub fn update_tooltip_system(
    instances: Query<&GraphInstance, With<PointerListeners>>,
    windows: Query<&Window>,
    mut overlays: Query<
        (
            &mut UiNode,
            &mut Visibility,
            &mut BackgroundColor,
            &mut TargetCamera,
        ),
        With<TooltipOverlay>,
    >,
    mut titles: Query<(&mut Text, &mut TextColor), (With<TooltipTitle>, Without<TooltipBody>)>,
    mut bodies: Query<(&mut Text, &mut TextColor), (With<TooltipBody>, Without<TooltipTitle>)>,
) {
    let showing = instances.iter().find_map(|instance| {
        let content = instance.session.tooltip()?;
        let cursor = windows.get(instance.mount).ok()?.cursor_position()?;
        Some((instance, content, cursor))
    });

    let Some((instance, content, cursor)) = showing else {
        for instance in instances.iter() {
            if let Ok((_, mut visibility, ..)) = overlays.get_mut(instance.tooltip) {
                *visibility = Visibility::Hidden;
            }
        }
        return;
    };

    let Ok((mut node_ui, mut visibility, mut background, mut target)) =
        overlays.get_mut(instance.tooltip)
    else {
        return;
    };

    let (fill, text_color) = tooltip_palette(instance.dark_mode);
    *visibility = Visibility::Visible;
    if target.0 != instance.camera {
        *target = TargetCamera(instance.camera);
    }
    node_ui.left = Val::Px(cursor.x + TOOLTIP_OFFSET.x);
    node_ui.top = Val::Px(cursor.y + TOOLTIP_OFFSET.y);
    if background.0 != fill {
        background.0 = fill;
    }

    if let Ok((mut text, mut color)) = titles.get_single_mut() {
        if text.0 != content.label {
            **text = content.label.clone();
        }
        color.0 = text_color;
    }
    if let Ok((mut text, mut color)) = bodies.get_single_mut() {
        if text.0 != content.content {
            **text = content.content;
        }
        color.0 = text_color;
    }
}

/// Drive material color and emissive from highlight state and the scene
/// clock.
pub fn update_glow_system(
    instances: Query<&GraphInstance, With<FrameLoop>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    node_query: Query<(&NodeBody, &InstanceMember, &MeshMaterial3d<StandardMaterial>)>,
    shell_query: Query<(&GlowShell, &InstanceMember, &MeshMaterial3d<StandardMaterial>)>,
    edge_query: Query<(&EdgeLine, &InstanceMember, &MeshMaterial3d<StandardMaterial>)>,
) {
    let peak = ACTIVE_GLOW * (1.0 + PULSE_AMPLITUDE);

    for (body, member, material) in node_query.iter() {
        let Ok(instance) = instances.get(member.0) else {
            continue;
        };
        let Some(node) = instance.session.graph.nodes.get(body.node_idx) else {
            continue;
        };
        let color = node_color(node.state, node.base_color, instance.dark_mode);
        let glow = node_glow(node.state, instance.session.clock());
        apply_material(&mut materials, material, color, emissive(color, glow));
    }

    for (shell, member, material) in shell_query.iter() {
        let Ok(instance) = instances.get(member.0) else {
            continue;
        };
        let Some(node) = instance.session.graph.nodes.get(shell.node_idx) else {
            continue;
        };
        let color = node_color(node.state, node.base_color, instance.dark_mode);
        let glow = node_glow(node.state, instance.session.clock());
        let alpha = (glow / peak).clamp(0.0, 1.0) * SHELL_MAX_ALPHA;
        apply_material(
            &mut materials,
            material,
            color.with_alpha(alpha),
            emissive(color, glow * 0.5),
        );
    }

    for (line, member, material) in edge_query.iter() {
        let Ok(instance) = instances.get(member.0) else {
            continue;
        };
        let Some(edge) = instance.session.graph.edges.get(line.edge_idx) else {
            continue;
        };
        let glow = edge_glow(edge.state, instance.session.clock());
        let base = if edge.state.is_highlighted() {
            COLOR_EDGE.with_alpha(1.0)
        } else {
            COLOR_EDGE
        };
        apply_material(&mut materials, material, base, emissive(COLOR_EDGE, glow));
    }
}

/// Write color and emissive, skipping the asset update when nothing changed.
fn apply_material(
    materials: &mut Assets<StandardMaterial>,
    handle: &MeshMaterial3d<StandardMaterial>,
    base_color: Color,
    emissive: LinearRgba,
) {
    let unchanged = materials
        .get(&handle.0)
        .is_some_and(|m| m.base_color == base_color && m.emissive == emissive);
    if unchanged {
        return;
    }
    if let Some(material) = materials.get_mut(&handle.0) {
        material.base_color = base_color;
        material.emissive = emissive;
    }
}
