//! Node dragging and hover picking.

use bevy::math::primitives::InfinitePlane3d;
use bevy::prelude::*;

use crate::visualization::components::{
    GraphInstance, InstanceMember, OrbitControls, PickVolume, PointerListeners, RenderRole,
};
use crate::visualization::resources::PointerGesture;
use crate::visualization::session::{pick_node, PickTarget};

/// Where `ray` crosses the z = 0 plane the graph lives on.
pub fn ground_point(ray: Ray3d) -> Option<Vec3> {
    ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Z))
        .map(|t| ray.get_point(t))
}

fn pointer_ray(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Ray3d> {
    let cursor = window.cursor_position()?;
    camera.viewport_to_world(camera_transform, cursor).ok()
}

fn pick_targets(
    root: Entity,
    volumes: &Query<(&PickVolume, &RenderRole, &Transform, &InstanceMember)>,
) -> Vec<PickTarget> {
    volumes
        .iter()
        .filter(|(.., member)| member.0 == root)
        .map(|(volume, role, transform, _)| PickTarget {
            node_idx: volume.node_idx,
            center: transform.translation,
            radius: volume.radius,
            role: *role,
        })
        .collect()
}

/// Handle node dragging with left mouse button.
///
/// Pressing on a node grabs it and disables camera controls; pressing on
/// empty space starts a camera pan instead. While held, the node follows the
/// pointer across the z = 0 plane. Releasing arms the settle pass.
pub fn drag_node_system(
    mut gesture: ResMut<PointerGesture>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut controls: Query<&mut OrbitControls>,
    volumes: Query<(&PickVolume, &RenderRole, &Transform, &InstanceMember)>,
    mut instances: Query<(Entity, &mut GraphInstance), With<PointerListeners>>,
) {
    for (root, mut instance) in instances.iter_mut() {
        let Ok(window) = windows.get(instance.mount) else {
            continue;
        };
        let Ok((camera, camera_transform)) = cameras.get(instance.camera) else {
            continue;
        };
        let ray = pointer_ray(window, camera, camera_transform);

        if mouse_button.just_pressed(MouseButton::Left) && *gesture == PointerGesture::Idle {
            if let Some(ray) = ray {
                match pick_node(ray, pick_targets(root, &volumes)) {
                    Some(node_idx) => {
                        let grab = ground_point(ray).or_else(|| {
                            instance.session.graph.nodes.get(node_idx).map(|n| n.position)
                        });
                        let started =
                            grab.is_some_and(|point| instance.session.begin_drag(node_idx, point));
                        if started {
                            *gesture = PointerGesture::DragNode { root };
                            if let Ok(mut orbit) = controls.get_mut(instance.camera) {
                                orbit.enabled = false;
                            }
                        }
                    }
                    None => *gesture = PointerGesture::Pan { root },
                }
            }
        }

        if *gesture != (PointerGesture::DragNode { root }) {
            continue;
        }

        if mouse_button.pressed(MouseButton::Left) {
            if let Some(point) = ray.and_then(ground_point) {
                instance.session.drag_to(point);
            }
        } else {
            instance.session.end_drag();
            *gesture = PointerGesture::Idle;
            if let Ok(mut orbit) = controls.get_mut(instance.camera) {
                orbit.enabled = true;
            }
        }
    }
}

/// Track the node under the pointer. Leaving the window clears hover.
pub fn hover_system(
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    volumes: Query<(&PickVolume, &RenderRole, &Transform, &InstanceMember)>,
    mut instances: Query<(Entity, &mut GraphInstance), With<PointerListeners>>,
) {
    for (root, mut instance) in instances.iter_mut() {
        if instance.session.dragged().is_some() {
            continue;
        }
        let hit = windows
            .get(instance.mount)
            .ok()
            .zip(cameras.get(instance.camera).ok())
            .and_then(|(window, (camera, transform))| pointer_ray(window, camera, transform))
            .and_then(|ray| pick_node(ray, pick_targets(root, &volumes)));

        if instance.session.hovered() != hit && instance.session.hover(hit) {
            tracing::trace!(node = ?hit, "Hover changed");
        }
    }
}
