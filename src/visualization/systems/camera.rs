//! Camera orbit, pan, and dolly systems.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use crate::visualization::components::{GraphInstance, OrbitControls, PointerListeners};
use crate::visualization::resources::PointerGesture;

const ROTATE_SPEED: f32 = 0.01;
const PAN_SPEED: f32 = 0.0015;
const DOLLY_SPEED: f32 = 1.0;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 200.0;
const MAX_PITCH: f32 = 1.5;

/// Calculate camera position from orbit parameters.
pub fn calculate_camera_position(orbit: &OrbitControls) -> Vec3 {
    let x = orbit.distance * orbit.pitch.cos() * orbit.yaw.sin();
    let y = orbit.distance * orbit.pitch.sin();
    let z = orbit.distance * orbit.pitch.cos() * orbit.yaw.cos();
    orbit.target + Vec3::new(x, y, z)
}

/// Apply a damped share of the queued motion to `orbit`.
pub fn apply_damping(orbit: &mut OrbitControls) {
    let rotation = orbit.pending_rotation * orbit.damping;
    orbit.yaw += rotation.x;
    orbit.pitch = (orbit.pitch + rotation.y).clamp(-MAX_PITCH, MAX_PITCH);
    orbit.pending_rotation -= rotation;

    let pan = orbit.pending_pan * orbit.damping;
    orbit.target += pan;
    orbit.pending_pan -= pan;

    if orbit.pending_rotation.length_squared() < 1e-8 {
        orbit.pending_rotation = Vec2::ZERO;
    }
    if orbit.pending_pan.length_squared() < 1e-8 {
        orbit.pending_pan = Vec3::ZERO;
    }
}

/// Camera control system.
///
/// Controls:
/// - Left-click drag on empty space: Pan
/// - Right-click drag: Orbit (only when rotation is enabled)
/// - Middle-click drag: Pan
/// - Scroll wheel: Dolly
/// - R: Reset view
///
/// Controls are inert while a node is being dragged. Queued motion keeps
/// easing out for a few frames after input stops.
pub fn camera_control_system(
    mut gesture: ResMut<PointerGesture>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll: EventReader<MouseWheel>,
    windows: Query<&Window>,
    instances: Query<(Entity, &GraphInstance), With<PointerListeners>>,
    mut cameras: Query<(&mut OrbitControls, &mut Transform)>,
) {
    let motion: Vec2 = mouse_motion.read().map(|ev| ev.delta).sum();
    let wheel: f32 = scroll.read().map(|ev| ev.y).sum();

    for (root, instance) in instances.iter() {
        let Ok((mut orbit, mut transform)) = cameras.get_mut(instance.camera) else {
            continue;
        };
        let pointer_inside = windows
            .get(instance.mount)
            .is_ok_and(|window| window.cursor_position().is_some());

        if pointer_inside && *gesture == PointerGesture::Idle {
            if mouse_button.just_pressed(MouseButton::Right) && orbit.rotate_enabled {
                *gesture = PointerGesture::Rotate { root };
            } else if mouse_button.just_pressed(MouseButton::Middle) {
                *gesture = PointerGesture::Pan { root };
            }
        }

        if orbit.enabled {
            match *gesture {
                PointerGesture::Rotate { root: owner } if owner == root => {
                    orbit.pending_rotation += Vec2::new(-motion.x, motion.y) * ROTATE_SPEED;
                }
                PointerGesture::Pan { root: owner } if owner == root => {
                    let right = transform.right();
                    let up = transform.up();
                    let scale = orbit.distance * PAN_SPEED;
                    orbit.pending_pan += (-*right * motion.x + *up * motion.y) * scale;
                }
                _ => {}
            }

            if pointer_inside && wheel != 0.0 {
                orbit.distance = (orbit.distance - wheel * DOLLY_SPEED).clamp(MIN_DISTANCE, MAX_DISTANCE);
            }

            if pointer_inside && keyboard.just_pressed(KeyCode::KeyR) {
                let distance = orbit.distance.max(MIN_DISTANCE);
                let target = orbit.target;
                *orbit = OrbitControls::new(distance, orbit.rotate_enabled);
                orbit.target = Vec3::new(target.x, target.y, 0.0);
            }
        }

        apply_damping(&mut orbit);
        *transform = Transform::from_translation(calculate_camera_position(&orbit))
            .looking_at(orbit.target, Vec3::Y);
    }

    let camera_gesture = matches!(
        *gesture,
        PointerGesture::Pan { .. } | PointerGesture::Rotate { .. }
    );
    if camera_gesture
        && !mouse_button.any_pressed([MouseButton::Left, MouseButton::Right, MouseButton::Middle])
    {
        *gesture = PointerGesture::Idle;
    }
}
