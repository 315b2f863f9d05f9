//! Scene bootstrap for one graph instance.
//!
//! Builds the camera, lights, node spheres, glow shells, edge cylinders and
//! labels for a session. Everything spawned here is tagged with
//! [`InstanceMember`] and every asset allocated is recorded in
//! [`InstanceAssets`] so teardown can find it again.

use bevy::core_pipeline::bloom::Bloom;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::camera::{ClearColorConfig, RenderTarget};
use bevy::ui::{PositionType, TargetCamera};
use bevy::window::WindowRef;

use super::components::{
    EdgeLine, GlowShell, InstanceAssets, InstanceMember, NodeBody, NodeLabel, OrbitControls,
    PickVolume, RenderRole,
};
use super::constants::{
    background_color, text_color, COLOR_EDGE, EDGE_RADIUS, FOG_RANGE, GLOW_SHELL_SCALE,
};
use super::session::GraphSession;
use super::systems::camera::calculate_camera_position;
use super::systems::layout::edge_transform;

/// Parameters for building one instance's scene.
pub struct SceneParams<'a> {
    pub root: Entity,
    pub mount: Entity,
    pub session: &'a GraphSession,
    pub dark_mode: bool,
    /// Mount size in logical pixels.
    pub viewport: Vec2,
}

/// Spawn the scene for `params.session`. Returns the camera entity.
pub fn spawn_scene(world: &mut World, params: &SceneParams, assets: &mut InstanceAssets) -> Entity {
    world.init_resource::<Assets<Mesh>>();
    world.init_resource::<Assets<StandardMaterial>>();

    let config = params.session.config();
    let member = InstanceMember(params.root);
    let background = background_color(params.dark_mode);

    // Camera
    let (center, _) = params.session.graph.bounding_sphere();
    let mut controls = OrbitControls::new(config.camera_distance, config.rotate);
    controls.target = Vec3::new(center.x, center.y, 0.0);

    let height = if params.viewport.y > 0.0 { params.viewport.y } else { 600.0 };
    let camera = world
        .spawn((
            Camera3d::default(),
            Camera {
                hdr: config.bloom,
                target: RenderTarget::Window(WindowRef::Entity(params.mount)),
                clear_color: ClearColorConfig::Custom(background),
                ..default()
            },
            Projection::Perspective(PerspectiveProjection {
                fov: config.fov_degrees.to_radians(),
                aspect_ratio: params.viewport.x.max(1.0) / height,
                near: 0.1,
                far: 1000.0,
            }),
            Transform::from_translation(calculate_camera_position(&controls))
                .looking_at(controls.target, Vec3::Y),
            DistanceFog {
                color: background,
                falloff: FogFalloff::Linear {
                    start: FOG_RANGE.0,
                    end: FOG_RANGE.1,
                },
                ..default()
            },
            controls,
            member,
            Name::new("graph-camera"),
        ))
        .id();
    if config.bloom {
        world.entity_mut(camera).insert(Bloom::NATURAL);
    }

    // Lighting
    world.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
    });
    world.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        member,
    ));

    // Shared meshes
    let node_radius = config.node_radius;
    let shell_radius = node_radius * GLOW_SHELL_SCALE;
    let (sphere, shell, cylinder) = {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        (
            meshes.add(Sphere::new(node_radius).mesh().uv(32, 18)),
            meshes.add(Sphere::new(shell_radius).mesh().uv(24, 12)),
            meshes.add(Cylinder::new(EDGE_RADIUS, 1.0)),
        )
    };
    assets
        .meshes
        .extend([sphere.clone(), shell.clone(), cylinder.clone()]);

    // Nodes: each gets its own body and shell material so glow is per node.
    let label_font = TextFont {
        font_size: 12.0,
        ..default()
    };
    let label_color = TextColor(text_color(params.dark_mode));

    for (idx, node) in params.session.graph.nodes.iter().enumerate() {
        let (body_material, shell_material) = {
            let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
            (
                materials.add(StandardMaterial {
                    base_color: node.base_color,
                    metallic: 0.8,
                    perceptual_roughness: 0.3,
                    emissive: LinearRgba::BLACK,
                    ..default()
                }),
                materials.add(StandardMaterial {
                    base_color: node.base_color.with_alpha(0.0),
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    ..default()
                }),
            )
        };
        assets
            .materials
            .extend([body_material.clone(), shell_material.clone()]);

        world.spawn((
            Mesh3d(sphere.clone()),
            MeshMaterial3d(body_material),
            Transform::from_translation(node.position),
            NodeBody {
                node_idx: idx,
                radius: node_radius,
            },
            PickVolume {
                node_idx: idx,
                radius: node_radius,
            },
            RenderRole::HitTestable,
            member,
        ));

        world.spawn((
            Mesh3d(shell.clone()),
            MeshMaterial3d(shell_material),
            Transform::from_translation(node.position),
            GlowShell { node_idx: idx },
            PickVolume {
                node_idx: idx,
                radius: shell_radius,
            },
            RenderRole::DecorationOnly,
            member,
        ));

        world.spawn((
            Text::new(node.label.clone()),
            label_font.clone(),
            label_color,
            bevy::ui::Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            TargetCamera(camera),
            NodeLabel { node_idx: idx },
            RenderRole::DecorationOnly,
            member,
        ));
    }

    // Edges: one material each, since only edges touching the hovered node glow.
    for (idx, edge) in params.session.graph.edges.iter().enumerate() {
        let material = world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial {
                base_color: COLOR_EDGE,
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            });
        assets.materials.push(material.clone());

        world.spawn((
            Mesh3d(cylinder.clone()),
            MeshMaterial3d(material),
            edge_transform(edge.segment),
            EdgeLine { edge_idx: idx },
            RenderRole::DecorationOnly,
            member,
        ));
    }

    tracing::debug!(
        nodes = params.session.graph.nodes.len(),
        edges = params.session.graph.edges.len(),
        bloom = config.bloom,
        "Scene spawned"
    );

    camera
}
