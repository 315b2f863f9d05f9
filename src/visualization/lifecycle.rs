//! Mounting and tearing down visualizer instances.
//!
//! A mount target is a window entity. Mounting builds a [`GraphSession`],
//! spawns its scene into that window and returns a [`VisualizerHandle`];
//! the handle's `cleanup` undoes all of it and may be called any number of
//! times. At most one instance is attached to a mount: mounting again
//! disposes the previous instance first.
//!
//! The tooltip overlay is shared across instances. The first instance that
//! needs it creates it, later instances reuse it, and only the creator
//! removes it.

use bevy::prelude::*;
use bevy::ui::{GlobalZIndex, PositionType, TargetCamera};

use super::components::{
    FrameLoop, GraphInstance, InstanceAssets, InstanceId, InstanceMember, MountedVisualizer,
    PointerListeners, TooltipBody, TooltipOverlay, TooltipTitle,
};
use super::constants::tooltip_palette;
use super::graph::TopicGraph;
use super::resources::PointerGesture;
use super::session::GraphSession;
use super::setup::{spawn_scene, SceneParams};
use crate::config::VisualizerConfig;
use crate::error::AppError;
use crate::models::{GraphSnapshot, NodeContentMap};

/// Key identifying the process-wide tooltip overlay.
pub const TOOLTIP_KEY: &str = "graph-tooltip";

/// Everything needed to mount a visualizer.
#[derive(Debug, Clone)]
pub struct VisualizerRequest {
    /// Window entity to render into.
    pub mount: Entity,
    pub snapshot: GraphSnapshot,
    /// Supplementary node text; may be empty.
    pub content: NodeContentMap,
    pub dark_mode: bool,
    pub config: VisualizerConfig,
}

/// Handle to a mounted instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualizerHandle {
    root: Entity,
    mount: Entity,
    id: InstanceId,
}

impl VisualizerHandle {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn mount(&self) -> Entity {
        self.mount
    }

    /// Whether the instance is still attached.
    pub fn is_live(&self, world: &World) -> bool {
        world
            .get::<GraphInstance>(self.root)
            .is_some_and(|instance| instance.id == self.id)
    }

    /// Attach node content that arrived after mount. Returns `false` once
    /// the instance is gone.
    pub fn supply_content(&self, world: &mut World, content: &NodeContentMap) -> bool {
        let Some(mut instance) = world.get_mut::<GraphInstance>(self.root) else {
            return false;
        };
        if instance.id != self.id {
            return false;
        }
        instance.session.graph.supply_content(content);
        tracing::debug!(instance = %self.id, entries = content.len(), "Node content supplied");
        true
    }

    /// Release everything the instance holds. Idempotent.
    pub fn cleanup(&self, world: &mut World) {
        dispose_instance(world, self.root, self.id);
    }
}

/// Mount a visualizer, logging and returning `None` if the mount target is
/// missing.
pub fn mount_visualizer(world: &mut World, request: VisualizerRequest) -> Option<VisualizerHandle> {
    match try_mount(world, request) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Visualizer not mounted");
            None
        }
    }
}

/// Mount a visualizer into `request.mount`.
pub fn try_mount(
    world: &mut World,
    request: VisualizerRequest,
) -> Result<VisualizerHandle, AppError> {
    let VisualizerRequest {
        mount,
        snapshot,
        content,
        dark_mode,
        config,
    } = request;

    let viewport = match world.get::<Window>(mount) {
        Some(window) => Vec2::new(window.width(), window.height()),
        None => return Err(AppError::MissingMountTarget(format!("{mount}"))),
    };

    if let Some(previous) = world.get::<MountedVisualizer>(mount).copied() {
        tracing::info!(instance = %previous.id, "Replacing mounted visualizer");
        dispose_instance(world, previous.root, previous.id);
    }

    let id = InstanceId::new();
    let graph = TopicGraph::from_snapshot(&snapshot, &content, config.position_scale);
    let session = GraphSession::new(graph, config);

    let root = world
        .spawn(Name::new(format!("graph-instance-{id}")))
        .id();

    let mut assets = InstanceAssets::default();
    let camera = spawn_scene(
        world,
        &SceneParams {
            root,
            mount,
            session: &session,
            dark_mode,
            viewport,
        },
        &mut assets,
    );
    let tooltip = ensure_tooltip(world, id, camera, dark_mode);

    let report = session.layout_report();
    tracing::info!(
        instance = %id,
        nodes = session.graph.nodes.len(),
        edges = session.graph.edges.len(),
        layout_iterations = report.iterations,
        converged = report.converged,
        "Visualizer mounted"
    );

    world.entity_mut(root).insert((
        GraphInstance {
            id,
            mount,
            camera,
            tooltip,
            dark_mode,
            session,
        },
        assets,
        PointerListeners,
        FrameLoop,
    ));
    world.entity_mut(mount).insert(MountedVisualizer { root, id });

    Ok(VisualizerHandle { root, mount, id })
}

/// Return the shared tooltip overlay, creating it for `owner` if absent.
pub fn ensure_tooltip(
    world: &mut World,
    owner: InstanceId,
    camera: Entity,
    dark_mode: bool,
) -> Entity {
    let mut overlays = world.query::<(Entity, &TooltipOverlay)>();
    let existing = overlays
        .iter(world)
        .find(|(_, overlay)| overlay.key == TOOLTIP_KEY)
        .map(|(entity, _)| entity);
    if let Some(entity) = existing {
        world.entity_mut(entity).insert(TargetCamera(camera));
        return entity;
    }

    let font = |size: f32| TextFont {
        font_size: size,
        ..default()
    };
    let (background, text) = tooltip_palette(dark_mode);
    let color = TextColor(text);

    world
        .spawn((
            Name::new(TOOLTIP_KEY),
            bevy::ui::Node {
                position_type: PositionType::Absolute,
                max_width: Val::Px(420.0),
                padding: UiRect::all(Val::Px(8.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            BackgroundColor(background),
            BorderRadius::all(Val::Px(4.0)),
            GlobalZIndex(50),
            Visibility::Hidden,
            TargetCamera(camera),
            TooltipOverlay {
                key: TOOLTIP_KEY,
                owner,
            },
        ))
        .with_children(|parent| {
            parent.spawn((Text::new(""), font(15.0), color, TooltipTitle));
            parent.spawn((Text::new(""), font(13.0), color, TooltipBody));
        })
        .id()
}

/// Tear down the instance rooted at `root` if it is still the one named
/// `id`. Returns `false` when there was nothing to do.
fn dispose_instance(world: &mut World, root: Entity, id: InstanceId) -> bool {
    let Some(instance) = world.get::<GraphInstance>(root) else {
        return false;
    };
    if instance.id != id {
        return false;
    }
    let (mount, tooltip) = (instance.mount, instance.tooltip);

    // Input stops first, then the frame loop.
    world.entity_mut(root).remove::<PointerListeners>();
    world.entity_mut(root).remove::<FrameLoop>();

    // Camera controls and any gesture still targeting this instance.
    if let Some(mut gesture) = world.get_resource_mut::<PointerGesture>() {
        if gesture.root() == Some(root) {
            *gesture = PointerGesture::Idle;
        }
    }

    // Render entities (camera included) and their assets.
    let mut members = world.query::<(Entity, &InstanceMember)>();
    let owned: Vec<Entity> = members
        .iter(world)
        .filter(|(_, member)| member.0 == root)
        .map(|(entity, _)| entity)
        .collect();
    for entity in &owned {
        world.despawn(*entity);
    }
    if let Some(assets) = world.entity_mut(root).take::<InstanceAssets>() {
        release_assets(world, assets);
    }

    // Tooltip, only if this instance created it. Otherwise hand it back to a
    // live camera, the creator's when it is still mounted.
    match world.get::<TooltipOverlay>(tooltip).map(|overlay| overlay.owner) {
        Some(owner) if owner == id => world.entity_mut(tooltip).despawn_recursive(),
        Some(owner) => {
            let camera = surviving_camera(world, tooltip, id, owner);
            let mut overlay = world.entity_mut(tooltip);
            overlay.insert(Visibility::Hidden);
            if let Some(camera) = camera {
                overlay.insert(TargetCamera(camera));
            }
        }
        None => {}
    }

    if world
        .get::<MountedVisualizer>(mount)
        .is_some_and(|mounted| mounted.id == id)
    {
        world.entity_mut(mount).remove::<MountedVisualizer>();
    }

    world.despawn(root);
    tracing::info!(instance = %id, entities = owned.len(), "Visualizer disposed");
    true
}

/// Camera of another live instance sharing `tooltip`, preferring `owner`.
fn surviving_camera(
    world: &mut World,
    tooltip: Entity,
    leaving: InstanceId,
    owner: InstanceId,
) -> Option<Entity> {
    let mut instances = world.query::<&GraphInstance>();
    let mut fallback = None;
    for instance in instances.iter(world) {
        if instance.id == leaving || instance.tooltip != tooltip {
            continue;
        }
        if instance.id == owner {
            return Some(instance.camera);
        }
        fallback.get_or_insert(instance.camera);
    }
    fallback
}

fn release_assets(world: &mut World, assets: InstanceAssets) {
    if let Some(mut meshes) = world.get_resource_mut::<Assets<Mesh>>() {
        for handle in &assets.meshes {
            meshes.remove(handle.id());
        }
    }
    if let Some(mut materials) = world.get_resource_mut::<Assets<StandardMaterial>>() {
        for handle in &assets.materials {
            materials.remove(handle.id());
        }
    }
}
