//! Mount and cleanup behaviour against a bare ECS world.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::ui::TargetCamera;

use mindmesh::config::VisualizerConfig;
use mindmesh::models::{GraphSnapshot, NodeContentMap};
use mindmesh::visualization::components::{
    FrameLoop, GraphInstance, InstanceMember, MountedVisualizer, NodeBody, PointerListeners,
    RenderRole, TooltipOverlay,
};
use mindmesh::visualization::systems::update_tooltip_system;
use mindmesh::visualization::{
    mount_visualizer, try_mount, VisualizerHandle, VisualizerRequest, TOOLTIP_KEY,
};

const SNAPSHOT: &str = r#"{"data": [
    {"mode": "lines", "x": [0.0, 0.2, null, 0.2, 1.0, null], "y": [0.0, 0.0, null, 0.0, 1.0, null]},
    {"mode": "markers", "x": [0.0, 0.2, 1.0], "y": [0.0, 0.0, 1.0],
     "text": ["Work", "Travel", "Cooking"], "ids": [1, 2, 3]}
]}"#;

fn request(mount: Entity) -> VisualizerRequest {
    let mut content = NodeContentMap::new();
    content.insert("1", "Quarterly planning");
    VisualizerRequest {
        mount,
        snapshot: GraphSnapshot::from_json(SNAPSHOT).unwrap(),
        content,
        dark_mode: true,
        config: VisualizerConfig::default(),
    }
}

fn world_with_window() -> (World, Entity) {
    let mut world = World::new();
    let window = world.spawn(Window::default()).id();
    (world, window)
}

fn count<F: bevy::ecs::query::QueryFilter>(world: &mut World) -> usize {
    world.query_filtered::<Entity, F>().iter(world).count()
}

fn tooltips(world: &mut World) -> Vec<Entity> {
    let mut query = world.query::<(Entity, &TooltipOverlay)>();
    query
        .iter(world)
        .filter(|(_, overlay)| overlay.key == TOOLTIP_KEY)
        .map(|(entity, _)| entity)
        .collect()
}

#[test]
fn test_missing_mount_target_returns_none() {
    let mut world = World::new();
    let not_a_window = world.spawn_empty().id();

    assert!(mount_visualizer(&mut world, request(not_a_window)).is_none());
    assert!(try_mount(&mut world, request(not_a_window)).is_err());
    assert_eq!(count::<With<Camera3d>>(&mut world), 0);
    assert_eq!(count::<With<GraphInstance>>(&mut world), 0);
}

#[test]
fn test_mount_builds_scene() {
    let (mut world, window) = world_with_window();
    let handle = mount_visualizer(&mut world, request(window)).unwrap();

    assert!(handle.is_live(&world));
    assert_eq!(count::<With<Camera3d>>(&mut world), 1);
    assert_eq!(count::<With<NodeBody>>(&mut world), 3);
    assert_eq!(tooltips(&mut world).len(), 1);

    let mounted = world.get::<MountedVisualizer>(window).unwrap();
    assert_eq!(mounted.root, handle.root());
    assert_eq!(mounted.id, handle.id());

    let instance = world.get::<GraphInstance>(handle.root()).unwrap();
    assert_eq!(instance.session.graph.edges.len(), 2);
    assert!(instance.session.layout_report().converged);
}

#[test]
fn test_only_node_bodies_are_hit_testable() {
    let (mut world, window) = world_with_window();
    mount_visualizer(&mut world, request(window)).unwrap();

    let mut roles = world.query::<(&RenderRole, Option<&NodeBody>)>();
    let mut hit_testable = 0;
    for (role, body) in roles.iter(&world) {
        if *role == RenderRole::HitTestable {
            assert!(body.is_some());
            hit_testable += 1;
        }
    }
    assert_eq!(hit_testable, 3);
}

#[test]
fn test_remount_replaces_previous_instance() {
    let (mut world, window) = world_with_window();
    let first = mount_visualizer(&mut world, request(window)).unwrap();
    let meshes_after_first = world.resource::<Assets<Mesh>>().len();

    let second = mount_visualizer(&mut world, request(window)).unwrap();

    assert!(!first.is_live(&world));
    assert!(second.is_live(&world));
    assert_eq!(count::<With<Camera3d>>(&mut world), 1);
    assert_eq!(count::<With<GraphInstance>>(&mut world), 1);
    assert_eq!(count::<With<NodeBody>>(&mut world), 3);
    assert_eq!(world.resource::<Assets<Mesh>>().len(), meshes_after_first);
    assert_eq!(
        world.get::<MountedVisualizer>(window).unwrap().root,
        second.root()
    );

    // The old handle no longer affects the live instance.
    first.cleanup(&mut world);
    assert!(second.is_live(&world));
}

#[test]
fn test_cleanup_is_idempotent() {
    let (mut world, window) = world_with_window();
    let handle = mount_visualizer(&mut world, request(window)).unwrap();

    handle.cleanup(&mut world);
    handle.cleanup(&mut world);

    assert!(!handle.is_live(&world));
    assert_eq!(count::<With<PointerListeners>>(&mut world), 0);
    assert_eq!(count::<With<FrameLoop>>(&mut world), 0);
    assert_eq!(count::<With<InstanceMember>>(&mut world), 0);
    assert_eq!(count::<With<Camera3d>>(&mut world), 0);
    assert!(tooltips(&mut world).is_empty());
    assert!(world.get::<MountedVisualizer>(window).is_none());
    assert_eq!(world.resource::<Assets<Mesh>>().len(), 0);
    assert_eq!(world.resource::<Assets<StandardMaterial>>().len(), 0);
}

#[test]
fn test_cleanup_after_window_is_gone() {
    let (mut world, window) = world_with_window();
    let handle = mount_visualizer(&mut world, request(window)).unwrap();

    world.despawn(window);
    handle.cleanup(&mut world);

    assert!(!handle.is_live(&world));
    assert_eq!(count::<With<InstanceMember>>(&mut world), 0);
}

#[test]
fn test_tooltip_is_shared_and_removed_by_creator() {
    let mut world = World::new();
    let first_window = world.spawn(Window::default()).id();
    let second_window = world.spawn(Window::default()).id();

    let creator = mount_visualizer(&mut world, request(first_window)).unwrap();
    let reuser = mount_visualizer(&mut world, request(second_window)).unwrap();

    let shared = tooltips(&mut world);
    assert_eq!(shared.len(), 1);
    assert_eq!(
        world.get::<GraphInstance>(reuser.root()).unwrap().tooltip,
        shared[0]
    );

    reuser.cleanup(&mut world);
    assert_eq!(tooltips(&mut world), shared);

    creator.cleanup(&mut world);
    assert!(tooltips(&mut world).is_empty());
}

#[test]
fn test_tooltip_recreated_after_creator_leaves() {
    let mut world = World::new();
    let window = world.spawn(Window::default()).id();

    let first = mount_visualizer(&mut world, request(window)).unwrap();
    first.cleanup(&mut world);
    let second = mount_visualizer(&mut world, request(window)).unwrap();

    let overlays = tooltips(&mut world);
    assert_eq!(overlays.len(), 1);
    let owner = world.get::<TooltipOverlay>(overlays[0]).unwrap().owner;
    assert_eq!(owner, second.id());
}

fn camera_of(world: &World, handle: &VisualizerHandle) -> Entity {
    world.get::<GraphInstance>(handle.root()).unwrap().camera
}

#[test]
fn test_tooltip_returns_to_creator_camera_after_reuser_leaves() {
    let mut world = World::new();
    let first_window = world.spawn(Window::default()).id();
    let second_window = world.spawn(Window::default()).id();

    let creator = mount_visualizer(&mut world, request(first_window)).unwrap();
    let reuser = mount_visualizer(&mut world, request(second_window)).unwrap();
    let tooltip = tooltips(&mut world)[0];

    reuser.cleanup(&mut world);

    let target = world.get::<TargetCamera>(tooltip).unwrap();
    assert_eq!(target.0, camera_of(&world, &creator));
    assert_eq!(world.get::<Visibility>(tooltip), Some(&Visibility::Hidden));
}

#[test]
fn test_tooltip_follows_the_hovering_instance() {
    let mut world = World::new();
    let first_window = world.spawn(Window::default()).id();
    let second_window = world.spawn(Window::default()).id();

    let creator = mount_visualizer(&mut world, request(first_window)).unwrap();
    let reuser = mount_visualizer(&mut world, request(second_window)).unwrap();
    let tooltip = tooltips(&mut world)[0];

    // The creator hovers "Work"; the reuser, mounted last, hovers nothing.
    world
        .get_mut::<GraphInstance>(creator.root())
        .unwrap()
        .session
        .hover(Some(0));
    world
        .get_mut::<Window>(first_window)
        .unwrap()
        .set_cursor_position(Some(Vec2::new(100.0, 100.0)));

    world.run_system_once(update_tooltip_system).unwrap();

    assert_eq!(world.get::<Visibility>(tooltip), Some(&Visibility::Visible));
    assert_eq!(
        world.get::<TargetCamera>(tooltip).unwrap().0,
        camera_of(&world, &creator)
    );

    world
        .get_mut::<GraphInstance>(creator.root())
        .unwrap()
        .session
        .hover(None);
    world.run_system_once(update_tooltip_system).unwrap();

    assert_eq!(world.get::<Visibility>(tooltip), Some(&Visibility::Hidden));
    assert!(reuser.is_live(&world));
}

#[test]
fn test_late_content_reaches_live_instance() {
    let (mut world, window) = world_with_window();
    let handle = mount_visualizer(&mut world, request(window)).unwrap();

    let mut late = NodeContentMap::new();
    late.insert("2", "Lisbon in May");
    assert!(handle.supply_content(&mut world, &late));

    let instance = world.get::<GraphInstance>(handle.root()).unwrap();
    assert_eq!(instance.session.graph.nodes[0].content(), "Quarterly planning");
    assert_eq!(instance.session.graph.nodes[1].content(), "Lisbon in May");

    handle.cleanup(&mut world);
    assert!(!handle.supply_content(&mut world, &late));
}
