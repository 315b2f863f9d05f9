//! Frame-loop behaviour: drag release, settle, bounce, transform sync, hover
//! reset and late content, driven through the visualization plugin with a
//! fixed frame time.

use std::time::Duration;

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::window::{PrimaryWindow, WindowClosed};
use tokio::sync::oneshot;

use mindmesh::config::VisualizerConfig;
use mindmesh::models::{GraphSnapshot, NodeContentMap, CONTENT_PLACEHOLDER};
use mindmesh::visualization::components::{
    EdgeLine, GraphInstance, InstanceMember, NodeBody, TooltipOverlay,
};
use mindmesh::visualization::systems::layout::edge_transform;
use mindmesh::visualization::{
    mount_visualizer, HighlightState, HostPlugin, HostState, VisualizationPlugin,
    VisualizerHandle, VisualizerRequest,
};

const SNAPSHOT: &str = r#"{"data": [
    {"mode": "lines", "x": [0.0, 1.0, null], "y": [0.0, 0.0, null]},
    {"mode": "markers", "x": [0.0, 1.0, -1.0], "y": [0.0, 0.0, 0.0],
     "text": ["Work", "Travel", "Cooking"], "ids": ["w", "t", "c"]}
]}"#;

fn base_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)))
        .init_resource::<ButtonInput<MouseButton>>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .add_event::<MouseMotion>()
        .add_event::<MouseWheel>()
        .add_plugins(VisualizationPlugin);
    app
}

fn app_with_instance() -> (App, VisualizerHandle) {
    let mut app = base_app();

    let window = app.world_mut().spawn(Window::default()).id();
    let request = VisualizerRequest {
        mount: window,
        snapshot: GraphSnapshot::from_json(SNAPSHOT).unwrap(),
        content: NodeContentMap::new(),
        dark_mode: true,
        config: VisualizerConfig::default(),
    };
    let handle = mount_visualizer(app.world_mut(), request).unwrap();
    (app, handle)
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

#[test]
fn test_released_node_bounces_clear_and_transforms_follow() {
    let (mut app, handle) = app_with_instance();
    run_frames(&mut app, 2);

    // Drop "Work" right next to "Travel".
    {
        let mut instance = app
            .world_mut()
            .get_mut::<GraphInstance>(handle.root())
            .unwrap();
        let session = &mut instance.session;
        let work = session.graph.nodes[0].position;
        let travel = session.graph.nodes[1].position;
        assert!(session.begin_drag(0, work));
        session.drag_to(travel + Vec3::new(0.5, 0.0, 0.0));
        session.end_drag();
    }

    // 200 ms settle delay + 600 ms bounce at 16 ms per frame.
    run_frames(&mut app, 70);

    let world = app.world_mut();
    let instance = world.get::<GraphInstance>(handle.root()).unwrap();
    let session = &instance.session;
    assert!(!session.settle_pending());
    assert!(session.bounces().is_empty());

    let nodes = &session.graph.nodes;
    for i in 0..nodes.len() {
        assert_eq!(nodes[i].position.z, 0.0);
        for j in (i + 1)..nodes.len() {
            let distance = nodes[i].position.distance(nodes[j].position);
            assert!(distance >= 5.0 - 1e-3, "nodes {i} and {j} at {distance}");
        }
    }

    let positions: Vec<Vec3> = nodes.iter().map(|n| n.position).collect();
    let segments: Vec<[Vec3; 2]> = session.graph.edges.iter().map(|e| e.segment).collect();
    let root = handle.root();

    let mut bodies = world.query::<(&Transform, &NodeBody, &InstanceMember)>();
    for (transform, body, member) in bodies.iter(world) {
        assert_eq!(member.0, root);
        assert_eq!(transform.translation, positions[body.node_idx]);
    }

    let mut lines = world.query::<(&Transform, &EdgeLine)>();
    for (transform, line) in lines.iter(world) {
        let segment = segments[line.edge_idx];
        assert_eq!(segment[0], positions[0]);
        assert_eq!(*transform, edge_transform(segment));
    }
}

#[test]
fn test_frames_after_cleanup_do_nothing() {
    let (mut app, handle) = app_with_instance();
    run_frames(&mut app, 3);

    handle.cleanup(app.world_mut());
    run_frames(&mut app, 3);
    handle.cleanup(app.world_mut());

    let world = app.world_mut();
    assert!(!handle.is_live(world));
    assert_eq!(
        world
            .query_filtered::<Entity, With<NodeBody>>()
            .iter(world)
            .count(),
        0
    );
}

#[test]
fn test_pointer_outside_window_clears_hover_and_hides_tooltip() {
    let (mut app, handle) = app_with_instance();
    run_frames(&mut app, 1);

    let tooltip = {
        let mut instance = app
            .world_mut()
            .get_mut::<GraphInstance>(handle.root())
            .unwrap();
        assert!(instance.session.hover(Some(0)));
        assert_eq!(instance.session.graph.nodes[1].state, HighlightState::Adjacent);
        instance.tooltip
    };
    app.world_mut().entity_mut(tooltip).insert(Visibility::Visible);

    // The window never received a cursor position.
    run_frames(&mut app, 1);

    let world = app.world();
    let instance = world.get::<GraphInstance>(handle.root()).unwrap();
    assert_eq!(instance.session.hovered(), None);
    assert!(instance
        .session
        .graph
        .nodes
        .iter()
        .all(|n| n.state == HighlightState::Default));
    assert!(world.get::<TooltipOverlay>(tooltip).is_some());
    assert_eq!(world.get::<Visibility>(tooltip), Some(&Visibility::Hidden));
}

#[test]
fn test_host_hands_late_listing_to_mounted_instance() {
    let mut app = base_app();
    app.add_event::<WindowClosed>();

    let (sender, receiver) = oneshot::channel();
    let host = HostState::new(
        GraphSnapshot::from_json(SNAPSHOT).unwrap(),
        NodeContentMap::new(),
        VisualizerConfig::default(),
    )
    .with_pending_content(receiver);
    app.add_plugins(HostPlugin::new(host));
    app.world_mut().spawn((Window::default(), PrimaryWindow));

    run_frames(&mut app, 2);
    let handle = app.world().resource::<HostState>().handle.unwrap();
    let content_of = |app: &App, idx: usize| {
        let instance = app.world().get::<GraphInstance>(handle.root()).unwrap();
        instance.session.graph.nodes[idx].content().to_string()
    };
    assert_eq!(content_of(&app, 0), CONTENT_PLACEHOLDER);
    assert!(app.world().resource::<HostState>().content_pending());

    let mut listing = NodeContentMap::new();
    listing.insert("w", "Standup notes");
    sender.send(listing).unwrap();
    run_frames(&mut app, 1);

    assert_eq!(content_of(&app, 0), "Standup notes");
    assert_eq!(content_of(&app, 1), CONTENT_PLACEHOLDER);
    assert!(!app.world().resource::<HostState>().content_pending());
}
