//! Desktop host: mounts one visualizer into the primary window and drives
//! its lifecycle from keyboard and window events.
//!
//! - F5 remounts from the same inputs (disposing the current instance).
//! - T flips the palette and remounts.
//! - Closing the window or exiting the app runs cleanup.
//! - A node listing still in flight at mount is handed to the live instance
//!   when it arrives.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowClosed};
use std::sync::Mutex;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use super::lifecycle::{mount_visualizer, VisualizerHandle, VisualizerRequest};
use crate::config::VisualizerConfig;
use crate::models::{GraphSnapshot, NodeContentMap};

/// Inputs the host remounts from, plus the live handle.
#[derive(Resource)]
pub struct HostState {
    pub snapshot: GraphSnapshot,
    pub content: NodeContentMap,
    pub config: VisualizerConfig,
    pub dark_mode: bool,
    pub handle: Option<VisualizerHandle>,
    pending_content: Option<oneshot::Receiver<NodeContentMap>>,
}

impl HostState {
    pub fn new(snapshot: GraphSnapshot, content: NodeContentMap, config: VisualizerConfig) -> Self {
        let dark_mode = config.dark_mode;
        Self {
            snapshot,
            content,
            config,
            dark_mode,
            handle: None,
            pending_content: None,
        }
    }

    /// Mount on the snapshot now and take node content from `receiver`
    /// once it is sent.
    pub fn with_pending_content(mut self, receiver: oneshot::Receiver<NodeContentMap>) -> Self {
        self.pending_content = Some(receiver);
        self
    }

    pub fn content_pending(&self) -> bool {
        self.pending_content.is_some()
    }

    fn request(&self, mount: Entity) -> VisualizerRequest {
        VisualizerRequest {
            mount,
            snapshot: self.snapshot.clone(),
            content: self.content.clone(),
            dark_mode: self.dark_mode,
            config: self.config.clone(),
        }
    }
}

/// Plugin hosting a single visualizer in the primary window.
///
/// The state uses `Mutex<Option<...>>` so it can be moved into the world
/// during `build()`, which only takes `&self`.
pub struct HostPlugin {
    state: Mutex<Option<HostState>>,
}

impl HostPlugin {
    pub fn new(state: HostState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        let state = self.state.lock().ok().and_then(|mut state| state.take());
        let Some(state) = state else {
            tracing::warn!("Host plugin built twice; ignoring");
            return;
        };

        app.insert_resource(state)
            .add_systems(Startup, mount_primary_window)
            .add_systems(
                Update,
                (
                    receive_content_system,
                    host_keyboard_system,
                    detach_on_close_system,
                ),
            );
    }
}

/// Mount (or remount) the host's visualizer on `mount`.
pub fn remount(world: &mut World, mount: Entity) {
    let Some(request) = world
        .get_resource::<HostState>()
        .map(|host| host.request(mount))
    else {
        return;
    };
    let handle = mount_visualizer(world, request);
    if let Some(mut host) = world.get_resource_mut::<HostState>() {
        host.handle = handle;
    }
}

fn mount_primary_window(world: &mut World) {
    let mut windows = world.query_filtered::<Entity, With<PrimaryWindow>>();
    let Some(window) = windows.iter(world).next() else {
        tracing::error!("No primary window to mount the visualizer on");
        return;
    };
    remount(world, window);
}

fn receive_content_system(mut host: ResMut<HostState>, mut commands: Commands) {
    let received = match host.pending_content.as_mut() {
        Some(receiver) => receiver.try_recv(),
        None => return,
    };

    match received {
        Ok(content) => {
            host.pending_content = None;
            tracing::info!(content_entries = content.len(), "Node listing arrived");
            // Remounts read from here from now on.
            host.content = content.clone();
            if let Some(handle) = host.handle {
                commands.queue(move |world: &mut World| {
                    handle.supply_content(world, &content);
                });
            }
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Closed) => {
            host.pending_content = None;
            tracing::warn!("Node listing dropped before it arrived; keeping placeholders");
        }
    }
}

fn host_keyboard_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut host: ResMut<HostState>,
    mut commands: Commands,
) {
    let Some(handle) = host.handle else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyT) {
        host.dark_mode = !host.dark_mode;
        tracing::info!(dark_mode = host.dark_mode, "Palette toggled");
    } else if !keyboard.just_pressed(KeyCode::F5) {
        return;
    }

    let mount = handle.mount();
    commands.queue(move |world: &mut World| remount(world, mount));
}

fn detach_on_close_system(
    mut closed: EventReader<WindowClosed>,
    mut exit: EventReader<AppExit>,
    mut host: ResMut<HostState>,
    mut commands: Commands,
) {
    let Some(handle) = host.handle else {
        closed.clear();
        exit.clear();
        return;
    };

    let window_closed = closed.read().any(|ev| ev.window == handle.mount());
    let exiting = exit.read().count() > 0;
    if window_closed || exiting {
        host.handle = None;
        commands.queue(move |world: &mut World| handle.cleanup(world));
    }
}
