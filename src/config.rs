//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/mindmesh/config.toml` (XDG) or platform config dir
//! 2. Project config: `.mindmesh.toml`
//! 3. Environment variables: `MINDMESH_*` (sections separated by `__`,
//!    e.g. `MINDMESH_VISUALIZER__DARK_MODE=false`)
//!
//! Every field has a default, so running without any config file is valid.
//!
//! ```toml
//! [visualizer]
//! dark_mode = true
//! rotate = false
//! bloom = true
//! settle_collision_radius = 5.0
//!
//! [window]
//! width = 1600
//! height = 900
//!
//! [source]
//! snapshot = "graph.json"
//! nodes = "nodes.json"
//! ```

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub visualizer: VisualizerConfig,
    pub window: WindowConfig,
    pub source: SourceConfig,
}

/// Rendering, layout, and interaction tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Dark background and dark-mode highlight palette.
    pub dark_mode: bool,
    /// Multiplier from snapshot coordinates to scene units.
    pub position_scale: f32,
    /// Visual radius of a node sphere.
    pub node_radius: f32,
    /// Collision radius used by the load-time layout pass.
    pub initial_collision_radius: f32,
    /// Collision radius used by the post-drag pass (slightly larger).
    pub settle_collision_radius: f32,
    /// Iteration ceiling for the load-time layout pass.
    pub max_layout_iterations: usize,
    /// Delay between drag release and the post-drag pass.
    pub settle_delay_ms: u64,
    /// Duration of one bounce animation.
    pub bounce_duration_ms: u64,
    /// Allow orbit rotation (panning and zooming are always on).
    pub rotate: bool,
    /// Layer HDR bloom over direct rendering.
    pub bloom: bool,
    /// Initial camera distance from the origin along +Z.
    pub camera_distance: f32,
    /// Vertical field of view.
    pub fov_degrees: f32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            position_scale: 10.0,
            node_radius: 0.5,
            initial_collision_radius: 3.5,
            settle_collision_radius: 5.0,
            max_layout_iterations: 50,
            settle_delay_ms: 200,
            bounce_duration_ms: 600,
            rotate: false,
            bloom: false,
            camera_distance: 15.0,
            fov_degrees: 75.0,
        }
    }
}

impl VisualizerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn bounce_duration(&self) -> Duration {
        Duration::from_millis(self.bounce_duration_ms)
    }
}

/// Native window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Mindmesh Topic Graph".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Default input locations; CLI arguments take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Chart-style graph snapshot JSON.
    pub snapshot: Option<PathBuf>,
    /// Node listing JSON supplying per-node content.
    pub nodes: Option<PathBuf>,
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(&Self::user_config_path(), Path::new(".mindmesh.toml"))
            .extract()
            .map_err(ConfigError::from)
    }

    fn figment(user_config: &Path, project_config: &Path) -> Figment {
        Figment::new()
            // Layer 0: Built-in defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer 1: User config
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(project_config))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("MINDMESH_").split("__"))
    }

    /// User config path: ~/.config/mindmesh/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("mindmesh").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("mindmesh").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_files() {
        let config: Config = Config::figment(
            Path::new("/nonexistent/user.toml"),
            Path::new("/nonexistent/project.toml"),
        )
        .extract()
        .unwrap();

        assert_eq!(config.visualizer, VisualizerConfig::default());
        assert_eq!(config.visualizer.max_layout_iterations, 50);
        assert_eq!(config.visualizer.settle_delay(), Duration::from_millis(200));
        assert_eq!(config.visualizer.bounce_duration(), Duration::from_millis(600));
        assert!(config.source.snapshot.is_none());
    }

    #[test]
    fn test_project_config_overrides_user_config() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let project = dir.path().join("project.toml");
        std::fs::write(&user, "[visualizer]\nbloom = true\nrotate = true\n").unwrap();
        std::fs::write(&project, "[visualizer]\nrotate = false\n[window]\nwidth = 800.0\n")
            .unwrap();

        let config: Config = Config::figment(&user, &project).extract().unwrap();

        assert!(config.visualizer.bloom);
        assert!(!config.visualizer.rotate);
        assert_eq!(config.window.width, 800.0);
        assert_eq!(config.window.height, 720.0);
    }
}
