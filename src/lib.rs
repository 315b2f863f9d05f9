//! Mindmesh - Topic Graph Visualizer
//!
//! Loads a conversation topic graph snapshot and renders it as an
//! interactive 3D node-link scene.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod visualization;
