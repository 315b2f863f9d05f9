//! Graph data sources.
//!
//! The topic service supplies two independent payloads: the chart-style
//! snapshot and a node listing carrying per-node conversation text. They are
//! fetched concurrently; the visualizer may also start on the snapshot alone
//! and receive the listing later.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{GraphSnapshot, NodeContentMap, NodeRecord};

/// A supplier of the initial graph snapshot and node listing.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetch and validate the graph snapshot.
    async fn snapshot(&self) -> Result<GraphSnapshot, AppError>;

    /// Fetch the node listing used to derive per-node content.
    async fn node_listing(&self) -> Result<Vec<NodeRecord>, AppError>;
}

/// Reads both payloads from JSON files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    snapshot: PathBuf,
    nodes: Option<PathBuf>,
}

impl FileSource {
    pub fn new(snapshot: impl Into<PathBuf>, nodes: Option<PathBuf>) -> Self {
        Self {
            snapshot: snapshot.into(),
            nodes,
        }
    }
}

async fn read(path: &Path) -> Result<String, AppError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path, e))
}

#[async_trait]
impl GraphSource for FileSource {
    async fn snapshot(&self) -> Result<GraphSnapshot, AppError> {
        let raw = read(&self.snapshot).await?;
        GraphSnapshot::from_json(&raw)
    }

    async fn node_listing(&self) -> Result<Vec<NodeRecord>, AppError> {
        let Some(path) = &self.nodes else {
            return Ok(Vec::new());
        };
        let raw = read(path).await?;
        serde_json::from_str(&raw).map_err(|e| AppError::json(path, e))
    }
}

/// Fetch the snapshot and content map concurrently.
///
/// A snapshot failure aborts; a listing failure degrades to an empty content
/// map so every node shows the placeholder text.
pub async fn load_inputs(
    source: &dyn GraphSource,
) -> Result<(GraphSnapshot, NodeContentMap), AppError> {
    let (snapshot, content) = tokio::join!(source.snapshot(), load_content(source));
    let snapshot = snapshot?;

    tracing::debug!(
        series = snapshot.data.len(),
        content_entries = content.len(),
        "Loaded graph inputs"
    );
    Ok((snapshot, content))
}

/// Fetch the node listing on its own. Never fails: an unavailable listing
/// yields an empty map.
pub async fn load_content(source: &dyn GraphSource) -> NodeContentMap {
    match source.node_listing().await {
        Ok(records) => NodeContentMap::from_records(&records),
        Err(e) => {
            tracing::warn!(error = %e, "Node listing unavailable, using placeholder content");
            NodeContentMap::new()
        }
    }
}
