//! Node listing and per-node content lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::snapshot::deserialize_id;

/// Content shown for a node whose entry has not been supplied.
pub const CONTENT_PLACEHOLDER: &str = "Loading content...";

/// Content derived for a listed node that has no conversation yet.
pub const NO_CONVERSATION_PLACEHOLDER: &str = "No previous conversation.";

/// One entry of the upstream node listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node ID (integer primary key upstream).
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Topic name.
    pub topic: String,
    /// Accumulated `Q:`/`A:` conversation text.
    #[serde(default)]
    pub conversation_log: Option<String>,
    /// Parent topic, if this topic was spawned as a follow-up.
    #[serde(default)]
    pub parent_id: Option<serde_json::Value>,
    /// Follow-up topics spawned from this one.
    #[serde(default)]
    pub children: Vec<serde_json::Value>,
}

impl NodeRecord {
    /// The text shown in the tooltip for this node.
    pub fn content(&self) -> &str {
        match self.conversation_log.as_deref() {
            Some(log) if !log.trim().is_empty() => log,
            _ => NO_CONVERSATION_PLACEHOLDER,
        }
    }
}

/// Mapping from node id to supplementary text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeContentMap {
    entries: HashMap<String, String>,
}

impl NodeContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive id → content pairs from a node listing.
    pub fn from_records(records: &[NodeRecord]) -> Self {
        records
            .iter()
            .map(|r| (r.id.clone(), r.content().to_string()))
            .collect()
    }

    pub fn insert(&mut self, id: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(id.into(), content.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Content for `id`, or [`CONTENT_PLACEHOLDER`] when absent.
    pub fn content_for(&self, id: &str) -> &str {
        self.get(id).unwrap_or(CONTENT_PLACEHOLDER)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for NodeContentMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
