//! Chart-style graph snapshot as produced by the upstream topic service.
//!
//! The payload is a figure description with a `data` array of series. One
//! series draws node markers, another draws edges as a flattened polyline
//! where every third sample is a `null` gap marker:
//!
//! ```json
//! {
//!   "data": [
//!     { "mode": "lines", "x": [0.0, 0.5, null], "y": [0.0, 0.2, null] },
//!     { "mode": "markers+text", "x": [0.0, 0.5], "y": [0.0, 0.2],
//!       "text": ["Hobbies", "Travel"], "ids": [1, 2] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// The external graph input. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Chart series; only the first markers and first lines series are used.
    pub data: Vec<Series>,
}

/// One chart series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Drawing mode, e.g. `"markers+text"` or `"lines"`.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub x: Vec<Option<f64>>,
    #[serde(default)]
    pub y: Vec<Option<f64>>,
    /// Per-point display labels.
    #[serde(default)]
    pub text: Vec<Option<String>>,
    /// Per-point node ids (strings or integers upstream).
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub ids: Vec<String>,
}

impl Series {
    fn has_mode(&self, mode: &str) -> bool {
        self.mode.as_deref().is_some_and(|m| m.contains(mode))
    }
}

impl GraphSnapshot {
    /// Parse and validate a snapshot payload.
    ///
    /// A payload that is not JSON, or that has no `data` array, is malformed.
    /// A payload whose `data` lacks a points series is a valid empty graph.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| AppError::MalformedSnapshot(format!("not JSON: {e}")))?;

        if !value.get("data").is_some_and(|d| d.is_array()) {
            return Err(AppError::MalformedSnapshot(
                "missing `data` series array".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| AppError::MalformedSnapshot(e.to_string()))
    }

    /// The node markers series, if any.
    pub fn points(&self) -> Option<&Series> {
        self.data.iter().find(|s| s.has_mode("markers"))
    }

    /// The edge polyline series, if any.
    pub fn lines(&self) -> Option<&Series> {
        self.data.iter().find(|s| s.has_mode("lines"))
    }
}

/// Node ids arrive as database integers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(i) => i.to_string(),
            RawId::Float(f) => f.to_string(),
            RawId::Str(s) => s,
        }
    }
}

/// Deserialize a single id that may be a string or a number.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<RawId> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "data": [
            { "mode": "lines", "x": [0.0, 0.5, null], "y": [0.0, 0.2, null] },
            { "mode": "markers+text", "x": [0.0, 0.5], "y": [0.0, 0.2],
              "text": ["Hobbies", "Travel"], "ids": [1, "two"] }
        ],
        "layout": { "showlegend": false }
    }"#;

    #[test]
    fn test_parse_series_by_mode() {
        let snapshot = GraphSnapshot::from_json(SAMPLE).unwrap();

        let points = snapshot.points().unwrap();
        assert_eq!(points.ids, vec!["1".to_string(), "two".to_string()]);
        assert_eq!(points.text[0].as_deref(), Some("Hobbies"));

        let lines = snapshot.lines().unwrap();
        assert_eq!(lines.x, vec![Some(0.0), Some(0.5), None]);
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = GraphSnapshot::from_json("<html>").unwrap_err();
        assert!(matches!(err, AppError::MalformedSnapshot(_)));
    }

    #[test]
    fn test_missing_data_is_malformed() {
        let err = GraphSnapshot::from_json(r#"{"layout": {}}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedSnapshot(_)));
    }

    #[test]
    fn test_missing_points_series_is_empty_graph() {
        let snapshot =
            GraphSnapshot::from_json(r#"{"data": [{"mode": "lines", "x": [], "y": []}]}"#)
                .unwrap();
        assert!(snapshot.points().is_none());
        assert!(snapshot.lines().is_some());
    }
}
