use serde::{Deserialize, Serialize};

/// A single JSON Patch operation.
///
/// Serializes exactly as `{"op": ..., "path": ..., "value": ...}` so an
/// ordered sequence of these can be sent to the backend verbatim. The
/// client only ever emits `add` operations targeting object leaves, which
/// keeps repeated application idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: String,
    pub path: String,
    pub value: serde_json::Value,
}

impl PatchOp {
    /// An `add` operation setting `path` to `value`.
    #[must_use]
    pub fn add(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            op: "add".to_string(),
            path: path.into(),
            value,
        }
    }
}
