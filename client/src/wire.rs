//! JSON:API envelopes and content types.

use crate::JamError;
use jam_types::{Attributes, ResourceKind};
use serde_json::{Value, json};

/// Content type for whole-resource operations (create, full replace).
pub(crate) const CONTENT_TYPE: &str = "application/vnd.api+json";

/// Content type for JSON Patch partial updates. The trailing semicolon is
/// what the backend expects; do not "fix" it.
pub(crate) const PATCH_CONTENT_TYPE: &str = "application/vnd.api+json ext=\"jsonpatch\";";

/// The `{"data": {"id", "type", "attributes"}}` envelope shared by resource
/// creation and full replace.
pub(crate) fn resource_envelope(id: &str, kind: ResourceKind, attrs: &Attributes) -> Value {
    json!({
        "data": {
            "id": id,
            "type": kind.as_str(),
            "attributes": attrs
        }
    })
}

/// Unwrap a JSON:API list response into its `data` array.
pub(crate) fn unwrap_data(body: Value, url: &str) -> Result<Vec<Value>, JamError> {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(JamError::unparseable(url, &"response has no data array")),
        },
        _ => Err(JamError::unparseable(url, &"response is not a JSON object")),
    }
}
