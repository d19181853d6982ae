//! Collection resource handle and the userify operation.

use crate::{Context, JamError, wire};
use jam_types::{Attributes, PatchOp, ResourceKind};
use serde_json::{Value, json};
use std::sync::Arc;

/// A confirmed handle to one collection resource.
///
/// The collection keeps its namespace's name only to compose its canonical
/// URL; the shared context carries the inherited token. Neither is ever
/// used to mutate the parent.
pub struct Collection {
    ctx: Arc<Context>,
    name: String,
    url: String,
}

impl Collection {
    pub(crate) async fn confirm(
        ctx: Arc<Context>,
        namespace: &str,
        name: &str,
    ) -> Result<Self, JamError> {
        let url = format!(
            "{}/v1/id/collections/{namespace}.{}",
            ctx.base,
            shortname(name)
        );
        ctx.get(&url).await?;
        Ok(Self {
            ctx,
            name: name.to_string(),
            url,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch a single document by id, returning its JSON body.
    pub async fn document(&self, id: &str) -> Result<Value, JamError> {
        let url = format!("{}/documents/{id}", self.url);
        self.ctx.get(&url).await
    }

    /// Create a document, returning the server response body.
    pub async fn create_document(&self, id: &str, attrs: &Attributes) -> Result<Value, JamError> {
        let body = wire::resource_envelope(id, ResourceKind::Documents, attrs);
        let url = format!("{}/documents", self.url);
        self.ctx.post(&url, &body).await
    }

    /// Replace this collection's attributes wholesale.
    ///
    /// A full replace overwrites `/schema` and `/flags`, so any
    /// [`Collection::userify`] must be issued strictly after this call's
    /// response has been observed.
    pub async fn replace_attributes(&self, attrs: &Attributes) -> Result<Value, JamError> {
        let body = wire::resource_envelope(&self.name, ResourceKind::Collections, attrs);
        self.ctx.patch(&self.url, wire::CONTENT_TYPE, &body).await
    }

    /// Apply an ordered JSON Patch sequence to this collection.
    pub async fn apply_patch(&self, ops: &[PatchOp]) -> Result<Value, JamError> {
        self.ctx
            .patch(&self.url, wire::PATCH_CONTENT_TYPE, &json!(ops))
            .await
    }

    /// Convert this collection into a user store.
    ///
    /// Issues one three-operation JSON Patch: install the password schema
    /// at `/schema`, set `/flags/userCollection` to `true`, and set
    /// `/flags/createdIsOwner` to the negation of `created_is_owner` (so
    /// `userify(false)` - the common call - makes creators owners).
    pub async fn userify(&self, created_is_owner: bool) -> Result<Value, JamError> {
        let ops = [
            PatchOp::add("/schema", user_schema()),
            PatchOp::add("/flags/userCollection", json!(true)),
            PatchOp::add("/flags/createdIsOwner", json!(!created_is_owner)),
        ];
        self.apply_patch(&ops).await
    }
}

/// Everything after the first `.` of a full collection name; the name
/// itself when it has no namespace prefix.
fn shortname(name: &str) -> &str {
    name.split_once('.').map_or(name, |(_, rest)| rest)
}

/// Validation schema installed by userify: documents must carry a
/// `password` string matching a bcrypt hash.
fn user_schema() -> Value {
    json!({
        "type": "jsonschema",
        "schema": {
            "id": "/",
            "type": "object",
            "properties": {
                "password": {
                    "id": "password",
                    "type": "string",
                    "pattern": "^\\$2b\\$1[0-3]\\$\\S{53}$"
                }
            },
            "required": ["password"]
        }
    })
}
