//! Namespace resource handle.

use crate::{Collection, Context, JamError, wire};
use jam_types::{Attributes, PatchOp, ResourceKind};
use serde_json::{Value, json};
use std::sync::Arc;

/// A confirmed handle to one namespace resource.
///
/// Constructed only after a GET against the namespace URL succeeds; the URL
/// is a pure function of the base URL and the namespace name and never
/// changes afterwards.
#[derive(Debug)]
pub struct Namespace {
    ctx: Arc<Context>,
    name: String,
    url: String,
}

impl Namespace {
    pub(crate) async fn confirm(ctx: Arc<Context>, name: &str) -> Result<Self, JamError> {
        let url = format!("{}/v1/id/namespaces/{name}", ctx.base);
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

    /// Resolve a confirmed handle to an existing collection of this
    /// namespace.
    pub async fn collection(&self, name: &str) -> Result<Collection, JamError> {
        Collection::confirm(Arc::clone(&self.ctx), &self.name, name).await
    }

    /// Create a collection, then re-resolve it into a confirmed handle.
    pub async fn create_collection(
        &self,
        name: &str,
        attrs: &Attributes,
    ) -> Result<Collection, JamError> {
        let body = wire::resource_envelope(name, ResourceKind::Collections, attrs);
        let url = format!("{}/collections", self.url);
        self.ctx.post(&url, &body).await?;
        self.collection(name).await
    }

    /// Resolve `name` to a confirmed collection handle, creating it only if
    /// the existence check reports it absent.
    ///
    /// The check-then-create window is not closed: under concurrent callers
    /// both may observe not-found and both may create, and the loser
    /// surfaces the backend's uniqueness rejection as a conflict error. The
    /// backend's constraint is the arbiter; this resolver only avoids
    /// redundant creation in the single-writer case.
    ///
    /// When the collection already exists `attrs` are discarded. Callers
    /// that need attribute convergence issue
    /// [`Collection::replace_attributes`] afterwards.
    pub async fn get_or_create(
        &self,
        name: &str,
        attrs: &Attributes,
    ) -> Result<Collection, JamError> {
        match self.collection(name).await {
            Ok(col) => Ok(col),
            Err(e) if e.is_not_found() => {
                tracing::debug!(collection = name, "collection absent, creating");
                self.create_collection(name, attrs).await
            }
            Err(e) => Err(e),
        }
    }

    /// Replace this namespace's attributes wholesale.
    pub async fn replace_attributes(&self, attrs: &Attributes) -> Result<Value, JamError> {
        let body = wire::resource_envelope(&self.name, ResourceKind::Namespaces, attrs);
        self.ctx.patch(&self.url, wire::CONTENT_TYPE, &body).await
    }

    /// Apply an ordered JSON Patch sequence to this namespace.
    pub async fn apply_patch(&self, ops: &[PatchOp]) -> Result<Value, JamError> {
        self.ctx
            .patch(&self.url, wire::PATCH_CONTENT_TYPE, &json!(ops))
            .await
    }

    /// List this namespace's collections, unwrapped to the `data` array.
    pub async fn list(&self) -> Result<Vec<Value>, JamError> {
        let url = format!("{}/collections", self.url);
        let body = self.ctx.get(&url).await?;
        wire::unwrap_data(body, &url)
    }

    /// Delete a collection by its absolute name (`{namespace}.{shortname}`).
    pub async fn delete_collection(&self, name: &str) -> Result<(), JamError> {
        let url = format!("{}/v1/id/collections/{name}", self.ctx.base);
        self.ctx.delete(&url).await
    }
}
