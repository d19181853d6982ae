//! JSON:API resource client for a JAM backend.
//!
//! # Architecture
//!
//! The crate is organized around a hierarchy of confirmed resource handles:
//!
//! - [`Jam`] - Entry point bound to a base URL and auth token; resolves
//!   namespace handles
//! - [`Namespace`] - One namespace resource; resolves collection handles
//! - [`Collection`] - One collection resource; document operations and
//!   [`Collection::userify`]
//!
//! A handle exists only for a resource the backend has confirmed: every
//! constructor issues a GET against the resource URL and fails with a
//! not-found classified [`JamError`] when the resource is absent. The
//! get-or-create resolvers ([`Jam::get_or_create_namespace`],
//! [`Namespace::get_or_create`]) build on that contract: attempt the
//! confirming read, create only on not-found, then re-resolve.
//!
//! All handles share one immutable context (HTTP client, base URL, verbatim
//! auth token) by reference. The parent link a collection keeps to its
//! namespace is exactly that shared context plus the namespace name used for
//! URL composition; it is never used to mutate the parent.
//!
//! # Wire protocol
//!
//! Whole-resource operations travel in the JSON:API envelope
//! `{"data": {"id", "type", "attributes"}}` with content type
//! `application/vnd.api+json`. Partial updates travel as a JSON Patch
//! operation array with the `ext="jsonpatch"` content type. The two shapes
//! are separate named operations (`replace_attributes` / `apply_patch`);
//! the content type follows the operation, never a caller flag.
//!
//! # Error Handling
//!
//! Every failure surfaces as a [`JamError`] carrying an [`ErrorKind`] and the
//! request URL. The client performs no retry and no local recovery; the only
//! branch on error kind anywhere is the resolver's not-found check.

mod collection;
mod error;
mod namespace;
mod wire;

pub use collection::Collection;
pub use error::{ErrorKind, JamError};
pub use namespace::Namespace;

use jam_types::{Attributes, ResourceKind};
use reqwest::header;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const CONNECT_TIMEOUT_SECS: u64 = 30;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Immutable state shared by every handle in one client hierarchy.
///
/// The token is inherited down the hierarchy by reference and passed through
/// to the `Authorization` header verbatim; no scheme prefix is added.
#[derive(Debug)]
pub(crate) struct Context {
    http: reqwest::Client,
    pub(crate) base: String,
    token: String,
}

impl Context {
    pub(crate) async fn get(&self, url: &str) -> Result<serde_json::Value, JamError> {
        self.execute(self.http.get(url), url).await
    }

    pub(crate) async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, JamError> {
        let request = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, wire::CONTENT_TYPE)
            .json(body);
        self.execute(request, url).await
    }

    pub(crate) async fn patch(
        &self,
        url: &str,
        content_type: &'static str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, JamError> {
        let request = self
            .http
            .patch(url)
            .header(header::CONTENT_TYPE, content_type)
            .json(body);
        self.execute(request, url).await
    }

    pub(crate) async fn delete(&self, url: &str) -> Result<(), JamError> {
        let response = self
            .http
            .delete(url)
            .header(header::AUTHORIZATION, &self.token)
            .send()
            .await
            .map_err(|e| JamError::transport(url, &e))?;
        classify_status(url, response).await.map(drop)
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<serde_json::Value, JamError> {
        let response = request
            .header(header::AUTHORIZATION, &self.token)
            .send()
            .await
            .map_err(|e| JamError::transport(url, &e))?;
        let response = classify_status(url, response).await?;
        parse_body(url, response).await
    }
}

/// Reject non-2xx responses, classifying the status into an [`ErrorKind`].
async fn classify_status(
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, JamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = read_capped_error_body(response).await;
    Err(JamError::from_status(url, status, detail))
}

async fn parse_body(url: &str, response: reqwest::Response) -> Result<serde_json::Value, JamError> {
    let text = response
        .text()
        .await
        .map_err(|e| JamError::transport(url, &e))?;
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| JamError::unparseable(url, &e))
}

async fn read_capped_error_body(response: reqwest::Response) -> String {
    let Ok(mut text) = response.text().await else {
        return String::new();
    };
    if text.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("...(truncated)");
    }
    text
}

/// Client for one JAM backend, addressed at `{base}/v1/namespaces`.
///
/// Create it once at startup from the resolved configuration and pass it
/// down; every handle it resolves shares its HTTP client and token.
pub struct Jam {
    ctx: Arc<Context>,
    url: String,
}

impl Jam {
    /// Build a client for `base_url` authenticating with `token`.
    ///
    /// The token is sent verbatim in the `Authorization` header of every
    /// request. Accepting a parsed [`Url`] keeps URL validation at the
    /// configuration boundary.
    pub fn new(base_url: &Url, token: impl Into<String>) -> Result<Self, JamError> {
        let base = base_url.as_str().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| JamError::transport(&base, &e))?;
        let url = format!("{base}/v1/namespaces");
        Ok(Self {
            ctx: Arc::new(Context {
                http,
                base,
                token: token.into(),
            }),
            url,
        })
    }

    /// Resolve a confirmed handle to an existing namespace.
    pub async fn namespace(&self, name: &str) -> Result<Namespace, JamError> {
        Namespace::confirm(Arc::clone(&self.ctx), name).await
    }

    /// Create a namespace, then re-resolve it into a confirmed handle.
    pub async fn create_namespace(
        &self,
        name: &str,
        attrs: &Attributes,
    ) -> Result<Namespace, JamError> {
        let body = wire::resource_envelope(name, ResourceKind::Namespaces, attrs);
        self.ctx.post(&self.url, &body).await?;
        self.namespace(name).await
    }

    /// Resolve `name` to a confirmed namespace handle, creating it only if
    /// the existence check reports it absent.
    ///
    /// When the namespace already exists `attrs` are discarded; existing
    /// resources are never retroactively updated here. Callers that need
    /// attribute convergence issue [`Namespace::replace_attributes`]
    /// afterwards.
    pub async fn get_or_create_namespace(
        &self,
        name: &str,
        attrs: &Attributes,
    ) -> Result<Namespace, JamError> {
        match self.namespace(name).await {
            Ok(ns) => Ok(ns),
            Err(e) if e.is_not_found() => {
                tracing::debug!(namespace = name, "namespace absent, creating");
                self.create_namespace(name, attrs).await
            }
            Err(e) => Err(e),
        }
    }

    /// List namespaces, returning the backend's JSON body as-is.
    pub async fn list(&self) -> Result<serde_json::Value, JamError> {
        self.ctx.get(&self.url).await
    }
}
