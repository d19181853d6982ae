//! The bootstrap flow.
//!
//! For each manifest entry the orchestrator resolves or creates the
//! collection, then always issues a full attribute replace - get-or-create
//! discards attributes for pre-existing resources, so the replace is what
//! forces convergence - and finally userifies the `accounts` collection,
//! strictly after its replace has completed.

use jam_client::{Jam, JamError, Namespace};
use jam_config::{Config, ConfigError};
use jam_types::{Attributes, CollectionDef};
use serde_json::{Value, json};

/// ADMIN grant seeded alongside the owner on every namespace creation.
const SYSTEM_OWNER: &str = "system-system-system";

/// The collection that gets the userify treatment.
const ACCOUNTS_ID: &str = "accounts";

/// Everything one bootstrap run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct BootstrapSpec {
    /// Root namespace all collections live under.
    pub namespace: String,
    /// GUID of the admin identity granted ADMIN on the namespace.
    pub admin_guid: String,
    /// Manifest of collections to provision.
    pub collections: Vec<CollectionDef>,
    /// Provision manifest entries concurrently instead of in manifest
    /// order. Each entry's internal chain stays strictly ordered either
    /// way.
    pub parallel: bool,
}

impl BootstrapSpec {
    /// Build a spec from resolved configuration and a loaded manifest.
    pub fn from_config(
        config: &Config,
        collections: Vec<CollectionDef>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            namespace: config.namespace()?.to_string(),
            admin_guid: config.admin_guid()?.to_string(),
            collections,
            parallel: config.parallel(),
        })
    }
}

/// Ensure the root namespace and every manifest collection exist and carry
/// their declared attributes.
///
/// Every mutation is awaited and every failure propagates to the caller;
/// nothing here is fire-and-forget. In sequential mode (the default) a
/// failing entry stops the run; in parallel mode the first failure is
/// returned and the remaining in-flight entries are dropped at that await
/// point.
pub async fn run(jam: &Jam, spec: &BootstrapSpec) -> Result<(), JamError> {
    let attrs = seed_permissions(&spec.admin_guid);
    tracing::info!(namespace = %spec.namespace, "bootstrapping namespace");
    let ns = jam.get_or_create_namespace(&spec.namespace, &attrs).await?;

    if spec.parallel {
        futures_util::future::try_join_all(spec.collections.iter().map(|def| provision(&ns, def)))
            .await?;
    } else {
        for def in &spec.collections {
            provision(&ns, def).await?;
        }
    }
    Ok(())
}

async fn provision(ns: &Namespace, def: &CollectionDef) -> Result<(), JamError> {
    let name = format!("{}.{}", ns.name(), def.id);
    tracing::info!(collection = %def.id, "bootstrapping collection");
    let collection = ns.get_or_create(&name, &def.attrs).await?;

    tracing::info!(collection = %def.id, "updating collection");
    collection.replace_attributes(&def.attrs).await?;

    // The replace overwrites /schema and /flags, so userify must not start
    // until the replace response has been observed.
    if def.id == ACCOUNTS_ID {
        tracing::info!(collection = %def.id, "userifying collection");
        collection.userify(false).await?;
    }
    Ok(())
}

/// Namespace creation attributes: exactly two ADMIN permission entries,
/// the system identity and `user-osf-{admin_guid}`.
fn seed_permissions(admin_guid: &str) -> Attributes {
    let mut permissions = serde_json::Map::new();
    permissions.insert(SYSTEM_OWNER.to_string(), json!("ADMIN"));
    permissions.insert(format!("user-osf-{admin_guid}"), json!("ADMIN"));

    let mut attrs = Attributes::new();
    attrs.insert("permissions".to_string(), Value::Object(permissions));
    attrs
}
