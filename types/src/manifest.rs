use crate::Attributes;
use serde::Deserialize;

/// One entry of the bootstrap manifest: a collection to provision under
/// the root namespace, with the attributes it should converge to.
///
/// The manifest file is a JSON array of these objects; `attrs` may be
/// omitted for collections that carry no attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionDef {
    /// Short collection id; the canonical name is `{namespace}.{id}`.
    pub id: String,

    /// Desired attributes, applied via a full replace after resolution.
    #[serde(default)]
    pub attrs: Attributes,
}
