use serde::{Deserialize, Serialize};

/// The three resource kinds the JAM backend manages.
///
/// A kind maps one-to-one to the fixed JSON:API `type` string carried in
/// every creation and replace envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Namespaces,
    Collections,
    Documents,
}

impl ResourceKind {
    /// The JSON:API `type` string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Namespaces => "namespaces",
            ResourceKind::Collections => "collections",
            ResourceKind::Documents => "documents",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceKind;

    #[test]
    fn type_strings_match_wire_convention() {
        assert_eq!(ResourceKind::Namespaces.as_str(), "namespaces");
        assert_eq!(ResourceKind::Collections.as_str(), "collections");
        assert_eq!(ResourceKind::Documents.as_str(), "documents");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_value(ResourceKind::Collections).unwrap();
        assert_eq!(json, serde_json::json!("collections"));
    }
}
