//! Metadata side-car types

use costbot_core::MetadataFetchError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute map of one source document.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Structured attributes describing one source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    /// Locator of the source document (not of the side-car)
    pub source_locator: String,

    pub attributes: Attributes,
}

impl SourceMetadata {
    /// Attribute as display text; numbers and booleans are formatted,
    /// other shapes are treated as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        attribute_text(&self.attributes, key)
    }
}

/// On-disk shape of a `*.metadata.json` side-car.
#[derive(Debug, Deserialize)]
pub(crate) struct SidecarDocument {
    #[serde(rename = "metadataAttributes", default)]
    pub metadata_attributes: Attributes,
}

/// Attribute `key` of `attributes` rendered as text.
pub fn attribute_text(attributes: &Attributes, key: &str) -> Option<String> {
    match attributes.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolution failure for a single locator.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorFailure {
    pub source_locator: String,
    pub error: MetadataFetchError,
}

/// Outcome of resolving the side-cars of one response.
///
/// Every requested locator ends up either in `metadata` or in `failures`.
#[derive(Debug, Clone, Default)]
pub struct MetadataResolution {
    pub metadata: HashMap<String, SourceMetadata>,
    pub failures: Vec<LocatorFailure>,
}

impl MetadataResolution {
    pub fn get(&self, source_locator: &str) -> Option<&SourceMetadata> {
        self.metadata.get(source_locator)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_text() {
        let attributes = json!({
            "show_name": "AWS Made Easy",
            "ep_num": 42,
            "featured": true,
            "tags": ["a", "b"]
        });
        let attributes = attributes.as_object().unwrap();

        assert_eq!(attribute_text(attributes, "show_name").as_deref(), Some("AWS Made Easy"));
        assert_eq!(attribute_text(attributes, "ep_num").as_deref(), Some("42"));
        assert_eq!(attribute_text(attributes, "featured").as_deref(), Some("true"));
        assert_eq!(attribute_text(attributes, "tags"), None);
        assert_eq!(attribute_text(attributes, "missing"), None);
    }

    #[test]
    fn test_sidecar_without_attributes_is_empty() {
        let doc: SidecarDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.metadata_attributes.is_empty());
    }
}
