//! Deserializable representation of a catalog document.
//!
//! The types mirror `schema/catalog.schema.json`. Use `CatalogIndex` for
//! validation and lookup; use these structs when the whole document is needed
//! (bundle exports, builtin references).

use crate::catalog::identity::{CatalogBundle, CatalogItemKind, VersionedId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Deserialize)]
/// Full catalog document as stored on disk.
pub struct CatalogDocument {
    pub schema_version: String,
    pub entries: Vec<CatalogEntry>,
    /// References each bundle exports once registered.
    #[serde(default)]
    pub bundles: BTreeMap<CatalogBundle, Vec<String>>,
    /// References the default resolution source always knows.
    #[serde(default)]
    pub builtins: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// One installable building block.
///
/// `libraries` keeps `None` apart from an empty list: a missing list is
/// treated as empty but logged, since well-formed entries always carry one.
pub struct CatalogEntry {
    pub id: String,
    pub version: String,
    pub kind: CatalogItemKind,
    #[serde(default)]
    pub libraries: Option<Vec<CatalogBundle>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, version: impl Into<String>, kind: CatalogItemKind) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            kind,
            libraries: Some(Vec::new()),
            description: None,
        }
    }

    pub fn with_libraries(mut self, libraries: Option<Vec<CatalogBundle>>) -> Self {
        self.libraries = libraries;
        self
    }

    pub fn versioned_id(&self) -> VersionedId {
        VersionedId::new(self.id.clone(), self.version.clone())
    }

    /// The id stamped onto objects created from this entry.
    pub fn catalog_item_id(&self) -> String {
        self.versioned_id().to_string()
    }

    /// Libraries as a slice; `None` reads as empty.
    pub fn library_slice(&self) -> &[CatalogBundle] {
        self.libraries.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_libraries_stay_distinct_from_empty() {
        let absent: CatalogEntry = serde_json::from_value(json!({
            "id": "redis",
            "version": "1.0",
            "kind": "entity"
        }))
        .unwrap();
        assert_eq!(absent.libraries, None);
        assert!(absent.library_slice().is_empty());

        let empty: CatalogEntry = serde_json::from_value(json!({
            "id": "redis",
            "version": "1.0",
            "kind": "entity",
            "libraries": []
        }))
        .unwrap();
        assert_eq!(empty.libraries, Some(Vec::new()));
    }

    #[test]
    fn catalog_item_id_joins_id_and_version() {
        let entry = CatalogEntry::new("org.example:web", "2.0", CatalogItemKind::Template);
        assert_eq!(entry.catalog_item_id(), "org.example:web:2.0");
    }

    #[test]
    fn document_defaults_bundles_and_builtins() {
        let doc: CatalogDocument = serde_json::from_value(json!({
            "schema_version": "catalog_loader_v1",
            "entries": []
        }))
        .unwrap();
        assert!(doc.bundles.is_empty());
        assert!(doc.builtins.is_empty());
    }
}
