//! Validated, indexed view of a catalog document.
//!
//! The index enforces the expected schema version and rejects documents whose
//! entries could not be addressed unambiguously by a versioned id: empty ids
//! or versions, ids ending in the delimiter, duplicate pairs, and entries that
//! claim the reserved default version.

use crate::catalog::identity::{CatalogBundle, DEFAULT_VERSION, VERSION_DELIMITER};
use crate::catalog::model::{CatalogDocument, CatalogEntry};
use crate::catalog::repository::CatalogRepository;
use crate::schema_loader::{load_json_schema, validate_instance};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The only catalog document version this build understands.
pub const CATALOG_SCHEMA_VERSION: &str = "catalog_loader_v1";

/// Compiled into the crate so validation never depends on the install layout.
const CATALOG_SCHEMA: &str = include_str!("../../schema/catalog.schema.json");

#[derive(Debug)]
/// Catalog entries loaded into a store, plus the document's bundle exports
/// and builtin references.
pub struct CatalogIndex {
    repository: CatalogRepository,
    bundles: BTreeMap<CatalogBundle, Vec<String>>,
    builtins: Vec<String>,
}

impl CatalogIndex {
    /// Load, schema-validate and index a catalog document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening catalog {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing catalog {}", path.display()))?;

        let schema = load_json_schema(
            CATALOG_SCHEMA,
            "catalog.schema.json",
            &allowed_schema_versions(),
        )?;
        validate_instance(&schema, &value, &format!("catalog {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            schema_version = %schema.schema_version,
            "Catalog document passed schema validation"
        );

        let document: CatalogDocument = serde_json::from_value(value)
            .with_context(|| format!("decoding catalog {}", path.display()))?;
        let index =
            Self::from_document(document).with_context(|| format!("indexing {}", path.display()))?;
        if index.repository.is_empty() {
            tracing::warn!(path = %path.display(), "Catalog document has no entries");
        }
        Ok(index)
    }

    /// Index an already-decoded document, applying the semantic checks the
    /// schema cannot express.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        validate_schema_version(&document.schema_version)?;

        let mut repository = CatalogRepository::new();
        let mut seen = BTreeSet::new();
        for entry in document.entries {
            validate_entry(&entry)?;
            if !seen.insert((entry.id.clone(), entry.version.clone())) {
                bail!("duplicate catalog entry {}", entry.catalog_item_id());
            }
            repository.register(entry);
        }

        for (bundle, exports) in &document.bundles {
            if bundle.as_str().trim().is_empty() {
                bail!("bundles must not contain empty descriptors");
            }
            if exports.iter().any(|reference| reference.trim().is_empty()) {
                bail!("bundle {bundle} exports an empty reference");
            }
        }

        Ok(Self {
            repository,
            bundles: document.bundles,
            builtins: document.builtins,
        })
    }

    pub fn repository(&self) -> &CatalogRepository {
        &self.repository
    }

    /// References each bundle exports once registered.
    pub fn bundle_exports(&self) -> &BTreeMap<CatalogBundle, Vec<String>> {
        &self.bundles
    }

    /// References the default resolution source knows.
    pub fn builtins(&self) -> &[String] {
        &self.builtins
    }
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from([CATALOG_SCHEMA_VERSION.to_string()])
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }
    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }
    Ok(())
}

fn validate_entry(entry: &CatalogEntry) -> Result<()> {
    if entry.id.trim().is_empty() {
        bail!("encountered catalog entry with no id");
    }
    if entry.id.ends_with(VERSION_DELIMITER) {
        bail!(
            "catalog entry id '{}' must not end with '{}'",
            entry.id,
            VERSION_DELIMITER
        );
    }
    if entry.version.trim().is_empty() {
        bail!("catalog entry {} has an empty version", entry.id);
    }
    if entry.version.contains(VERSION_DELIMITER) {
        bail!(
            "catalog entry {} version '{}' must not contain '{}'",
            entry.id,
            entry.version,
            VERSION_DELIMITER
        );
    }
    if entry.version == DEFAULT_VERSION {
        bail!(
            "catalog entry {} uses the reserved version {}",
            entry.id,
            DEFAULT_VERSION
        );
    }
    if entry
        .library_slice()
        .iter()
        .any(|bundle| bundle.as_str().trim().is_empty())
    {
        bail!("catalog entry {} lists an empty library", entry.catalog_item_id());
    }
    Ok(())
}
