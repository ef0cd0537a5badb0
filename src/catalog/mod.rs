//! Catalog wiring: versioned ids, entries, stores and lookup.
//!
//! `identity` owns the `id:version` codec. `CatalogStore` is the lookup seam
//! the rest of the crate depends on; `CatalogRepository` is the in-memory
//! store and `CatalogIndex` loads one from a validated JSON document.

pub mod identity;
pub mod index;
pub mod model;
pub mod repository;
pub mod resolver;

pub use identity::{
    CatalogBundle, CatalogItemKind, DEFAULT_VERSION, VERSION_DELIMITER, VersionedId,
    format_versioned_id, has_version_delimiter, split_id, split_version,
};
pub use index::{CATALOG_SCHEMA_VERSION, CatalogIndex};
pub use model::{CatalogDocument, CatalogEntry};
pub use repository::{CatalogRepository, CatalogStore, compare_versions};
pub use resolver::{resolve_entry, resolve_entry_of_kind};
