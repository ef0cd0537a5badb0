//! Resolution layer for a versioned catalog of installable building blocks.
//!
//! A catalog entry names the bundles that supply its code. Before anything is
//! instantiated from an entry, its bundles are installed with the bundle
//! manager (`install_libraries`) and a `ResolutionChain` is composed that
//! tries the entry's bundles, then the caller's ambient override, then the
//! process-wide default. Objects created from an entry carry its versioned id
//! (`id:version`) so later lookups can rebuild the same chain.

pub mod bundles;
pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod lineage;
pub mod loading;
pub mod runtime;
mod schema_loader;

pub use bundles::{BundleManager, InMemoryBundleManager, install_libraries};
pub use catalog::{
    CatalogBundle, CatalogEntry, CatalogIndex, CatalogItemKind, CatalogRepository, CatalogStore,
    DEFAULT_VERSION, VERSION_DELIMITER, VersionedId, format_versioned_id, has_version_delimiter,
    resolve_entry, resolve_entry_of_kind, split_id, split_version,
};
pub use diagnostics::{DiagnosticMode, RebindTracker};
pub use error::LoadingError;
pub use lineage::{CatalogLineage, LineageOutcome, propagate_catalog_item_id};
pub use loading::{
    BundleSource, KnownReferences, LoadingEnvironment, LoadingScope, OverrideGuard, Resolved,
    ResolutionChain, ResolutionSource,
};
