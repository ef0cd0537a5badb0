//! Resolution-chain composition for catalog entries and the objects built
//! from them.
//!
//! Every chain is assembled in the same fixed order: the entry's own bundles,
//! then the caller's ambient override, then one default fallback. The
//! override never supersedes the more specific bundle source, and the default
//! is always present.

pub mod chain;
pub mod scope;
pub mod source;

pub use chain::ResolutionChain;
pub use scope::{LoadingScope, OverrideGuard};
pub use source::{BundleSource, KnownReferences, Resolved, ResolutionSource};

use crate::bundles::{BundleManager, install_libraries};
use crate::catalog::{CatalogBundle, CatalogEntry, CatalogStore, resolve_entry};
use crate::diagnostics::DiagnosticMode;
use crate::error::LoadingError;
use crate::lineage::CatalogLineage;
use std::sync::Arc;

/// Process-wide collaborators shared by every composition: the default
/// source and the bundle manager, when one is running.
#[derive(Clone)]
pub struct LoadingEnvironment {
    default_source: Arc<dyn ResolutionSource>,
    bundles: Option<Arc<dyn BundleManager>>,
}

impl LoadingEnvironment {
    pub fn new(default_source: Arc<dyn ResolutionSource>) -> Self {
        Self {
            default_source,
            bundles: None,
        }
    }

    pub fn with_bundle_manager(mut self, manager: Arc<dyn BundleManager>) -> Self {
        self.bundles = Some(manager);
        self
    }

    pub fn default_source(&self) -> &Arc<dyn ResolutionSource> {
        &self.default_source
    }

    /// Build the chain for `entry_id` and its libraries.
    ///
    /// `fallback` replaces the default secondary; it only exists for legacy
    /// entries that predate bundles and bring their own loader.
    pub fn compose(
        &self,
        entry_id: &str,
        libraries: Option<&[CatalogBundle]>,
        scope: &LoadingScope,
        fallback: Option<Arc<dyn ResolutionSource>>,
    ) -> ResolutionChain {
        let secondary = fallback.unwrap_or_else(|| self.default_source.clone());
        let mut chain = ResolutionChain::new(secondary).for_entry(entry_id);

        if let Some(libraries) = libraries.filter(|libraries| !libraries.is_empty()) {
            chain.add(Arc::new(BundleSource::new(
                entry_id,
                libraries.to_vec(),
                self.bundles.clone(),
            )));
        }

        if let Some(ambient) = scope.current_override() {
            chain.add(ambient.clone());
        }

        chain
    }

    /// Chain for a catalog entry; an entry without a library list is treated
    /// as having none.
    pub fn chain_for_entry(&self, entry: &CatalogEntry, scope: &LoadingScope) -> ResolutionChain {
        if entry.libraries.is_none() {
            tracing::debug!(
                entry = %entry.catalog_item_id(),
                "Catalog entry has no library list; treating it as empty"
            );
        }
        self.compose(&entry.catalog_item_id(), entry.libraries.as_deref(), scope, None)
    }

    /// Chain for an object created from a catalog entry.
    ///
    /// Objects without lineage, or whose entry the store no longer knows, get
    /// the default-only chain.
    pub fn chain_for_object<S, O>(
        &self,
        store: &S,
        object: &O,
        scope: &LoadingScope,
    ) -> ResolutionChain
    where
        S: CatalogStore + ?Sized,
        O: CatalogLineage + ?Sized,
    {
        let Some(catalog_item_id) = object
            .catalog_item_id()
            .filter(|id| !id.trim().is_empty())
        else {
            return ResolutionChain::new(self.default_source.clone());
        };

        match resolve_entry(store, Some(catalog_item_id)) {
            Some(entry) => self.chain_for_entry(&entry, scope),
            None => {
                tracing::warn!(
                    catalog_item_id,
                    object = %object.describe(),
                    "Cannot load catalog entry to build the resolution chain; using the default source, later resolution may fail"
                );
                ResolutionChain::new(self.default_source.clone()).for_entry(catalog_item_id)
            }
        }
    }

    /// Register the entry's libraries with the bundle manager.
    pub fn install_entry_libraries(
        &self,
        entry: &CatalogEntry,
        mode: DiagnosticMode,
    ) -> Result<(), LoadingError> {
        install_libraries(self.bundles.as_deref(), entry.libraries.as_deref(), mode)
    }
}
