//! Individual resolution strategies: an entry's bundles and fixed reference
//! sets.

use crate::bundles::BundleManager;
use crate::catalog::CatalogBundle;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A successfully resolved reference and where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub reference: String,
    /// Label of the source that answered.
    pub source: String,
    /// Catalog entry whose bundles supplied the reference, if any.
    pub catalog_item_id: Option<String>,
}

/// One strategy in a resolution chain.
///
/// Sources answer "resolved" or "not found"; there is no partial answer.
pub trait ResolutionSource: Send + Sync {
    /// Short human-readable name used in diagnostics and CLI output.
    fn label(&self) -> String;

    fn resolve(&self, reference: &str) -> Option<Resolved>;

    /// Catalog entry this source is tagged with. Only bundle sources are.
    fn catalog_item_id(&self) -> Option<&str> {
        None
    }
}

impl fmt::Debug for dyn ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Resolves exclusively from one catalog entry's bundles.
pub struct BundleSource {
    entry_id: String,
    libraries: Vec<CatalogBundle>,
    manager: Option<Arc<dyn BundleManager>>,
}

impl BundleSource {
    pub fn new(
        entry_id: impl Into<String>,
        libraries: Vec<CatalogBundle>,
        manager: Option<Arc<dyn BundleManager>>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            libraries,
            manager,
        }
    }
}

impl ResolutionSource for BundleSource {
    fn label(&self) -> String {
        format!("bundles({})", self.entry_id)
    }

    fn resolve(&self, reference: &str) -> Option<Resolved> {
        let manager = self.manager.as_ref().filter(|m| m.is_available())?;
        self.libraries
            .iter()
            .find(|bundle| manager.lookup(bundle, reference))
            .map(|bundle| Resolved {
                reference: reference.to_string(),
                source: format!("{}[{}]", self.label(), bundle),
                catalog_item_id: Some(self.entry_id.clone()),
            })
    }

    fn catalog_item_id(&self) -> Option<&str> {
        Some(&self.entry_id)
    }
}

/// Source that knows a fixed set of references.
///
/// Used for the process-wide default and for builtin or test overrides.
#[derive(Clone, Debug)]
pub struct KnownReferences {
    name: String,
    references: BTreeSet<String>,
}

impl KnownReferences {
    pub fn new<I, S>(name: impl Into<String>, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            references: references.into_iter().map(Into::into).collect(),
        }
    }
}

impl ResolutionSource for KnownReferences {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn resolve(&self, reference: &str) -> Option<Resolved> {
        self.references.contains(reference).then(|| Resolved {
            reference: reference.to_string(),
            source: self.name.clone(),
            catalog_item_id: None,
        })
    }
}
