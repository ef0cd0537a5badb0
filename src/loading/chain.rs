//! Try-in-order resolution over a fixed list of sources.

use crate::error::LoadingError;
use crate::loading::source::{Resolved, ResolutionSource};
use std::fmt;
use std::sync::Arc;

/// Ordered primary sources plus exactly one secondary fallback.
///
/// Primaries are tried in insertion order and never deduplicated; the
/// secondary is tried only after every primary answered "not found". Chains
/// are built per request and not shared.
#[derive(Clone)]
pub struct ResolutionChain {
    primary: Vec<Arc<dyn ResolutionSource>>,
    secondary: Arc<dyn ResolutionSource>,
    entry_id: Option<String>,
}

impl ResolutionChain {
    pub fn new(secondary: Arc<dyn ResolutionSource>) -> Self {
        Self {
            primary: Vec::new(),
            secondary,
            entry_id: None,
        }
    }

    /// Record the catalog entry this chain was composed for. Failed lookups
    /// name it even when no source carries the entry's tag.
    pub fn for_entry(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }

    pub fn entry_id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    /// Append a primary source after the existing ones.
    pub fn add(&mut self, source: Arc<dyn ResolutionSource>) {
        self.primary.push(source);
    }

    /// Number of sources including the secondary.
    pub fn len(&self) -> usize {
        self.primary.len() + 1
    }

    /// Labels in the order sources are tried.
    pub fn labels(&self) -> Vec<String> {
        self.sources().map(|source| source.label()).collect()
    }

    /// Entry id of the first tagged primary source.
    pub fn catalog_item_id(&self) -> Option<&str> {
        self.primary
            .iter()
            .find_map(|source| source.catalog_item_id())
    }

    /// Try each source in order; the first answer wins.
    pub fn resolve(&self, reference: &str) -> Result<Resolved, LoadingError> {
        if let Some(resolved) = self.sources().find_map(|source| source.resolve(reference)) {
            return Ok(resolved);
        }
        tracing::trace!(
            reference,
            sources = ?self.labels(),
            "Reference not found in any source"
        );
        Err(LoadingError::NotFound {
            reference: reference.to_string(),
            entry_id: self
                .entry_id
                .clone()
                .or_else(|| self.catalog_item_id().map(str::to_string)),
        })
    }

    fn sources(&self) -> impl Iterator<Item = &Arc<dyn ResolutionSource>> {
        self.primary.iter().chain(std::iter::once(&self.secondary))
    }
}

impl fmt::Debug for ResolutionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionChain")
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .field("entry_id", &self.entry_id)
            .finish()
    }
}

/// A chain can stand in for a single source, e.g. as an ambient override.
impl ResolutionSource for ResolutionChain {
    fn label(&self) -> String {
        format!("chain[{}]", self.labels().join(", "))
    }

    fn resolve(&self, reference: &str) -> Option<Resolved> {
        ResolutionChain::resolve(self, reference).ok()
    }

    fn catalog_item_id(&self) -> Option<&str> {
        ResolutionChain::catalog_item_id(self)
    }
}
