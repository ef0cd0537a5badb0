//! Catalog store seam plus the in-memory store used by the CLI and tests.
//!
//! Lookups keep version selection explicit: callers pass either a concrete
//! version or `DEFAULT_VERSION`, and only the store decides what the sentinel
//! resolves to.

use crate::catalog::identity::{CatalogItemKind, DEFAULT_VERSION};
use crate::catalog::model::CatalogEntry;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Lookup surface of a catalog store.
pub trait CatalogStore {
    /// Find the entry with `id` at `version` (which may be `DEFAULT_VERSION`).
    fn find_entry(&self, id: &str, version: &str) -> Option<CatalogEntry>;

    /// Like `find_entry`, but only returns entries of the expected kind.
    fn find_entry_of_kind(
        &self,
        kind: &CatalogItemKind,
        id: &str,
        version: &str,
    ) -> Option<CatalogEntry> {
        self.find_entry(id, version)
            .filter(|entry| &entry.kind == kind)
    }
}

#[derive(Default, Debug)]
/// In-memory store keyed by id, then version.
pub struct CatalogRepository {
    entries: BTreeMap<String, BTreeMap<String, CatalogEntry>>,
}

impl CatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry, replacing any entry with the same id and version.
    pub fn register(&mut self, entry: CatalogEntry) {
        self.entries
            .entry(entry.id.clone())
            .or_default()
            .insert(entry.version.clone(), entry);
    }

    /// Highest registered version of `id`.
    pub fn current(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries
            .get(id)?
            .values()
            .max_by(|a, b| compare_versions(&a.version, &b.version))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogStore for CatalogRepository {
    fn find_entry(&self, id: &str, version: &str) -> Option<CatalogEntry> {
        if version == DEFAULT_VERSION {
            return self.current(id).cloned();
        }
        self.entries.get(id)?.get(version).cloned()
    }
}

/// Orders versions by dot-separated segments: numeric segments compare as
/// numbers, everything else lexically, and numbers sort before text.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, version: &str) -> CatalogEntry {
        CatalogEntry::new(id, version, CatalogItemKind::Entity)
    }

    #[test]
    fn default_version_picks_highest() {
        let mut repo = CatalogRepository::new();
        repo.register(entry("redis", "1.9"));
        repo.register(entry("redis", "1.10"));
        repo.register(entry("redis", "1.2"));

        let found = repo.find_entry("redis", DEFAULT_VERSION).unwrap();
        assert_eq!(found.version, "1.10");
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn exact_version_lookup() {
        let mut repo = CatalogRepository::new();
        repo.register(entry("redis", "1.0"));
        assert!(repo.find_entry("redis", "1.0").is_some());
        assert!(repo.find_entry("redis", "2.0").is_none());
        assert!(repo.find_entry("memcached", DEFAULT_VERSION).is_none());
    }

    #[test]
    fn kind_filter_rejects_mismatch() {
        let mut repo = CatalogRepository::new();
        repo.register(entry("redis", "1.0"));
        assert!(
            repo.find_entry_of_kind(&CatalogItemKind::Entity, "redis", "1.0")
                .is_some()
        );
        assert!(
            repo.find_entry_of_kind(&CatalogItemKind::Policy, "redis", "1.0")
                .is_none()
        );
    }

    #[test]
    fn version_ordering() {
        assert_eq!(compare_versions("1.2", "1.10"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_versions("1.0-SNAPSHOT", "1.0-SNAPSHOT"), Ordering::Equal);
        assert_eq!(compare_versions("2", "1.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.1", "1.beta"), Ordering::Less);
    }
}
