//! Resolves raw versioned-id strings against a catalog store.
//!
//! Absence is never an error here; callers decide whether a missing entry is
//! fatal for the operation at hand.

use crate::catalog::identity::{
    CatalogItemKind, DEFAULT_VERSION, has_version_delimiter, split_id, split_version,
};
use crate::catalog::model::CatalogEntry;
use crate::catalog::repository::CatalogStore;

/// Look up the entry named by `raw`, defaulting the version when omitted.
pub fn resolve_entry<S>(store: &S, raw: Option<&str>) -> Option<CatalogEntry>
where
    S: CatalogStore + ?Sized,
{
    let (id, version) = lookup_key(raw)?;
    store.find_entry(id, version)
}

/// Like `resolve_entry`, additionally requiring the entry to be of `kind`.
pub fn resolve_entry_of_kind<S>(
    store: &S,
    kind: &CatalogItemKind,
    raw: Option<&str>,
) -> Option<CatalogEntry>
where
    S: CatalogStore + ?Sized,
{
    let (id, version) = lookup_key(raw)?;
    store.find_entry_of_kind(kind, id, version)
}

fn lookup_key(raw: Option<&str>) -> Option<(&str, &str)> {
    let raw = raw?;
    if has_version_delimiter(Some(raw)) {
        Some((split_id(Some(raw))?, split_version(Some(raw))?))
    } else {
        Some((raw, DEFAULT_VERSION))
    }
}
