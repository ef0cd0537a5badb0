//! Catalog-item-id lineage between objects.
//!
//! An object created while building another inherits the creator's
//! catalog-item-id. Mismatches are normal when one catalog entry composes
//! another, so they are logged and never raised.

use crate::diagnostics::DiagnosticMode;

/// Object model view needed to track which catalog entry created an object.
pub trait CatalogLineage {
    fn catalog_item_id(&self) -> Option<&str>;

    /// Only called while the object is being created.
    fn set_catalog_item_id(&mut self, id: &str);

    /// Name used in diagnostics.
    fn describe(&self) -> String;
}

/// What `propagate_catalog_item_id` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineageOutcome {
    /// Neither object has lineage, or both share the same id.
    Unchanged,
    /// The child took the parent's id.
    Inherited(String),
    /// Only the child has lineage; the parent is left alone.
    ChildOnly,
    /// Both have lineage and the ids differ.
    CrossCatalog,
}

/// Stamp `child` with `parent`'s catalog-item-id when it has none.
pub fn propagate_catalog_item_id<P, C>(
    parent: &P,
    child: &mut C,
    mode: DiagnosticMode,
) -> LineageOutcome
where
    P: CatalogLineage + ?Sized,
    C: CatalogLineage + ?Sized,
{
    let child_id = child.catalog_item_id().map(str::to_string);
    match (parent.catalog_item_id(), child_id.as_deref()) {
        (None, None) => LineageOutcome::Unchanged,
        (None, Some(child_id)) => {
            crate::debug_or_trace!(
                mode,
                parent = %parent.describe(),
                child = %child.describe(),
                child_id,
                "Catalog item addition: parent without catalog item id has child with one"
            );
            LineageOutcome::ChildOnly
        }
        (Some(parent_id), None) => {
            crate::debug_or_trace!(
                mode,
                parent = %parent.describe(),
                child = %child.describe(),
                parent_id,
                "Catalog item addition: applying parent catalog item id to child"
            );
            child.set_catalog_item_id(parent_id);
            LineageOutcome::Inherited(parent_id.to_string())
        }
        (Some(parent_id), Some(child_id)) if parent_id == child_id => LineageOutcome::Unchanged,
        (Some(parent_id), Some(child_id)) => {
            tracing::debug!(
                parent = %parent.describe(),
                parent_id,
                child = %child.describe(),
                child_id,
                "Cross-catalog item detected"
            );
            LineageOutcome::CrossCatalog
        }
    }
}
