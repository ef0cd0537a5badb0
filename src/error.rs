//! Typed failures surfaced by the loading layer.

use crate::catalog::CatalogBundle;
use thiserror::Error;

/// Errors raised while installing bundles or resolving references.
#[derive(Debug, Error)]
pub enum LoadingError {
    /// Libraries had to be installed but no bundle manager is running.
    #[error("unable to load bundles [{}] because the bundle subsystem is not running", join(.libraries))]
    BundleSubsystemUnavailable {
        /// The libraries that could not be installed.
        libraries: Vec<CatalogBundle>,
    },

    /// The bundle manager refused one bundle; later bundles were skipped.
    #[error("failed to register bundle {bundle}: {reason}")]
    BundleRegistration {
        /// The bundle that failed.
        bundle: CatalogBundle,
        /// The manager's explanation.
        reason: String,
    },

    /// No source in a resolution chain could resolve the reference.
    #[error("unable to resolve '{reference}'{}", for_entry(.entry_id))]
    NotFound {
        /// The reference that was requested.
        reference: String,
        /// The catalog entry whose chain was used, when known.
        entry_id: Option<String>,
    },
}

fn join(libraries: &[CatalogBundle]) -> String {
    libraries
        .iter()
        .map(CatalogBundle::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn for_entry(entry_id: &Option<String>) -> String {
    entry_id
        .as_ref()
        .map(|id| format!(" for catalog item {id}"))
        .unwrap_or_default()
}
