//! Bundle manager seam and library installation.
//!
//! Installation only forwards descriptors to the manager in order. Retry,
//! rollback and idempotence of repeated registrations belong to the manager.

use crate::catalog::CatalogBundle;
use crate::diagnostics::DiagnosticMode;
use crate::error::LoadingError;
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Bundle subsystem as seen by the loading layer.
pub trait BundleManager: Send + Sync {
    /// Whether the subsystem is running and accepting bundles.
    fn is_available(&self) -> bool;

    /// Make `bundle` resolvable. Registering the same bundle twice is allowed.
    fn register_bundle(&self, bundle: &CatalogBundle) -> Result<()>;

    /// Whether `reference` resolves from `bundle`.
    fn lookup(&self, bundle: &CatalogBundle, reference: &str) -> bool;
}

/// Register every library with the bundle manager, in order.
///
/// `None` and empty lists succeed without touching the manager. Otherwise a
/// missing or unavailable manager fails with `BundleSubsystemUnavailable`, and
/// the first registration failure aborts the remaining bundles.
pub fn install_libraries(
    manager: Option<&dyn BundleManager>,
    libraries: Option<&[CatalogBundle]>,
    mode: DiagnosticMode,
) -> Result<(), LoadingError> {
    let Some(libraries) = libraries else {
        return Ok(());
    };
    if libraries.is_empty() {
        return Ok(());
    }

    let manager = match manager {
        Some(manager) if manager.is_available() => manager,
        _ => {
            return Err(LoadingError::BundleSubsystemUnavailable {
                libraries: libraries.to_vec(),
            });
        }
    };

    crate::debug_or_trace!(
        mode,
        bundles = %libraries.iter().map(CatalogBundle::as_str).collect::<Vec<_>>().join(", "),
        "Loading bundles"
    );
    let started = Instant::now();
    for bundle in libraries {
        manager
            .register_bundle(bundle)
            .map_err(|err| LoadingError::BundleRegistration {
                bundle: bundle.clone(),
                reason: format!("{err:#}"),
            })?;
    }
    crate::debug_or_trace!(
        mode,
        count = libraries.len(),
        elapsed = ?started.elapsed(),
        "Registered bundles"
    );
    Ok(())
}

/// Bundle manager backed by a table of bundle exports.
///
/// Registration fails for bundles missing from the table. Registrations are
/// recorded in call order, duplicates included.
#[derive(Debug)]
pub struct InMemoryBundleManager {
    available: AtomicBool,
    exports: BTreeMap<CatalogBundle, Vec<String>>,
    registered: Mutex<Vec<CatalogBundle>>,
}

impl InMemoryBundleManager {
    pub fn new(exports: BTreeMap<CatalogBundle, Vec<String>>) -> Self {
        Self {
            available: AtomicBool::new(true),
            exports,
            registered: Mutex::new(Vec::new()),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Every registration so far, in call order.
    pub fn registrations(&self) -> Vec<CatalogBundle> {
        self.registered
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    pub fn is_registered(&self, bundle: &CatalogBundle) -> bool {
        self.registered
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .contains(bundle)
    }
}

impl BundleManager for InMemoryBundleManager {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn register_bundle(&self, bundle: &CatalogBundle) -> Result<()> {
        if !self.exports.contains_key(bundle) {
            bail!("unknown bundle {bundle}");
        }
        self.registered
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(bundle.clone());
        Ok(())
    }

    fn lookup(&self, bundle: &CatalogBundle, reference: &str) -> bool {
        self.is_registered(bundle)
            && self
                .exports
                .get(bundle)
                .is_some_and(|exports| exports.iter().any(|export| export == reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(name: &str) -> CatalogBundle {
        CatalogBundle(name.to_string())
    }

    fn manager() -> InMemoryBundleManager {
        InMemoryBundleManager::new(BTreeMap::from([
            (bundle("file:a.jar"), vec!["org.example.A".to_string()]),
            (bundle("file:b.jar"), vec!["org.example.B".to_string()]),
        ]))
    }

    #[test]
    fn registers_in_input_order() {
        let manager = manager();
        let libraries = [bundle("file:b.jar"), bundle("file:a.jar")];
        install_libraries(Some(&manager), Some(&libraries), DiagnosticMode::Normal).unwrap();
        assert_eq!(manager.registrations(), libraries.to_vec());
        assert!(manager.lookup(&bundle("file:a.jar"), "org.example.A"));
        assert!(!manager.lookup(&bundle("file:a.jar"), "org.example.B"));
    }

    #[test]
    fn unavailable_manager_fails_only_with_libraries() {
        let manager = manager();
        manager.set_available(false);
        let libraries = [bundle("file:a.jar")];

        let err = install_libraries(Some(&manager), Some(&libraries), DiagnosticMode::Normal)
            .unwrap_err();
        match err {
            LoadingError::BundleSubsystemUnavailable { libraries: named } => {
                assert_eq!(named, libraries.to_vec())
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(manager.registrations().is_empty());

        install_libraries(Some(&manager), Some(&[]), DiagnosticMode::Normal).unwrap();
        install_libraries(Some(&manager), None, DiagnosticMode::Normal).unwrap();
        install_libraries(None, None, DiagnosticMode::Rebinding).unwrap();
    }

    #[test]
    fn missing_manager_counts_as_unavailable() {
        let libraries = [bundle("file:a.jar")];
        let err = install_libraries(None, Some(&libraries), DiagnosticMode::Normal).unwrap_err();
        assert!(matches!(
            err,
            LoadingError::BundleSubsystemUnavailable { .. }
        ));
    }

    #[test]
    fn first_failure_aborts_remaining() {
        let manager = manager();
        let libraries = [bundle("file:a.jar"), bundle("file:missing.jar"), bundle("file:b.jar")];
        let err = install_libraries(Some(&manager), Some(&libraries), DiagnosticMode::Normal)
            .unwrap_err();
        match err {
            LoadingError::BundleRegistration { bundle: failed, reason } => {
                assert_eq!(failed, bundle("file:missing.jar"));
                assert!(reason.contains("unknown bundle"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(manager.registrations(), vec![bundle("file:a.jar")]);
    }

    #[test]
    fn repeated_installs_reregister() {
        let manager = manager();
        let libraries = [bundle("file:a.jar")];
        install_libraries(Some(&manager), Some(&libraries), DiagnosticMode::Normal).unwrap();
        install_libraries(Some(&manager), Some(&libraries), DiagnosticMode::Rebinding).unwrap();
        assert_eq!(manager.registrations().len(), 2);
    }
}
