//! Explicit, per-task ambient override state for chain composition.

use crate::loading::source::ResolutionSource;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Per-task ambient override state.
///
/// Each task owns its scope, so concurrent resolutions never see each other's
/// overrides. Overrides nest; the innermost one is the only one in effect.
#[derive(Default)]
pub struct LoadingScope {
    overrides: Vec<Arc<dyn ResolutionSource>>,
}

impl LoadingScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// The override in effect, if any.
    pub fn current_override(&self) -> Option<&Arc<dyn ResolutionSource>> {
        self.overrides.last()
    }

    /// Install `source` until the returned guard drops.
    pub fn push_override(&mut self, source: Arc<dyn ResolutionSource>) -> OverrideGuard<'_> {
        self.overrides.push(source);
        OverrideGuard { scope: self }
    }

    /// Run `f` with `source` installed.
    pub fn with_override<R>(
        &mut self,
        source: Arc<dyn ResolutionSource>,
        f: impl FnOnce(&mut LoadingScope) -> R,
    ) -> R {
        let mut guard = self.push_override(source);
        f(&mut guard)
    }

    pub fn depth(&self) -> usize {
        self.overrides.len()
    }
}

/// Removes its override when dropped. Derefs to the scope so nested
/// operations can push further overrides.
pub struct OverrideGuard<'a> {
    scope: &'a mut LoadingScope,
}

impl Deref for OverrideGuard<'_> {
    type Target = LoadingScope;

    fn deref(&self) -> &LoadingScope {
        self.scope
    }
}

impl DerefMut for OverrideGuard<'_> {
    fn deref_mut(&mut self) -> &mut LoadingScope {
        self.scope
    }
}

impl Drop for OverrideGuard<'_> {
    fn drop(&mut self) {
        self.scope.overrides.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::source::KnownReferences;

    fn source(name: &str) -> Arc<dyn ResolutionSource> {
        Arc::new(KnownReferences::new(name, Vec::<String>::new()))
    }

    fn current_label(scope: &LoadingScope) -> Option<String> {
        scope.current_override().map(|source| source.label())
    }

    #[test]
    fn innermost_override_wins_and_pops() {
        let mut scope = LoadingScope::new();
        assert!(scope.current_override().is_none());

        scope.with_override(source("outer"), |scope| {
            assert_eq!(current_label(scope).as_deref(), Some("outer"));
            scope.with_override(source("inner"), |scope| {
                assert_eq!(current_label(scope).as_deref(), Some("inner"));
                assert_eq!(scope.depth(), 2);
            });
            assert_eq!(current_label(scope).as_deref(), Some("outer"));
        });

        assert!(scope.current_override().is_none());
    }

    #[test]
    fn guard_pops_on_drop() {
        let mut scope = LoadingScope::new();
        {
            let mut guard = scope.push_override(source("catalog-load"));
            assert_eq!(current_label(&guard).as_deref(), Some("catalog-load"));
            let nested = guard.push_override(source("nested"));
            assert_eq!(current_label(&nested).as_deref(), Some("nested"));
        }
        assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn scopes_are_independent_across_threads() {
        let handles: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|name| {
                std::thread::spawn(move || {
                    let mut scope = LoadingScope::new();
                    scope.with_override(source(name), |scope| current_label(scope))
                })
            })
            .collect();
        let seen: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(seen, [Some("a".to_string()), Some("b".to_string())]);
    }
}
