//! Verbosity selection for catalog diagnostics.
//!
//! Messages logged at debug during normal operation drop to trace while
//! persisted state is being rebound. Callers pass a `DiagnosticMode`
//! explicitly; `RebindTracker` is a caller-owned flag that produces one.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiagnosticMode {
    #[default]
    Normal,
    /// Rebind or recovery in progress: demote debug output to trace.
    Rebinding,
}

impl DiagnosticMode {
    pub fn is_rebinding(self) -> bool {
        matches!(self, DiagnosticMode::Rebinding)
    }
}

/// Lock-free rebind flag shared between the rebind driver and readers.
///
/// Readers may observe a stale value; that only changes log verbosity.
#[derive(Debug, Default)]
pub struct RebindTracker {
    rebinding: AtomicBool,
}

impl RebindTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rebinding(&self, rebinding: bool) {
        self.rebinding.store(rebinding, Ordering::Relaxed);
    }

    pub fn mode(&self) -> DiagnosticMode {
        if self.rebinding.load(Ordering::Relaxed) {
            DiagnosticMode::Rebinding
        } else {
            DiagnosticMode::Normal
        }
    }

    /// Run `f` with the flag raised, restoring the previous value afterwards.
    pub fn while_rebinding<R>(&self, f: impl FnOnce(DiagnosticMode) -> R) -> R {
        let _restore = RestoreFlag {
            flag: &self.rebinding,
            previous: self.rebinding.swap(true, Ordering::Relaxed),
        };
        f(DiagnosticMode::Rebinding)
    }
}

/// Puts the rebind flag back on drop, including while unwinding.
struct RestoreFlag<'a> {
    flag: &'a AtomicBool,
    previous: bool,
}

impl Drop for RestoreFlag<'_> {
    fn drop(&mut self) {
        self.flag.store(self.previous, Ordering::Relaxed);
    }
}

/// Log at trace while rebinding, debug otherwise.
///
/// Takes the same field/message arguments as `tracing::debug!`.
#[macro_export]
macro_rules! debug_or_trace {
    ($mode:expr, $($arg:tt)+) => {
        if $crate::diagnostics::DiagnosticMode::is_rebinding($mode) {
            ::tracing::trace!($($arg)+);
        } else {
            ::tracing::debug!($($arg)+);
        }
    };
}
