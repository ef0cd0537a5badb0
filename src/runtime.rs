//! Environment-driven settings and logging setup shared by the binaries.

use crate::diagnostics::DiagnosticMode;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default catalog document for the CLI.
pub const CATALOG_ENV: &str = "CATALOG_LOADER_CATALOG";
/// Non-empty and not `0` selects `DiagnosticMode::Rebinding`.
pub const REBINDING_ENV: &str = "CATALOG_LOADER_REBINDING";
/// Tracing filter directives.
pub const LOG_ENV: &str = "CATALOG_LOADER_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Returns the value of `name` when set to something other than whitespace.
pub fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn flag_enabled(value: Option<String>) -> bool {
    value.map(|v| v.trim() != "0").unwrap_or(false)
}

/// Split comma- or whitespace-delimited lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Catalog path requested through the environment.
pub fn catalog_path_from_env() -> Option<PathBuf> {
    env_non_empty(CATALOG_ENV).map(PathBuf::from)
}

/// Diagnostic mode requested through the environment.
pub fn diagnostic_mode_from_env() -> DiagnosticMode {
    if flag_enabled(env_non_empty(REBINDING_ENV)) {
        DiagnosticMode::Rebinding
    } else {
        DiagnosticMode::Normal
    }
}

/// Install a stderr subscriber filtered by `CATALOG_LOADER_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = env_non_empty(LOG_ENV)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
