//! Resolves a catalog entry and reports how its references would load.
//!
//! The binary loads a catalog document, finds the entry named by a versioned
//! id (bare ids pick the current version), installs the entry's bundles with
//! an in-memory bundle manager, then resolves each requested reference
//! through the entry's chain. Output is a single JSON object on stdout.

use anyhow::{Context, Result, anyhow, bail};
use catalog_loader::runtime::{
    CATALOG_ENV, catalog_path_from_env, diagnostic_mode_from_env, init_tracing, split_list,
};
use catalog_loader::{
    CatalogEntry, CatalogIndex, CatalogItemKind, DiagnosticMode, InMemoryBundleManager,
    KnownReferences, LoadingEnvironment, LoadingScope, ResolutionSource, resolve_entry,
    resolve_entry_of_kind,
};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse(env::args().skip(1))?;
    let catalog_path = cli
        .catalog
        .clone()
        .or_else(catalog_path_from_env)
        .ok_or_else(|| anyhow!("No catalog given; pass --catalog or set {CATALOG_ENV}"))?;
    let mode = if cli.rebinding {
        DiagnosticMode::Rebinding
    } else {
        diagnostic_mode_from_env()
    };

    let index = CatalogIndex::load(&catalog_path)?;
    let raw_id = Some(cli.versioned_id.as_str());
    let entry = match &cli.kind {
        Some(kind) => resolve_entry_of_kind(index.repository(), kind, raw_id),
        None => resolve_entry(index.repository(), raw_id),
    }
    .ok_or_else(|| anyhow!("Catalog entry not found: {}", cli.versioned_id))?;

    let manager = Arc::new(InMemoryBundleManager::new(index.bundle_exports().clone()));
    let environment = LoadingEnvironment::new(Arc::new(KnownReferences::new(
        "default",
        index.builtins().iter().cloned(),
    )))
    .with_bundle_manager(manager);
    environment
        .install_entry_libraries(&entry, mode)
        .with_context(|| format!("installing libraries for {}", entry.catalog_item_id()))?;

    let mut scope = LoadingScope::new();
    let chain = if cli.ambient.is_empty() {
        environment.chain_for_entry(&entry, &scope)
    } else {
        let ambient: Arc<dyn ResolutionSource> =
            Arc::new(KnownReferences::new("ambient", cli.ambient.iter().cloned()));
        scope.with_override(ambient, |scope| environment.chain_for_entry(&entry, scope))
    };

    let references = cli
        .references
        .iter()
        .map(|reference| match chain.resolve(reference) {
            Ok(resolved) => ReferenceReport {
                reference: reference.clone(),
                source: Some(resolved.source),
                catalog_item_id: resolved.catalog_item_id,
                error: None,
            },
            Err(err) => ReferenceReport {
                reference: reference.clone(),
                source: None,
                catalog_item_id: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    let report = Report {
        catalog_item_id: entry.catalog_item_id(),
        chain: chain.labels(),
        entry: &entry,
        references,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    catalog_item_id: String,
    entry: &'a CatalogEntry,
    chain: Vec<String>,
    references: Vec<ReferenceReport>,
}

#[derive(Serialize)]
struct ReferenceReport {
    reference: String,
    source: Option<String>,
    catalog_item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Default)]
struct Cli {
    catalog: Option<PathBuf>,
    rebinding: bool,
    kind: Option<CatalogItemKind>,
    ambient: Vec<String>,
    versioned_id: String,
    references: Vec<String>,
}

impl Cli {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut cli = Cli::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => {
                    let value = args.next().context("--catalog requires a path")?;
                    cli.catalog = Some(PathBuf::from(value));
                }
                "--kind" => {
                    let value = args.next().context("--kind requires a value")?;
                    cli.kind = Some(CatalogItemKind::from(value.as_str()));
                }
                "--ambient" => {
                    let value = args.next().context("--ambient requires a reference list")?;
                    cli.ambient.extend(split_list(&value));
                }
                "--rebinding" => cli.rebinding = true,
                "--help" | "-h" => usage(0),
                flag if flag.starts_with("--") => bail!("Unknown flag: {flag}"),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        cli.versioned_id = match positional.next() {
            Some(id) => id,
            None => usage(1),
        };
        cli.references = positional.collect();
        Ok(cli)
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: catalog-resolve [--catalog PATH] [--kind KIND] [--ambient REFS] [--rebinding] <id[:version]> [REFERENCE...]\n\nOptions:\n  --catalog PATH   Catalog document (default: ${CATALOG_ENV}).\n  --kind KIND      Only accept entries of this kind.\n  --ambient REFS   Comma-separated references served by an ambient override.\n  --rebinding      Log bundle activity at trace instead of debug.\n\nExamples:\n  catalog-resolve --catalog catalog.json redis org.example.Redis\n  catalog-resolve redis:1.0 --ambient org.example.Shim org.example.Shim"
    );
    std::process::exit(code);
}
