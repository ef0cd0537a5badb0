use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Catalog with two versions of `redis`, a policy, and a legacy entry that
/// predates library lists.
pub fn fixture_catalog() -> Value {
    json!({
        "schema_version": "catalog_loader_v1",
        "entries": [
            {
                "id": "redis",
                "version": "1.0",
                "kind": "entity",
                "libraries": ["file:redis-1.0.jar"]
            },
            {
                "id": "redis",
                "version": "1.2",
                "kind": "entity",
                "libraries": ["file:redis-1.2.jar", "file:common.jar"]
            },
            {
                "id": "org.example:autoscaler",
                "version": "0.3",
                "kind": "policy",
                "libraries": []
            },
            {
                "id": "legacy",
                "version": "0.1",
                "kind": "template"
            }
        ],
        "bundles": {
            "file:redis-1.0.jar": ["org.example.Redis"],
            "file:redis-1.2.jar": ["org.example.Redis", "org.example.RedisCluster"],
            "file:common.jar": ["org.example.Common", "java.lang.String"]
        },
        "builtins": ["java.lang.String", "org.example.Builtin"]
    })
}

pub fn write_catalog(dir: &Path, value: &Value) -> Result<PathBuf> {
    let path = dir.join("catalog.json");
    fs::write(&path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn resolve_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_catalog-resolve"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
