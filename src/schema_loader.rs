//! JSON Schema loading for catalog documents.
//!
//! Schemas carry their own `schema_version` const; loading checks it against
//! the allowed set before compiling so a document and its schema cannot drift
//! apart silently.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

/// Parse and compile schema text; `label` names the schema in errors.
pub(crate) fn load_json_schema(
    source: &str,
    label: &str,
    allowed_versions: &BTreeSet<String>,
) -> Result<SchemaLoadResult> {
    let schema: Value =
        serde_json::from_str(source).with_context(|| format!("parsing schema {label}"))?;

    let schema_version = extract_schema_version(&schema)
        .ok_or_else(|| anyhow!("schema {label} missing schema_version const"))?;
    if !allowed_versions.contains(&schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed_versions
        );
    }

    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling schema {label}: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Validate `instance`, collecting every violation into one error.
pub(crate) fn validate_instance(
    schema: &SchemaLoadResult,
    instance: &Value,
    label: &str,
) -> Result<()> {
    if let Err(errors) = schema.compiled.validate(instance) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{label} failed schema validation:\n{details}");
    }
    Ok(())
}

fn extract_schema_version(schema: &Value) -> Option<String> {
    let version = schema.pointer(SCHEMA_VERSION_POINTER).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn allowed() -> BTreeSet<String> {
        BTreeSet::from(["catalog_loader_v1".to_string()])
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let source = json!({
            "type": "object",
            "properties": { "schema_version": { "const": "other_v9" } }
        })
        .to_string();
        let err = load_json_schema(&source, "test", &allowed()).err().unwrap();
        assert!(err.to_string().contains("other_v9"));
    }

    #[test]
    fn rejects_schema_without_version_const() {
        let err = load_json_schema("{\"type\": \"object\"}", "bare", &allowed())
            .err()
            .unwrap();
        assert!(err.to_string().contains("schema bare missing schema_version const"));
    }

    #[test]
    fn validates_instances() {
        let source = json!({
            "type": "object",
            "required": ["schema_version"],
            "properties": { "schema_version": { "const": "catalog_loader_v1" } }
        })
        .to_string();
        let schema = load_json_schema(&source, "test", &allowed()).unwrap();
        assert_eq!(schema.schema_version, "catalog_loader_v1");

        assert!(
            validate_instance(&schema, &json!({"schema_version": "catalog_loader_v1"}), "doc")
                .is_ok()
        );
        let err = validate_instance(&schema, &json!({}), "doc").err().unwrap();
        assert!(err.to_string().contains("doc failed schema validation"));
    }
}
