use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Separates an entry id from its version in a versioned id (`id:version`).
pub const VERSION_DELIMITER: char = ':';

/// Reserved version meaning "whatever the store considers current".
///
/// Stores resolve the sentinel themselves; it is never a real entry version.
pub const DEFAULT_VERSION: &str = "0.0.0_DEFAULT_VERSION";

/// Returns true when `raw` is present and contains the version delimiter.
pub fn has_version_delimiter(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| value.contains(VERSION_DELIMITER))
}

/// The id half of a versioned id, split on the last delimiter.
pub fn split_id(raw: Option<&str>) -> Option<&str> {
    let raw = raw?;
    let pos = raw.rfind(VERSION_DELIMITER)?;
    Some(&raw[..pos])
}

/// The version half of a versioned id, split on the last delimiter.
pub fn split_version(raw: Option<&str>) -> Option<&str> {
    let raw = raw?;
    let pos = raw.rfind(VERSION_DELIMITER)?;
    Some(&raw[pos + VERSION_DELIMITER.len_utf8()..])
}

/// Joins `id` and `version` with the delimiter.
///
/// Nothing is validated: a version containing the delimiter will not split
/// back the same way, because splitting keys on the last occurrence.
pub fn format_versioned_id(id: &str, version: &str) -> String {
    format!("{id}{VERSION_DELIMITER}{version}")
}

/// Parsed `id:version` pair.
///
/// Serializes as the joined string so catalog documents and CLI output carry
/// the same form users type.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VersionedId {
    pub id: String,
    pub version: String,
}

impl VersionedId {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }

    /// Split a raw string, substituting `DEFAULT_VERSION` when no delimiter
    /// is present.
    pub fn parse(raw: &str) -> Self {
        match (split_id(Some(raw)), split_version(Some(raw))) {
            (Some(id), Some(version)) => Self::new(id, version),
            _ => Self::new(raw, DEFAULT_VERSION),
        }
    }

    /// True when the version is the reserved default sentinel.
    pub fn is_default_version(&self) -> bool {
        self.version == DEFAULT_VERSION
    }
}

impl fmt::Display for VersionedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_versioned_id(&self.id, &self.version))
    }
}

impl Serialize for VersionedId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VersionedId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Opaque library descriptor (URL or coordinate) backing a catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogBundle(pub String);

impl CatalogBundle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a catalog entry instantiates.
///
/// Known variants keep serialization consistent; `Other` preserves forward
/// compatibility with catalogs that introduce new kinds.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum CatalogItemKind {
    Template,
    Entity,
    Policy,
    Location,
    Other(String),
}

impl CatalogItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            CatalogItemKind::Template => "template",
            CatalogItemKind::Entity => "entity",
            CatalogItemKind::Policy => "policy",
            CatalogItemKind::Location => "location",
            CatalogItemKind::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "template" => CatalogItemKind::Template,
            "entity" => CatalogItemKind::Entity,
            "policy" => CatalogItemKind::Policy,
            "location" => CatalogItemKind::Location,
            other => CatalogItemKind::Other(other.to_string()),
        }
    }
}

impl From<&str> for CatalogItemKind {
    fn from(value: &str) -> Self {
        Self::from_str(value)
    }
}

impl Serialize for CatalogItemKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CatalogItemKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_uses_last_delimiter() {
        assert_eq!(split_id(Some("a:b:1.0")), Some("a:b"));
        assert_eq!(split_version(Some("a:b:1.0")), Some("1.0"));
        assert!(has_version_delimiter(Some("a:b:1.0")));
    }

    #[test]
    fn missing_delimiter_or_input_yields_none() {
        assert_eq!(split_id(Some("foo")), None);
        assert_eq!(split_version(Some("foo")), None);
        assert!(!has_version_delimiter(Some("foo")));

        assert_eq!(split_id(None), None);
        assert_eq!(split_version(None), None);
        assert!(!has_version_delimiter(None));
    }

    #[test]
    fn empty_version_parses() {
        assert_eq!(split_id(Some("foo:")), Some("foo"));
        assert_eq!(split_version(Some("foo:")), Some(""));
    }

    #[test]
    fn format_then_split_recovers_parts() {
        let cases = [
            ("redis", "1.0"),
            ("org.example.app", "2.1.0-SNAPSHOT"),
            ("a:b", "3"),
        ];
        for (id, version) in cases {
            let joined = format_versioned_id(id, version);
            assert_eq!(split_id(Some(&joined)), Some(id), "id of {joined}");
            assert_eq!(
                split_version(Some(&joined)),
                Some(version),
                "version of {joined}"
            );
        }
    }

    #[test]
    fn parse_defaults_version_without_delimiter() {
        let parsed = VersionedId::parse("foo");
        assert_eq!(parsed.id, "foo");
        assert!(parsed.is_default_version());

        let parsed = VersionedId::parse("foo:2.1");
        assert_eq!(parsed, VersionedId::new("foo", "2.1"));
        assert_eq!(parsed.to_string(), "foo:2.1");
    }

    #[test]
    fn versioned_id_serializes_as_joined_string() {
        let id = VersionedId::new("a:b", "1.0");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"a:b:1.0\"");
        let back: VersionedId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn kind_round_trips_known_and_unknown() {
        let known = CatalogItemKind::Policy;
        let json = serde_json::to_string(&known).unwrap();
        assert_eq!(json, "\"policy\"");
        let back: CatalogItemKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, known);

        let parsed: CatalogItemKind = serde_json::from_str("\"enricher\"").unwrap();
        assert_eq!(parsed, CatalogItemKind::Other("enricher".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"enricher\"");
    }

    #[test]
    fn bundle_equality_is_by_value() {
        let a = CatalogBundle("mvn:org.example/lib/1.0".to_string());
        let b = CatalogBundle(String::from("mvn:org.example/lib/1.0"));
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"mvn:org.example/lib/1.0\"");
    }
}
