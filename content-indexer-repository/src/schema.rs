//! Reference schema of the content index and drift detection.
//!
//! The bundled reference holds the settings and mappings the `ft` index is
//! expected to have. Live settings carry a few volatile keys under
//! `settings.index` that differ on every cluster; they are stripped before
//! comparing.

use std::collections::HashMap;

use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::IndexDefinition;

/// Name of the index the bundled reference describes.
pub const REFERENCE_INDEX_NAME: &str = "ft";

const REFERENCE_SCHEMA: &str = include_str!("../resources/reference_schema.json");

/// Keys of `settings.index` that are assigned by the cluster.
const VOLATILE_INDEX_SETTINGS: [&str; 4] = ["creation_date", "uuid", "version", "created"];

/// Reference definitions keyed by index name.
pub type ReferenceSchema = HashMap<String, IndexDefinition>;

/// Result of comparing the live index against the reference schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaHealth {
    Ok,
    NotConnected,
    WrongReference,
    WrongSettings,
    WrongMappings,
}

impl SchemaHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaHealth::Ok => "ok",
            SchemaHealth::NotConnected => "not ok, connection to ES couldn't be established",
            SchemaHealth::WrongReference => "not ok, wrong referenceIndex",
            SchemaHealth::WrongSettings => "not ok, wrong settings",
            SchemaHealth::WrongMappings => "not ok, wrong mappings",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, SchemaHealth::Ok)
    }
}

impl std::fmt::Display for SchemaHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the bundled reference schema.
pub fn load_reference_schema() -> Result<ReferenceSchema, SearchIndexError> {
    parse_reference_schema(REFERENCE_SCHEMA)
}

pub(crate) fn parse_reference_schema(raw: &str) -> Result<ReferenceSchema, SearchIndexError> {
    let definition: IndexDefinition =
        serde_json::from_str(raw).map_err(|e| SearchIndexError::schema(e.to_string()))?;

    let mut schema = HashMap::new();
    schema.insert(REFERENCE_INDEX_NAME.to_string(), definition);
    Ok(schema)
}

/// Returns the reference definition for `index_name` when it is complete.
pub fn reference_for<'a>(
    schema: &'a ReferenceSchema,
    index_name: &str,
) -> Option<&'a IndexDefinition> {
    schema
        .get(index_name)
        .filter(|definition| definition.settings.is_some() && definition.mappings.is_some())
}

/// Compare a live definition against the reference.
pub fn compare(live: IndexDefinition, reference: &IndexDefinition) -> SchemaHealth {
    let mut settings = live.settings;
    if let Some(index_settings) = settings
        .as_mut()
        .and_then(|s| s.get_mut("index"))
        .and_then(Value::as_object_mut)
    {
        for key in VOLATILE_INDEX_SETTINGS {
            index_settings.remove(key);
        }
    }

    if settings != reference.settings {
        return SchemaHealth::WrongSettings;
    }
    if live.mappings != reference.mappings {
        return SchemaHealth::WrongMappings;
    }
    SchemaHealth::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference() -> IndexDefinition {
        IndexDefinition {
            settings: Some(json!({"index": {"number_of_shards": "5"}})),
            mappings: Some(json!({"FTCom": {"properties": {"uid": {"type": "string"}}}})),
        }
    }

    #[test]
    fn test_bundled_reference_is_complete() {
        let schema = load_reference_schema().unwrap();
        assert!(reference_for(&schema, REFERENCE_INDEX_NAME).is_some());
        assert!(reference_for(&schema, "other").is_none());
    }

    #[test]
    fn test_incomplete_reference_is_rejected() {
        let schema = parse_reference_schema(r#"{"settings": {"index": {}}}"#).unwrap();
        assert!(reference_for(&schema, REFERENCE_INDEX_NAME).is_none());
    }

    #[test]
    fn test_volatile_settings_are_ignored() {
        let live = IndexDefinition {
            settings: Some(json!({"index": {
                "number_of_shards": "5",
                "creation_date": "1500000000000",
                "uuid": "abc",
                "version": {"created": "1070599"},
                "created": "x"
            }})),
            mappings: reference().mappings,
        };

        assert_eq!(compare(live, &reference()), SchemaHealth::Ok);
    }

    #[test]
    fn test_wrong_settings() {
        let live = IndexDefinition {
            settings: Some(json!({"index": {"number_of_shards": "3"}})),
            mappings: reference().mappings,
        };

        assert_eq!(compare(live, &reference()), SchemaHealth::WrongSettings);
    }

    #[test]
    fn test_wrong_mappings() {
        let live = IndexDefinition {
            settings: reference().settings,
            mappings: Some(json!({"FTCom": {"properties": {}}})),
        };

        assert_eq!(compare(live, &reference()), SchemaHealth::WrongMappings);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(SchemaHealth::Ok.as_str(), "ok");
        assert_eq!(
            SchemaHealth::NotConnected.to_string(),
            "not ok, connection to ES couldn't be established"
        );
        assert_eq!(SchemaHealth::WrongReference.as_str(), "not ok, wrong referenceIndex");
    }
}
