//! Mapping tables used to classify and map content.
//!
//! The tables ship with the binary as `resources/app_config.json`. All keyed
//! lookups are case-insensitive.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::IndexingError;

const EMBEDDED_APP_CONFIG: &str = include_str!("../../resources/app_config.json");

/// Origin of metadata-only publishes from the internal authoring system.
pub const INTERNAL_AUTHORING_ORIGIN: &str = "http://cmdb.ft.com/systems/pac";

/// The closed set of content types that can be indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Blog,
    Video,
    Audio,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Blog => "blog",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index routing and labels for one content type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentTypeMetadata {
    pub collection: String,
    pub format: String,
    pub category: String,
}

/// Where content of a given type comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    /// Substring of the `Origin-System-Id` header.
    pub origin: String,
    /// Prefix of a content identifier authority.
    pub authority: String,
    pub content_type: ContentType,
}

/// A string table with case-insensitive keys.
#[derive(Debug, Clone, Default)]
pub struct LookupTable<V> {
    entries: HashMap<String, V>,
}

impl<V> LookupTable<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&key.to_lowercase())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for LookupTable<V> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, V>::deserialize(deserializer)?;
        Ok(Self {
            entries: raw
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
        })
    }
}

impl LookupTable<String> {
    /// The value for `key`, or an empty string when it is not configured.
    pub fn uri(&self, key: &str) -> &str {
        self.get(key).map(String::as_str).unwrap_or_default()
    }
}

/// All mapping tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub predicates: LookupTable<String>,
    pub concept_types: LookupTable<String>,
    pub content_metadata: Vec<ContentMetadata>,
    pub es_content_type_metadata: LookupTable<ContentTypeMetadata>,
}

impl AppConfig {
    /// Load the tables bundled with the binary.
    pub fn embedded() -> Result<Self, IndexingError> {
        Self::from_json(EMBEDDED_APP_CONFIG)
    }

    pub fn from_json(raw: &str) -> Result<Self, IndexingError> {
        serde_json::from_str(raw)
            .map_err(|e| IndexingError::config(format!("Invalid app config: {}", e)))
    }

    /// Index metadata for a content type; empty when not configured.
    pub fn content_type_metadata(&self, content_type: ContentType) -> ContentTypeMetadata {
        self.es_content_type_metadata
            .get(content_type.as_str())
            .cloned()
            .unwrap_or_default()
    }

    pub fn predicate(&self, name: &str) -> &str {
        self.predicates.uri(name)
    }

    pub fn concept_type(&self, name: &str) -> &str {
        self.concept_types.uri(name)
    }
}
