//! Enriched content events as they are published on the queue.
//!
//! Every field is optional on the wire. Missing or `null` strings deserialize
//! as empty strings and missing or `null` lists as empty vectors, which is what the mapping code
//! relies on when deciding whether a field is "present".

use serde::{Deserialize, Deserializer, Serialize};

/// A combined post-publication event: content plus its annotations.
///
/// `marked_deleted` is deliberately kept as a string. Only the literal value
/// `"true"` marks the content as deleted; absent, `"false"` or any other value
/// means the content is live.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: Content,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Vec<Annotation>,
    #[serde(deserialize_with = "null_as_default")]
    pub content_uri: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_modified: String,
    #[serde(deserialize_with = "null_as_default")]
    pub marked_deleted: String,
}

impl RawEvent {
    /// Returns true when the event asks for the content to be removed from the index.
    pub fn is_marked_deleted(&self) -> bool {
        self.marked_deleted == "true"
    }

    /// Promote `bodyXML` into `body` when only the former is populated.
    pub fn normalize_body(&mut self) {
        if self.content.body.is_empty() && !self.content.body_xml.is_empty() {
            self.content.body = std::mem::take(&mut self.content.body_xml);
        }
    }
}

/// The content part of an enriched content event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Content {
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(rename = "bodyXML", skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub body_xml: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifiers: Vec<Identifier>,
    #[serde(deserialize_with = "null_as_default")]
    pub published_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_modified: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_published_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub byline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub standfirst: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Identifier of the main image *set*, not of the image itself.
    #[serde(deserialize_with = "null_as_default")]
    pub main_image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publish_reference: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub content_type: String,
    #[serde(rename = "dataSource")]
    #[serde(deserialize_with = "null_as_default")]
    pub data_sources: Vec<DataSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Identifier {
    #[serde(deserialize_with = "null_as_default")]
    pub authority: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier_value: String,
}

/// A binary rendition of audio or video content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DataSource {
    /// Duration in milliseconds.
    #[serde(alias = "durationMillis")]
    #[serde(deserialize_with = "null_as_default")]
    pub duration: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub media_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Annotation {
    #[serde(deserialize_with = "null_as_default")]
    pub thing: Thing,
}

/// A concept referenced by the content, with the relation it has to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Thing {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pref_label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub predicate: String,
}

/// Reads an explicit `null` as the field's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
