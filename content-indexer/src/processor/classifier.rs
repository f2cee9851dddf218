//! Content type inference.

use content_indexer_shared::Content;

use crate::config::{AppConfig, ContentMetadata, ContentType, INTERNAL_AUTHORING_ORIGIN};
use crate::consumer::{
    QueueMessage, ARTICLE_CONTENT_TYPE_MARKER, AUDIO_CONTENT_TYPE_MARKER, CONTENT_TYPE_HEADER,
    ORIGIN_SYSTEM_ID_HEADER,
};

/// Result of classifying a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Typed(ContentType),
    /// Metadata-only publish from the internal authoring system. Carries no type.
    InternalAuthoring,
    Unclassified,
}

/// Infers the content type from headers and identifiers.
///
/// Resolution order: `Content-Type` header markers, identifier authorities,
/// then the origin header.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    content_metadata: Vec<ContentMetadata>,
}

impl ContentClassifier {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            content_metadata: config.content_metadata.clone(),
        }
    }

    pub fn classify(&self, message: &QueueMessage, content: &Content) -> Classification {
        if let Some(content_type) = Self::from_content_type_header(message) {
            return Classification::Typed(content_type);
        }

        if let Some(content_type) = self.from_identifiers(content) {
            return Classification::Typed(content_type);
        }

        let origin = message.header(ORIGIN_SYSTEM_ID_HEADER).unwrap_or_default();
        if let Some(content_type) = self.from_origin(origin) {
            return Classification::Typed(content_type);
        }

        if origin == INTERNAL_AUTHORING_ORIGIN {
            Classification::InternalAuthoring
        } else {
            Classification::Unclassified
        }
    }

    fn from_content_type_header(message: &QueueMessage) -> Option<ContentType> {
        let header = message.header(CONTENT_TYPE_HEADER)?;
        if header.contains(AUDIO_CONTENT_TYPE_MARKER) {
            Some(ContentType::Audio)
        } else if header.contains(ARTICLE_CONTENT_TYPE_MARKER) {
            Some(ContentType::Article)
        } else {
            None
        }
    }

    /// Every identifier is checked; a later match overrides an earlier one.
    fn from_identifiers(&self, content: &Content) -> Option<ContentType> {
        let mut content_type = None;
        for identifier in &content.identifiers {
            if let Some(metadata) = self
                .content_metadata
                .iter()
                .find(|m| !m.authority.is_empty() && identifier.authority.starts_with(&m.authority))
            {
                content_type = Some(metadata.content_type);
            }
        }
        content_type
    }

    fn from_origin(&self, origin: &str) -> Option<ContentType> {
        if origin.is_empty() {
            return None;
        }
        self.content_metadata
            .iter()
            .find(|m| !m.origin.is_empty() && origin.contains(&m.origin))
            .map(|m| m.content_type)
    }
}
