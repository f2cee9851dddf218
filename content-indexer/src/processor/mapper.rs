//! Builds search documents from content events.

use std::sync::Arc;

use chrono::Utc;
use content_indexer_shared::{IndexDocument, RawEvent, Thing};
use tracing::{error, warn};

use crate::concept::{ConceptReader, THING_URI_PREFIX};
use crate::config::{AppConfig, ContentType};
use crate::processor::image;
use crate::processor::sanitizer::{sanitize_body, sanitize_short};
use crate::processor::taxonomy::TaxonomyResolver;

const WEB_URL_PREFIX: &str = "https://www.ft.com/content/";
const API_PATH_PREFIX: &str = "/content/";
const INDEX_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const VIDEO_MEDIA_TYPE_PREFIX: &str = "video";

/// Maps a `RawEvent` into an `IndexDocument`.
pub struct DocumentMapper {
    app_config: Arc<AppConfig>,
    taxonomy: TaxonomyResolver,
    concept_reader: Arc<dyn ConceptReader>,
    base_api_url: String,
}

impl DocumentMapper {
    /// `base_api_url` is always served over https.
    pub fn new(
        app_config: Arc<AppConfig>,
        concept_reader: Arc<dyn ConceptReader>,
        base_api_url: &str,
    ) -> Self {
        let base_api_url = match base_api_url.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => base_api_url.to_string(),
        };

        Self {
            taxonomy: TaxonomyResolver::new(&app_config),
            app_config,
            concept_reader,
            base_api_url: base_api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_api_url(&self) -> &str {
        &self.base_api_url
    }

    /// Build the document for `event`.
    ///
    /// Concept lookups never fail the mapping. When they cannot be done the
    /// document only carries the content fields.
    pub async fn to_index_document(
        &self,
        event: &RawEvent,
        content_type: ContentType,
        tid: &str,
    ) -> IndexDocument {
        let mut document = self.content_fields(event, content_type, tid);

        let annotations = self.annotations_to_resolve(event);
        if annotations.is_empty() {
            warn!(
                transaction_id = %tid,
                uuid = %event.uuid,
                "no annotation to be processed"
            );
            return document;
        }

        let ids: Vec<String> = annotations.iter().map(|thing| thing.id.clone()).collect();
        let concepts = match self.concept_reader.get_concepts(tid, &ids).await {
            Ok(concepts) => concepts,
            Err(e) => {
                error!(
                    transaction_id = %tid,
                    uuid = %event.uuid,
                    error = %e,
                    "Failed to resolve concepts"
                );
                return document;
            }
        };

        for thing in annotations {
            let canonical_id = thing
                .id
                .strip_prefix(THING_URI_PREFIX)
                .unwrap_or(&thing.id);

            let Some(concept) = concepts.get(&thing.id) else {
                warn!(
                    transaction_id = %tid,
                    uuid = %event.uuid,
                    concept_id = %canonical_id,
                    "No concordance found"
                );
                continue;
            };

            let mut annotation_ids = Vec::with_capacity(concept.tme_ids.len() + 1);
            annotation_ids.push(canonical_id.to_string());
            if concept.tme_ids.is_empty() {
                warn!(
                    transaction_id = %tid,
                    uuid = %event.content.uuid,
                    concept_id = %canonical_id,
                    "TME id missing for concept, using only canonical id"
                );
            } else {
                annotation_ids.extend(concept.tme_ids.iter().cloned());
            }

            self.taxonomy
                .apply(thing, &annotation_ids, canonical_id, &mut document);
        }

        document
    }

    fn content_fields(&self, event: &RawEvent, content_type: ContentType, tid: &str) -> IndexDocument {
        let content = &event.content;
        let metadata = self.app_config.content_type_metadata(content_type);

        let mut document = IndexDocument::new();
        document.index_date = Some(Utc::now().format(INDEX_DATE_FORMAT).to_string());
        document.content_type = Some(content_type.to_string());
        document.internal_content_type = Some(content_type.to_string());
        document.category = Some(metadata.category);
        document.format = Some(metadata.format);
        document.uid = Some(content.uuid.clone());
        document.lead_headline = Some(sanitize_short(&content.title));
        document.byline = Some(sanitize_short(&content.byline));

        if !content.published_date.is_empty() {
            document.last_publish = Some(content.published_date.clone());
        }
        if !content.first_published_date.is_empty() {
            document.initial_publish = Some(content.first_published_date.clone());
        }

        let body = if content.body.is_empty() {
            &content.description
        } else {
            &content.body
        };
        document.body = Some(sanitize_body(body));

        if !content.standfirst.is_empty() {
            document.short_description = Some(content.standfirst.clone());
        }

        if content_type != ContentType::Blog && !content.main_image.is_empty() {
            match image::derive_image_uuid(&content.main_image) {
                Ok(image_id) => document.thumbnail_url = Some(image::thumbnail_url(&image_id)),
                Err(e) => warn!(
                    transaction_id = %tid,
                    uuid = %event.uuid,
                    main_image = %content.main_image,
                    error = %e,
                    "Couldn't generate image uuid for the image set, image field won't be populated"
                ),
            }
        }

        document.length_millis = match content_type {
            ContentType::Video => content
                .data_sources
                .iter()
                .find(|source| source.media_type.starts_with(VIDEO_MEDIA_TYPE_PREFIX))
                .map(|source| source.duration)
                .unwrap_or_default(),
            ContentType::Audio => content
                .data_sources
                .first()
                .map(|source| source.duration)
                .unwrap_or_default(),
            _ => 0,
        };

        document.url = Some(format!("{}{}", WEB_URL_PREFIX, content.uuid));
        document.model_api_url = Some(format!(
            "{}{}{}",
            self.base_api_url, API_PATH_PREFIX, content.uuid
        ));
        document.publish_reference = tid.to_string();

        document
    }

    /// Annotations that can affect the document.
    fn annotations_to_resolve<'a>(&self, event: &'a RawEvent) -> Vec<&'a Thing> {
        let mentions = self.app_config.predicate("mentions");
        let has_display_tag = self.app_config.predicate("hasDisplayTag");

        event
            .metadata
            .iter()
            .map(|annotation| &annotation.thing)
            .filter(|thing| thing.predicate != mentions && thing.predicate != has_display_tag)
            .collect()
    }
}
