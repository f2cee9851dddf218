//! Facet assignment for resolved annotations.
//!
//! Legacy taxonomy ids carry their sub-taxonomy as a base64 suffix, so an id
//! belongs to `Authors` when it ends with `QXV0aG9ycw==`. The lookup is a plain
//! suffix match.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use content_indexer_shared::{FacetFamily, IndexDocument, Thing};

use crate::config::AppConfig;

pub const TME_ORGANISATIONS: &str = "ON";
pub const TME_PEOPLE: &str = "PN";
pub const TME_AUTHORS: &str = "Authors";
pub const TME_TOPICS: &str = "Topics";
pub const TME_REGIONS: &str = "GL";
pub const TME_SECTIONS: &str = "Sections";

/// Base64 of a sub-taxonomy code.
pub fn encoded_taxonomy(code: &str) -> String {
    STANDARD.encode(code.as_bytes())
}

/// First id tagged with the given sub-taxonomy.
pub fn find_tagged_id<'a, S: AsRef<str>>(code: &str, ids: &'a [S]) -> Option<&'a str> {
    let suffix = encoded_taxonomy(code);
    ids.iter()
        .map(AsRef::as_ref)
        .find(|id| id.ends_with(&suffix))
}

/// Tagged id, else the first legacy id, else the canonical id.
///
/// `ids` starts with the canonical id, so an empty slice yields `""`.
pub fn tagged_id_or_fallback<'a, S: AsRef<str>>(code: &str, ids: &'a [S]) -> &'a str {
    if let Some(id) = find_tagged_id(code, ids) {
        return id;
    }
    match ids {
        [] => "",
        [only] => only.as_ref(),
        [_, second, ..] => second.as_ref(),
    }
}

/// Predicate and concept-type URIs the resolver reacts to.
#[derive(Debug, Clone)]
pub struct TaxonomyResolver {
    about: String,
    major_mentions: String,
    implicitly_about: String,
    is_classified_by: String,
    implicitly_classified_by: String,
    is_primarily_classified_by: String,
    has_author: String,
    has_contributor: String,
    organisation: String,
    person: String,
    company: String,
    brand: String,
    topic: String,
    location: String,
    genre: String,
}

impl TaxonomyResolver {
    pub fn new(config: &AppConfig) -> Self {
        let predicate = |name: &str| config.predicate(name).to_string();
        let concept_type = |name: &str| config.concept_type(name).to_string();

        Self {
            about: predicate("about"),
            major_mentions: predicate("majorMentions"),
            implicitly_about: predicate("implicitlyAbout"),
            is_classified_by: predicate("isClassifiedBy"),
            implicitly_classified_by: predicate("implicitlyClassifiedBy"),
            is_primarily_classified_by: predicate("isPrimarilyClassifiedBy"),
            has_author: predicate("hasAuthor"),
            has_contributor: predicate("hasContributor"),
            organisation: concept_type("organisation"),
            person: concept_type("person"),
            company: concept_type("company"),
            brand: concept_type("brand"),
            topic: concept_type("topic"),
            location: concept_type("location"),
            genre: concept_type("genre"),
        }
    }

    /// Record one annotation on `document`.
    ///
    /// `ids` is the canonical id followed by the concept's legacy ids.
    pub fn apply(&self, thing: &Thing, ids: &[String], canonical_id: &str, document: &mut IndexDocument) {
        self.apply_sections(thing, ids, document);

        let label = thing.pref_label.as_str();
        let is_about = matches_uri(&thing.predicate, &self.about);

        for concept_type in &thing.types {
            let concept_type = concept_type.as_str();

            if matches_uri(concept_type, &self.organisation) {
                document.add_facet(FacetFamily::Orgnames, label, ids);
                if is_about {
                    document.set_primary_theme(label, tagged_id_or_fallback(TME_ORGANISATIONS, ids));
                }
            } else if matches_uri(concept_type, &self.person) {
                self.apply_person(thing, ids, canonical_id, document);
            } else if matches_uri(concept_type, &self.company) {
                document.add_facet(FacetFamily::Companynames, label, ids);
            } else if matches_uri(concept_type, &self.brand) {
                document.add_facet(FacetFamily::Brands, label, ids);
            } else if matches_uri(concept_type, &self.topic) {
                document.add_facet(FacetFamily::Topics, label, ids);
                if is_about {
                    document.set_primary_theme(label, tagged_id_or_fallback(TME_TOPICS, ids));
                }
            } else if matches_uri(concept_type, &self.location) {
                document.add_facet(FacetFamily::Regions, label, ids);
                if is_about {
                    document.set_primary_theme(label, tagged_id_or_fallback(TME_REGIONS, ids));
                }
            } else if matches_uri(concept_type, &self.genre) {
                document.add_facet(FacetFamily::Genres, label, ids);
            }
        }
    }

    fn apply_sections(&self, thing: &Thing, ids: &[String], document: &mut IndexDocument) {
        let predicate = thing.predicate.as_str();
        let section_predicates = [
            &self.about,
            &self.major_mentions,
            &self.implicitly_about,
            &self.is_classified_by,
            &self.implicitly_classified_by,
        ];

        if section_predicates
            .iter()
            .any(|uri| matches_uri(predicate, uri))
        {
            document.add_facet(FacetFamily::Sections, &thing.pref_label, ids);
        } else if matches_uri(predicate, &self.is_primarily_classified_by) {
            document.add_facet(FacetFamily::Sections, &thing.pref_label, ids);
            document.set_primary_section(
                &thing.pref_label,
                tagged_id_or_fallback(TME_SECTIONS, ids),
            );
        }
    }

    fn apply_person(&self, thing: &Thing, ids: &[String], canonical_id: &str, document: &mut IndexDocument) {
        let label = thing.pref_label.as_str();
        let person_id = find_tagged_id(TME_PEOPLE, ids);
        let author_id = find_tagged_id(TME_AUTHORS, ids);

        // author-only concepts stay out of people
        if person_id.is_some() || author_id.is_none() {
            document.add_facet(FacetFamily::People, label, ids);
        }

        let authored = matches_uri(&thing.predicate, &self.has_author)
            || matches_uri(&thing.predicate, &self.has_contributor);
        if authored {
            if let Some(author_id) = author_id {
                document.add_facet(FacetFamily::Authors, label, &[author_id, canonical_id]);
            }
        }

        if matches_uri(&thing.predicate, &self.about) {
            document.set_primary_theme(label, tagged_id_or_fallback(TME_PEOPLE, ids));
        }
    }
}

/// Exact URI match; an unconfigured URI never matches.
fn matches_uri(value: &str, configured: &str) -> bool {
    !configured.is_empty() && value == configured
}
