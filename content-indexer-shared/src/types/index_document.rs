//! Document types for the search index.
//!
//! This module defines the document structure written to the content index.
//! Field names follow the legacy index mapping, which mixes snake_case and
//! camelCase, so every non-obvious name is pinned with `serde(rename)`.

use serde::{Deserialize, Serialize};

/// The facet pairs of an [`IndexDocument`].
///
/// Each family is stored as two parallel lists: display names (`cmr_<family>`)
/// and identifiers (`cmr_<family>_ids`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetFamily {
    Orgnames,
    People,
    Authors,
    Companynames,
    Brands,
    Subjects,
    Sections,
    Topics,
    Regions,
    Genres,
    Specialreports,
}

/// Document representation for the content index.
///
/// # Invariants
///
/// - Names and ids within a facet pair never contain duplicates and keep
///   insertion order.
/// - The ids of a facet pair hold the canonical id followed by every legacy
///   id of each concept, so names and ids differ in length for concepts with
///   legacy ids.
/// - A document carries at most one primary theme and at most one primary
///   section; the first one set wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_date: Option<String>,
    #[serde(default)]
    pub mark_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_publish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_publish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub length_millis: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_api_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmr_primarysection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmr_primarysection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmr_primarytheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmr_primarytheme_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_orgnames: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_orgnames_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_people: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_people_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_authors_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_companynames: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_companynames_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_brands: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_brands_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_subjects_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_sections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_sections_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_topics_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_regions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_regions_ids: Vec<String>,
    #[serde(default, rename = "cmr_genre", skip_serializing_if = "Vec::is_empty")]
    pub cmr_genres: Vec<String>,
    #[serde(default, rename = "cmr_genre_id", skip_serializing_if = "Vec::is_empty")]
    pub cmr_genre_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_specialreports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmr_specialreports_ids: Vec<String>,

    #[serde(rename = "bestStory", default)]
    pub best_story: bool,
    #[serde(rename = "internalContentType", skip_serializing_if = "Option::is_none")]
    pub internal_content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "lookupFailure", default)]
    pub lookup_failure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "publishReference", default)]
    pub publish_reference: String,
}

impl IndexDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of a facet pair as `(names, ids)`.
    pub fn facet(&self, family: FacetFamily) -> (&[String], &[String]) {
        match family {
            FacetFamily::Orgnames => (&self.cmr_orgnames, &self.cmr_orgnames_ids),
            FacetFamily::People => (&self.cmr_people, &self.cmr_people_ids),
            FacetFamily::Authors => (&self.cmr_authors, &self.cmr_authors_ids),
            FacetFamily::Companynames => (&self.cmr_companynames, &self.cmr_companynames_ids),
            FacetFamily::Brands => (&self.cmr_brands, &self.cmr_brands_ids),
            FacetFamily::Subjects => (&self.cmr_subjects, &self.cmr_subjects_ids),
            FacetFamily::Sections => (&self.cmr_sections, &self.cmr_sections_ids),
            FacetFamily::Topics => (&self.cmr_topics, &self.cmr_topics_ids),
            FacetFamily::Regions => (&self.cmr_regions, &self.cmr_regions_ids),
            FacetFamily::Genres => (&self.cmr_genres, &self.cmr_genre_ids),
            FacetFamily::Specialreports => {
                (&self.cmr_specialreports, &self.cmr_specialreports_ids)
            }
        }
    }

    fn facet_mut(&mut self, family: FacetFamily) -> (&mut Vec<String>, &mut Vec<String>) {
        match family {
            FacetFamily::Orgnames => (&mut self.cmr_orgnames, &mut self.cmr_orgnames_ids),
            FacetFamily::People => (&mut self.cmr_people, &mut self.cmr_people_ids),
            FacetFamily::Authors => (&mut self.cmr_authors, &mut self.cmr_authors_ids),
            FacetFamily::Companynames => {
                (&mut self.cmr_companynames, &mut self.cmr_companynames_ids)
            }
            FacetFamily::Brands => (&mut self.cmr_brands, &mut self.cmr_brands_ids),
            FacetFamily::Subjects => (&mut self.cmr_subjects, &mut self.cmr_subjects_ids),
            FacetFamily::Sections => (&mut self.cmr_sections, &mut self.cmr_sections_ids),
            FacetFamily::Topics => (&mut self.cmr_topics, &mut self.cmr_topics_ids),
            FacetFamily::Regions => (&mut self.cmr_regions, &mut self.cmr_regions_ids),
            FacetFamily::Genres => (&mut self.cmr_genres, &mut self.cmr_genre_ids),
            FacetFamily::Specialreports => (
                &mut self.cmr_specialreports,
                &mut self.cmr_specialreports_ids,
            ),
        }
    }

    /// Add a name and its ids to a facet pair, skipping values already present.
    pub fn add_facet<S: AsRef<str>>(&mut self, family: FacetFamily, name: &str, ids: &[S]) {
        let (names, existing_ids) = self.facet_mut(family);
        push_unique(names, name);
        for id in ids {
            push_unique(existing_ids, id.as_ref());
        }
    }

    /// Set the primary theme unless one was already recorded.
    pub fn set_primary_theme(&mut self, name: &str, id: &str) {
        if self.cmr_primarytheme.is_some() {
            return;
        }
        self.cmr_primarytheme = Some(name.to_string());
        self.cmr_primarytheme_id = Some(id.to_string());
    }

    /// Set the primary section unless one was already recorded.
    pub fn set_primary_section(&mut self, name: &str, id: &str) {
        if self.cmr_primarysection.is_some() {
            return;
        }
        self.cmr_primarysection = Some(name.to_string());
        self.cmr_primarysection_id = Some(id.to_string());
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_facet_deduplicates_names_and_ids() {
        let mut doc = IndexDocument::new();

        doc.add_facet(FacetFamily::Topics, "Markets", &["id-1", "tme-1"]);
        doc.add_facet(FacetFamily::Topics, "Markets", &["id-1", "tme-2"]);
        doc.add_facet(FacetFamily::Topics, "Equities", &["id-3"]);

        let (names, ids) = doc.facet(FacetFamily::Topics);
        assert_eq!(names, ["Markets", "Equities"]);
        assert_eq!(ids, ["id-1", "tme-1", "tme-2", "id-3"]);
    }

    #[test]
    fn test_facet_ids_hold_every_id_of_a_concept() {
        let mut doc = IndexDocument::new();

        doc.add_facet(FacetFamily::Orgnames, "Acme", &["o1", "tme-a"]);

        let (names, ids) = doc.facet(FacetFamily::Orgnames);
        assert_eq!(names, ["Acme"]);
        assert_eq!(ids, ["o1", "tme-a"]);
    }

    #[test]
    fn test_primary_theme_first_write_wins() {
        let mut doc = IndexDocument::new();

        doc.set_primary_theme("First", "id-1");
        doc.set_primary_theme("Second", "id-2");

        assert_eq!(doc.cmr_primarytheme.as_deref(), Some("First"));
        assert_eq!(doc.cmr_primarytheme_id.as_deref(), Some("id-1"));
    }

    #[test]
    fn test_primary_section_first_write_wins() {
        let mut doc = IndexDocument::new();

        doc.set_primary_section("World", "section-id");
        doc.set_primary_section("Markets", "other-id");

        assert_eq!(doc.cmr_primarysection.as_deref(), Some("World"));
        assert_eq!(doc.cmr_primarysection_id.as_deref(), Some("section-id"));
    }

    #[test]
    fn test_serialization_uses_index_field_names() {
        let mut doc = IndexDocument::new();
        doc.uid = Some("uuid-1".to_string());
        doc.internal_content_type = Some("article".to_string());
        doc.publish_reference = "tid_1".to_string();
        doc.add_facet(FacetFamily::Genres, "News", &["genre-id"]);

        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["uid"], "uuid-1");
        assert_eq!(json["internalContentType"], "article");
        assert_eq!(json["publishReference"], "tid_1");
        assert_eq!(json["cmr_genre"][0], "News");
        assert_eq!(json["cmr_genre_id"][0], "genre-id");
        assert_eq!(json["bestStory"], false);
        assert_eq!(json["lookupFailure"], false);
        assert_eq!(json["mark_deleted"], false);
    }

    #[test]
    fn test_empty_facets_are_not_serialized() {
        let doc = IndexDocument::new();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json.get("cmr_people").is_none());
        assert!(json.get("cmr_people_ids").is_none());
        assert!(json.get("cmr_primarytheme").is_none());
        assert!(json.get("thumbnail_url").is_none());
    }
}
