//! End-to-end handling of content events against a recording search client.

mod common;

use std::sync::Arc;

use content_indexer::concept::MockConceptReader;
use content_indexer::consumer::{QueueMessage, ORIGIN_SYSTEM_ID_HEADER, TRANSACTION_ID_HEADER};
use content_indexer::processor::{HandleOutcome, IgnoreReason};
use serde_json::json;

use common::*;

const UUID: &str = "b7e1a2d8-5c8a-4c3e-9d39-2f3c1c9f2f10";
const PERSON_URI: &str = "http://api.ft.com/things/0f07d468-fc37-3c44-bf19-a81f2aae9f36";
const PERSON_TME_ID: &str = "ZGY1MjE5N2EtNmI1Ni00OGY4LWIyYjYtNTc1MmJkNWQ3N2Jj-UE4=";

fn message(body: serde_json::Value) -> QueueMessage {
    QueueMessage::new(Default::default(), body.to_string())
        .with_header(TRANSACTION_ID_HEADER, "tid_test")
}

fn article(authority: &str) -> serde_json::Value {
    json!({
        "uuid": UUID,
        "markedDeleted": "false",
        "content": {
            "uuid": UUID,
            "title": "A <b>bold</b> title",
            "bodyXML": "<body><p>Some text</p></body>",
            "type": "Article",
            "publishedDate": "2024-03-01T10:00:00.000Z",
            "firstPublishedDate": "2024-03-01T09:00:00.000Z",
            "identifiers": [{"authority": authority, "identifierValue": UUID}]
        },
        "metadata": []
    })
}

#[tokio::test]
async fn test_article_about_person_sets_primary_theme() {
    let concepts = Arc::new(MockConceptReader::new());
    concepts
        .add_concept(PERSON_URI, vec![PERSON_TME_ID.to_string()])
        .await;
    let (handler, client) = connected_handler(concepts).await;

    let mut body = article(METHODE_AUTHORITY);
    body["metadata"] = json!([{
        "thing": {
            "id": PERSON_URI,
            "prefLabel": "Jane Doe",
            "types": [PERSON_TYPE],
            "predicate": ABOUT
        }
    }]);

    assert_eq!(handler.handle(&message(body)).await, HandleOutcome::Written);

    let writes = client.writes();
    assert_eq!(writes.len(), 1);
    let written = &writes[0];
    assert_eq!(written.index, "ft");
    assert_eq!(written.collection, "FTCom");
    assert_eq!(written.id, UUID);

    let document = &written.body;
    assert_eq!(document["uid"], UUID);
    assert_eq!(document["lead_headline"], "A bold title");
    assert_eq!(document["body"], "Some text");
    assert_eq!(document["content_type"], "article");
    assert_eq!(document["publishReference"], "tid_test");
    assert_eq!(document["model_api_url"], format!("https://api.ft.com/content/{}", UUID));
    assert_eq!(document["cmr_primarytheme"], "Jane Doe");
    assert_eq!(document["cmr_primarytheme_id"], PERSON_TME_ID);
    assert_eq!(document["cmr_people"], json!(["Jane Doe"]));
    assert_eq!(
        document["cmr_people_ids"],
        json!(["0f07d468-fc37-3c44-bf19-a81f2aae9f36", PERSON_TME_ID])
    );
    assert!(client.deletes().is_empty());
}

#[tokio::test]
async fn test_marked_deleted_deletes_once() {
    let (handler, client) = connected_handler(Arc::new(MockConceptReader::new())).await;

    let mut body = article(METHODE_AUTHORITY);
    body["markedDeleted"] = json!("true");

    assert_eq!(handler.handle(&message(body)).await, HandleOutcome::Deleted);

    let deletes = client.deletes();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].collection, "FTCom");
    assert_eq!(deletes[0].id, UUID);
    assert!(client.writes().is_empty());
}

#[tokio::test]
async fn test_blog_authority_writes_to_blogs() {
    let (handler, client) = connected_handler(Arc::new(MockConceptReader::new())).await;

    assert_eq!(
        handler.handle(&message(article(WORDPRESS_AUTHORITY))).await,
        HandleOutcome::Written
    );

    let writes = client.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].collection, "FTBlogs");
    assert_eq!(writes[0].body["category"], "blogPost");
}

#[tokio::test]
async fn test_empty_metadata_writes_without_facets() {
    let concepts = Arc::new(MockConceptReader::new());
    let (handler, client) = connected_handler(concepts.clone()).await;

    assert_eq!(
        handler.handle(&message(article(METHODE_AUTHORITY))).await,
        HandleOutcome::Written
    );

    let writes = client.writes();
    assert_eq!(writes.len(), 1);
    let document = writes[0].body.as_object().unwrap();
    assert!(!document.keys().any(|key| key.starts_with("cmr_")));
    assert_eq!(concepts.call_count(), 0);
}

#[tokio::test]
async fn test_last_matching_identifier_wins() {
    let (handler, client) = connected_handler(Arc::new(MockConceptReader::new())).await;

    let mut body = article(METHODE_AUTHORITY);
    body["content"]["identifiers"] = json!([
        {"authority": METHODE_AUTHORITY, "identifierValue": UUID},
        {"authority": WORDPRESS_AUTHORITY, "identifierValue": UUID}
    ]);

    assert_eq!(handler.handle(&message(body)).await, HandleOutcome::Written);
    assert_eq!(client.writes()[0].collection, "FTBlogs");
}

#[tokio::test]
async fn test_concept_lookup_failure_still_writes() {
    let concepts = Arc::new(MockConceptReader::new());
    concepts.fail_with(503).await;
    let (handler, client) = connected_handler(concepts).await;

    let mut body = article(METHODE_AUTHORITY);
    body["metadata"] = json!([{
        "thing": {
            "id": PERSON_URI,
            "prefLabel": "Jane Doe",
            "types": [PERSON_TYPE],
            "predicate": ABOUT
        }
    }]);

    assert_eq!(handler.handle(&message(body)).await, HandleOutcome::Written);
    let writes = client.writes();
    assert!(writes[0].body.get("cmr_people").is_none());
    assert!(writes[0].body.get("cmr_primarytheme").is_none());
}

#[tokio::test]
async fn test_null_fields_are_indexed() {
    let (handler, client) = connected_handler(Arc::new(MockConceptReader::new())).await;

    let mut body = article(METHODE_AUTHORITY);
    body["content"]["standfirst"] = json!(null);
    body["content"]["mainImage"] = json!(null);
    body["content"]["byline"] = json!(null);
    body["metadata"] = json!(null);

    assert_eq!(handler.handle(&message(body)).await, HandleOutcome::Written);

    let writes = client.writes();
    assert_eq!(writes.len(), 1);
    assert!(writes[0].body.get("short_description").is_none());
    assert!(writes[0].body.get("thumbnail_url").is_none());
}

#[tokio::test]
async fn test_unsupported_type_is_ignored() {
    let (handler, client) = connected_handler(Arc::new(MockConceptReader::new())).await;

    let mut body = article(METHODE_AUTHORITY);
    body["content"]["type"] = json!("ContentPackage");

    assert_eq!(
        handler.handle(&message(body)).await,
        HandleOutcome::Ignored(IgnoreReason::UnsupportedType)
    );
    assert!(client.writes().is_empty());
}

#[tokio::test]
async fn test_unknown_origin_is_unclassified() {
    let (handler, client) = connected_handler(Arc::new(MockConceptReader::new())).await;

    let mut body = article(METHODE_AUTHORITY);
    body["content"]["identifiers"] = json!([]);
    let message = message(body).with_header(ORIGIN_SYSTEM_ID_HEADER, "http://cmdb.ft.com/systems/unknown");

    assert_eq!(
        handler.handle(&message).await,
        HandleOutcome::Ignored(IgnoreReason::Unclassified)
    );
    assert!(client.writes().is_empty());
    assert!(client.deletes().is_empty());
}

#[tokio::test]
async fn test_internal_authoring_delete_is_ignored() {
    let (handler, client) = connected_handler(Arc::new(MockConceptReader::new())).await;

    let body = json!({
        "uuid": UUID,
        "markedDeleted": "true",
        "content": {}
    });
    let message = message(body).with_header(ORIGIN_SYSTEM_ID_HEADER, "http://cmdb.ft.com/systems/pac");

    assert_eq!(
        handler.handle(&message).await,
        HandleOutcome::Ignored(IgnoreReason::NoContent)
    );
    assert!(client.deletes().is_empty());
    assert!(client.writes().is_empty());
}

#[tokio::test]
async fn test_synthetic_transaction_is_ignored() {
    let (handler, client) = connected_handler(Arc::new(MockConceptReader::new())).await;

    let message = QueueMessage::new(Default::default(), article(METHODE_AUTHORITY).to_string())
        .with_header(TRANSACTION_ID_HEADER, "SYNTHETIC-REQ-MON_0001");

    assert_eq!(
        handler.handle(&message).await,
        HandleOutcome::Ignored(IgnoreReason::Synthetic)
    );
    assert!(client.writes().is_empty());
}
