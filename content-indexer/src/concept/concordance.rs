//! HTTP client for the public concordances API.

use async_trait::async_trait;
use content_indexer_shared::{ConceptModel, ConceptModels};
use reqwest::{header, Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::concept::{ConceptReader, THING_URI_PREFIX};
use crate::consumer::TRANSACTION_ID_HEADER;
use crate::errors::ConceptError;

const CONCORDANCES_PATH: &str = "/concordances";
const CONCEPT_ID_PARAM: &str = "conceptId";
const GTG_PATH: &str = "/__gtg";
const USER_AGENT: &str = "UPP content-rw-elasticsearch";

const TME_AUTHORITY: &str = "http://api.ft.com/system/FT-TME";
const UPP_AUTHORITY: &str = "http://api.ft.com/system/UPP";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConcordanceConcept {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConcordanceIdentifier {
    pub identifier_value: String,
    pub authority: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Concordance {
    pub concept: ConcordanceConcept,
    pub identifier: ConcordanceIdentifier,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConcordancesResponse {
    pub concordances: Vec<Concordance>,
}

/// Build concept models from a concordance response.
///
/// Every concept gets an entry, even without TME identifiers. A UPP identifier
/// registers its thing URI as an alias holding a copy of the concept's model
/// as accumulated so far, unless that alias is already known.
pub fn transform_to_concept_models(response: ConcordancesResponse) -> ConceptModels {
    let mut models = ConceptModels::new();

    for concordance in response.concordances {
        let concept_id = concordance.concept.id;
        models.entry(concept_id.clone()).or_default();

        match concordance.identifier.authority.as_str() {
            TME_AUTHORITY => {
                if let Some(model) = models.get_mut(&concept_id) {
                    model
                        .tme_ids
                        .push(concordance.identifier.identifier_value);
                }
            }
            UPP_AUTHORITY => {
                let alias = format!(
                    "{}{}",
                    THING_URI_PREFIX, concordance.identifier.identifier_value
                );
                if !models.contains_key(&alias) {
                    let snapshot: ConceptModel = models
                        .get(&concept_id)
                        .cloned()
                        .unwrap_or_default();
                    models.insert(alias, snapshot);
                }
            }
            _ => {}
        }
    }

    models
}

/// Production `ConceptReader` backed by the concordances API.
pub struct ConcordanceApiClient {
    base_url: String,
    client: ReqwestClient,
}

impl ConcordanceApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, ReqwestClient::new())
    }

    pub fn with_client(base_url: &str, client: ReqwestClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl ConceptReader for ConcordanceApiClient {
    async fn get_concepts(&self, tid: &str, ids: &[String]) -> Result<ConceptModels, ConceptError> {
        let query: Vec<(&str, &str)> = ids
            .iter()
            .map(|id| (CONCEPT_ID_PARAM, id.as_str()))
            .collect();

        let response = self
            .client
            .get(format!("{}{}", self.base_url, CONCORDANCES_PATH))
            .query(&query)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json")
            .header(TRANSACTION_ID_HEADER, tid)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ConceptError::UnexpectedStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        let concordances: ConcordancesResponse =
            serde_json::from_str(&body).map_err(|e| ConceptError::parse(e.to_string()))?;

        debug!(
            transaction_id = %tid,
            requested = ids.len(),
            concordances = concordances.concordances.len(),
            "Resolved concordances"
        );
        Ok(transform_to_concept_models(concordances))
    }

    /// Check the service's good-to-go endpoint.
    async fn health_check(&self) -> Result<String, ConceptError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, GTG_PATH))
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ConceptError::UnexpectedStatus(response.status().as_u16()));
        }
        Ok("Concordance API is healthy".to_string())
    }
}
