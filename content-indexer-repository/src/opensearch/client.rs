//! OpenSearch client implementation.
//!
//! The legacy index still routes documents by type, so document requests are
//! sent as raw requests on `/{index}/{collection}/{id}` instead of through the
//! typeless document APIs.

use async_trait::async_trait;
use aws_credential_types::{provider::SharedCredentialsProvider, Credentials};
use aws_types::region::Region;
use opensearch::{
    auth::Credentials as AuthCredentials,
    cluster::ClusterHealthParts,
    http::{
        headers::HeaderMap,
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method, StatusCode,
    },
    indices::IndicesGetParts,
    OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::AccessConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchClient;
use crate::types::{ClusterHealth, DeleteResult, IndexDefinition, IndexResult};

/// AWS service name used when signing requests.
const SIGNING_SERVICE: &str = "es";

/// OpenSearch-backed `SearchClient`.
///
/// Uses a single-node connection pool; node sniffing is never enabled because
/// managed clusters do not expose their nodes.
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a client for the configured endpoint.
    ///
    /// No request is sent; see `ping` or `OpenSearchConnector` to verify that
    /// the engine is reachable.
    pub fn new(config: &AccessConfig) -> Result<Self, SearchIndexError> {
        let endpoint = config.endpoint_url();
        let parsed_url =
            Url::parse(&endpoint).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        if config.signs_requests() {
            let credentials = Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "static",
            );
            builder = builder
                .auth(AuthCredentials::AwsSigV4(
                    SharedCredentialsProvider::new(credentials),
                    Region::new(config.region.clone()),
                ))
                .service_name(SIGNING_SERVICE);
        }

        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            endpoint = %endpoint,
            signed = config.signs_requests(),
            region = %config.region,
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Check that the engine answers.
    pub async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }
        Ok(())
    }

    fn document_path(index: &str, collection: &str, id: &str) -> String {
        format!("/{}/{}/{}", index, collection, id)
    }

    async fn read_json(response: Response) -> Result<Value, SearchIndexError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }
}

#[async_trait]
impl SearchClient for OpenSearchClient {
    async fn index_document(
        &self,
        index: &str,
        collection: &str,
        id: &str,
        body: Value,
    ) -> Result<IndexResult, SearchIndexError> {
        let path = Self::document_path(index, collection, id);
        let response = self
            .client
            .send(
                Method::Put,
                &path,
                HeaderMap::new(),
                None::<&()>,
                Some(JsonBody::new(body)),
                None,
            )
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, path = %path, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        let body = Self::read_json(response).await?;
        debug!(path = %path, "Document indexed");
        Ok(IndexResult::from_response(index, collection, id, &body))
    }

    async fn delete_document(
        &self,
        index: &str,
        collection: &str,
        id: &str,
    ) -> Result<DeleteResult, SearchIndexError> {
        let path = Self::document_path(index, collection, id);
        let response = self
            .client
            .send(
                Method::Delete,
                &path,
                HeaderMap::new(),
                None::<&()>,
                None::<()>,
                None,
            )
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 means there was nothing to delete
        if status == StatusCode::NOT_FOUND {
            debug!(path = %path, "Document to delete not found");
            return Ok(DeleteResult {
                index: index.to_string(),
                collection: collection.to_string(),
                id: id.to_string(),
                version: None,
                found: false,
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, path = %path, "Delete request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        let body = Self::read_json(response).await?;
        debug!(path = %path, "Document deleted");
        Ok(DeleteResult {
            index: index.to_string(),
            collection: collection.to_string(),
            id: id.to_string(),
            version: body.get("_version").and_then(Value::as_i64),
            found: true,
        })
    }

    async fn get_document(
        &self,
        index: &str,
        collection: &str,
        id: &str,
    ) -> Result<Option<Value>, SearchIndexError> {
        let path = Self::document_path(index, collection, id);
        let response = self
            .client
            .send(
                Method::Get,
                &path,
                HeaderMap::new(),
                None::<&()>,
                None::<()>,
                None,
            )
            .await
            .map_err(|e| SearchIndexError::read(e.to_string()))?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::read(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let body = Self::read_json(response).await?;
        Ok(body.get("_source").cloned())
    }

    async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::read(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::read(format!(
                "Cluster health failed with status {}",
                status
            )));
        }

        response
            .json::<ClusterHealth>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    async fn get_index(&self, index: &str) -> Result<IndexDefinition, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::read(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::read(format!(
                "Index get failed with status {}: {}",
                status, error_body
            )));
        }

        let mut body = Self::read_json(response).await?;
        let definition = body
            .get_mut(index)
            .map(Value::take)
            .ok_or_else(|| SearchIndexError::parse(format!("Index {} missing from response", index)))?;

        serde_json::from_value(definition).map_err(|e| SearchIndexError::parse(e.to_string()))
    }
}
