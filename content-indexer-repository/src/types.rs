//! Request and response types for search engine operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of indexing a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResult {
    pub index: String,
    pub collection: String,
    pub id: String,
    pub version: Option<i64>,
    /// True when the document did not exist before.
    pub created: bool,
}

impl IndexResult {
    /// Build a result from the engine's index response body.
    ///
    /// Older engines report `created: true`, newer ones `result: "created"`;
    /// both are understood.
    pub fn from_response(index: &str, collection: &str, id: &str, body: &Value) -> Self {
        let created = body.get("created").and_then(Value::as_bool).unwrap_or(false)
            || body.get("result").and_then(Value::as_str) == Some("created");

        Self {
            index: index.to_string(),
            collection: collection.to_string(),
            id: id.to_string(),
            version: body.get("_version").and_then(Value::as_i64),
            created,
        }
    }
}

/// Outcome of deleting a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    pub index: String,
    pub collection: String,
    pub id: String,
    pub version: Option<i64>,
    /// False when there was nothing to delete.
    pub found: bool,
}

/// Cluster health as returned by `/_cluster/health`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClusterHealth {
    pub cluster_name: String,
    pub status: String,
    pub timed_out: bool,
    pub number_of_nodes: i64,
    pub number_of_data_nodes: i64,
    pub active_primary_shards: i64,
    pub active_shards: i64,
    pub relocating_shards: i64,
    pub initializing_shards: i64,
    pub unassigned_shards: i64,
}

impl ClusterHealth {
    pub fn is_green(&self) -> bool {
        self.status == "green"
    }
}

/// Settings and mappings of a single index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_result_legacy_created_flag() {
        let body = json!({"_index": "ft", "_type": "FTCom", "_id": "1", "_version": 3, "created": true});
        let result = IndexResult::from_response("ft", "FTCom", "1", &body);

        assert!(result.created);
        assert_eq!(result.version, Some(3));
    }

    #[test]
    fn test_index_result_result_field() {
        let body = json!({"_version": 2, "result": "updated"});
        let result = IndexResult::from_response("ft", "FTCom", "1", &body);

        assert!(!result.created);
        assert_eq!(result.version, Some(2));
    }

    #[test]
    fn test_cluster_health_parse() {
        let health: ClusterHealth =
            serde_json::from_value(json!({"cluster_name": "c", "status": "green", "number_of_nodes": 3}))
                .unwrap();

        assert!(health.is_green());
        assert_eq!(health.number_of_nodes, 3);
        assert_eq!(health.unassigned_shards, 0);
    }
}
