//! Wire types of the Qdrant HTTP API, limited to the collection endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::qdrant::error::QdrantError;

/// Envelope wrapping every collection endpoint response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub status: ApiStatus,
    pub time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiStatus {
    Text(String),
    Failure { error: String },
}

impl<T> ApiResponse<T> {
    /// Unwrap the `result` of an `ok` response.
    pub fn into_result(self) -> Result<T, QdrantError> {
        match self.status {
            ApiStatus::Text(status) if status == "ok" => self.result.ok_or_else(|| {
                QdrantError::UnexpectedResponse("missing result in ok response".to_string())
            }),
            ApiStatus::Text(status) => Err(QdrantError::ApiError(status)),
            ApiStatus::Failure { error } => Err(QdrantError::ApiError(error)),
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceInfo {
    pub title: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionList {
    pub collections: Vec<CollectionSummary>,
}

/// One entry of `GET /collections`. Most servers only report the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub name: String,
    #[serde(default)]
    pub vectors_count: Option<u64>,
    #[serde(default)]
    pub status: Option<CollectionStatus>,
}

impl CollectionSummary {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vectors_count: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    Green,
    Yellow,
    Grey,
    Red,
    #[serde(other)]
    Unknown,
}

impl CollectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CollectionStatus::Green => "healthy",
            CollectionStatus::Yellow => "warning",
            CollectionStatus::Grey => "pending",
            CollectionStatus::Red => "error",
            CollectionStatus::Unknown => "unknown",
        }
    }
}

/// Result of `GET /collections/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInfo {
    pub status: CollectionStatus,
    pub vectors_count: Option<u64>,
    pub indexed_vectors_count: Option<u64>,
    pub points_count: Option<u64>,
    pub segments_count: Option<u64>,
    pub config: Option<CollectionConfig>,
}

impl CollectionInfo {
    pub fn vectors(&self) -> Option<&VectorsConfig> {
        self.config.as_ref()?.params.vectors.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionConfig {
    #[serde(default)]
    pub params: CollectionParams,
    pub optimizer_config: Option<serde_json::Value>,
    pub hnsw_config: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionParams {
    pub vectors: Option<VectorsConfig>,
}

/// Either a single unnamed vector or a map of named vectors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VectorsConfig {
    Single(VectorParams),
    Named(BTreeMap<String, VectorParams>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorParams {
    pub size: u64,
    pub distance: Distance,
}

/// Body of `PUT /collections/{name}`.
#[derive(Debug, Serialize)]
pub struct CreateCollection<'a> {
    pub vectors: &'a VectorParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Cosine,
    #[serde(alias = "Euclidean")]
    Euclid,
    Dot,
    Manhattan,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Distance::Cosine => "Cosine",
            Distance::Euclid => "Euclidean",
            Distance::Dot => "Dot",
            Distance::Manhattan => "Manhattan",
        };
        f.write_str(name)
    }
}

impl FromStr for Distance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Distance::Cosine),
            "euclid" | "euclidean" => Ok(Distance::Euclid),
            "dot" => Ok(Distance::Dot),
            "manhattan" => Ok(Distance::Manhattan),
            other => Err(format!("unknown distance metric '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_list_with_names_only() {
        let body = json!({
            "result": { "collections": [{ "name": "docs" }, { "name": "faq" }] },
            "status": "ok",
            "time": 0.00002
        });
        let response: ApiResponse<CollectionList> = serde_json::from_value(body).unwrap();
        let list = response.into_result().unwrap();

        assert_eq!(list.collections.len(), 2);
        assert_eq!(list.collections[0], CollectionSummary::named("docs"));
        assert!(list.collections[1].status.is_none());
    }

    #[test]
    fn test_error_envelope() {
        let body = json!({
            "status": { "error": "Wrong input: Collection `docs` already exists!" },
            "time": 0.01
        });
        let response: ApiResponse<bool> = serde_json::from_value(body).unwrap();
        match response.into_result() {
            Err(QdrantError::ApiError(msg)) => assert!(msg.contains("already exists")),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_collection_info_single_vector() {
        let body = json!({
            "result": {
                "status": "green",
                "optimizer_status": "ok",
                "vectors_count": 1200,
                "indexed_vectors_count": 1000,
                "points_count": 1200,
                "segments_count": 4,
                "config": {
                    "params": {
                        "vectors": { "size": 768, "distance": "Euclid" },
                        "shard_number": 1
                    },
                    "hnsw_config": { "m": 16, "ef_construct": 100 },
                    "optimizer_config": { "indexing_threshold": 20000 }
                },
                "payload_schema": {}
            },
            "status": "ok",
            "time": 0.001
        });
        let response: ApiResponse<CollectionInfo> = serde_json::from_value(body).unwrap();
        let info = response.into_result().unwrap();

        assert_eq!(info.status, CollectionStatus::Green);
        assert_eq!(info.vectors_count, Some(1200));
        assert_eq!(
            info.vectors(),
            Some(&VectorsConfig::Single(VectorParams {
                size: 768,
                distance: Distance::Euclid,
            }))
        );
        assert!(info.config.unwrap().optimizer_config.is_some());
    }

    #[test]
    fn test_collection_info_named_vectors() {
        let body = json!({
            "status": "yellow",
            "config": {
                "params": {
                    "vectors": {
                        "image": { "size": 512, "distance": "Dot" },
                        "text": { "size": 384, "distance": "Cosine" }
                    }
                }
            }
        });
        let info: CollectionInfo = serde_json::from_value(body).unwrap();

        match info.vectors() {
            Some(VectorsConfig::Named(named)) => {
                assert_eq!(named.len(), 2);
                assert_eq!(named["text"].distance, Distance::Cosine);
            }
            other => panic!("expected named vectors, got {other:?}"),
        }
        assert!(info.vectors_count.is_none());
    }

    #[test]
    fn test_unknown_status_does_not_fail() {
        let summary: CollectionSummary =
            serde_json::from_value(json!({ "name": "x", "status": "purple" })).unwrap();
        assert_eq!(summary.status, Some(CollectionStatus::Unknown));
    }

    #[test]
    fn test_create_body_uses_wire_distance_names() {
        let params = VectorParams {
            size: 768,
            distance: Distance::Euclid,
        };
        let body = serde_json::to_value(CreateCollection { vectors: &params }).unwrap();
        assert_eq!(body, json!({ "vectors": { "size": 768, "distance": "Euclid" } }));
    }

    #[test]
    fn test_distance_parsing_and_display() {
        assert_eq!("euclidean".parse::<Distance>().unwrap(), Distance::Euclid);
        assert_eq!(" DOT ".parse::<Distance>().unwrap(), Distance::Dot);
        assert!("hamming".parse::<Distance>().is_err());
        assert_eq!(Distance::Euclid.to_string(), "Euclidean");
    }
}
