use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::{AdminSettings, QdrantConfig};
use crate::qdrant::error::QdrantError;
use crate::qdrant::models::{
    ApiResponse, ApiStatus, CollectionInfo, CollectionList, CollectionSummary, CreateCollection,
    ServiceInfo, VectorParams,
};

/// Collection operations the administrator needs from the remote service.
#[async_trait]
pub trait CollectionService: Send + Sync {
    /// Liveness check (`GET /`)
    async fn health_check(&self) -> Result<ServiceInfo, QdrantError>;

    async fn list_collections(&self) -> Result<Vec<CollectionSummary>, QdrantError>;

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo, QdrantError>;

    async fn create_collection(&self, name: &str, params: &VectorParams)
        -> Result<(), QdrantError>;

    async fn delete_collection(&self, name: &str) -> Result<(), QdrantError>;
}

/// Wrapper for the Qdrant REST API
pub struct QdrantClient {
    http: Client,
    base_url: Url,
    credentials: Option<(String, String)>,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl QdrantClient {
    /// Create a new client with the given configuration
    pub fn new(config: &QdrantConfig, settings: &AdminSettings) -> Result<Self, QdrantError> {
        let base_url = config
            .base_url()
            .map_err(|e| QdrantError::ConfigError(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| QdrantError::ConfigError(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            credentials: config
                .credentials()
                .map(|(user, password)| (user.to_string(), password.to_string())),
            read_timeout: settings.read_timeout,
            write_timeout: settings.write_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, QdrantError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| QdrantError::ConfigError(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, timeout: Duration) -> RequestBuilder {
        debug!(%method, %url, "qdrant request");
        let builder = self.http.request(method, url).timeout(timeout);
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, Some(password)),
            None => builder,
        }
    }

    /// Send a request and unwrap the response envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<T, QdrantError> {
        let response = builder
            .send()
            .await
            .map_err(|e| QdrantError::from_reqwest(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QdrantError::from_reqwest(e, timeout))?;

        if !(status == StatusCode::OK || status == StatusCode::CREATED) {
            return Err(http_error(status, &body));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| QdrantError::UnexpectedResponse(format!("{e}: {}", truncate(&body))))?;
        envelope.into_result()
    }

    /// Mutations report success as `"result": true`.
    async fn send_acknowledged(
        &self,
        builder: RequestBuilder,
        action: &str,
    ) -> Result<(), QdrantError> {
        let acknowledged: bool = self.send(builder, self.write_timeout).await?;
        if acknowledged {
            Ok(())
        } else {
            Err(QdrantError::UnexpectedResponse(format!(
                "{action} was not acknowledged"
            )))
        }
    }
}

#[async_trait]
impl CollectionService for QdrantClient {
    async fn health_check(&self) -> Result<ServiceInfo, QdrantError> {
        let url = self.endpoint(&[])?;
        let response = self
            .request(Method::GET, url, self.read_timeout)
            .send()
            .await
            .map_err(|e| QdrantError::from_reqwest(e, self.read_timeout))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status, &body));
        }

        // The liveness body is informational only
        Ok(response.json::<ServiceInfo>().await.unwrap_or_else(|e| {
            debug!(error = %e, "liveness body was not service info");
            ServiceInfo::default()
        }))
    }

    async fn list_collections(&self) -> Result<Vec<CollectionSummary>, QdrantError> {
        let url = self.endpoint(&["collections"])?;
        let builder = self.request(Method::GET, url, self.read_timeout);
        let list: CollectionList = self.send(builder, self.read_timeout).await?;
        Ok(list.collections)
    }

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo, QdrantError> {
        let url = self.endpoint(&["collections", name])?;
        let builder = self.request(Method::GET, url, self.read_timeout);
        self.send(builder, self.read_timeout).await
    }

    async fn create_collection(
        &self,
        name: &str,
        params: &VectorParams,
    ) -> Result<(), QdrantError> {
        let url = self.endpoint(&["collections", name])?;
        let builder = self
            .request(Method::PUT, url, self.write_timeout)
            .json(&CreateCollection { vectors: params });
        self.send_acknowledged(builder, "create").await.map_err(|e| {
            warn!(collection = name, error = %e, "create failed");
            e
        })
    }

    async fn delete_collection(&self, name: &str) -> Result<(), QdrantError> {
        let url = self.endpoint(&["collections", name])?;
        let builder = self.request(Method::DELETE, url, self.write_timeout);
        self.send_acknowledged(builder, "delete").await.map_err(|e| {
            warn!(collection = name, error = %e, "delete failed");
            e
        })
    }
}

fn http_error(status: StatusCode, body: &str) -> QdrantError {
    // Qdrant puts the reason in the error envelope; fall back to the raw body
    let message = match serde_json::from_str::<ApiResponse<serde_json::Value>>(body) {
        Ok(ApiResponse {
            status: ApiStatus::Failure { error },
            ..
        }) => error,
        _ => truncate(body),
    };
    QdrantError::HttpError {
        status: status.as_u16(),
        message,
    }
}

fn truncate(body: &str) -> String {
    const LIMIT: usize = 200;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
