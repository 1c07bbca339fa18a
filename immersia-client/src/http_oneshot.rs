// immersia-client/src/http_oneshot.rs
// Oneshot HTTP client - in-memory calls into an axum Router
//
// Requires the "in-process" feature

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::Request;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{ClientError, ClientResult};

use super::http::HttpClient;

/// Oneshot HTTP client (in-memory calls)
///
/// Drives a Router through `tower::ServiceExt::oneshot`, so a backend (or a
/// fake of it) can run in the same process with no sockets involved. Paths
/// are mounted under `/`, mirroring the network client's base URL.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use immersia_client::{ApiClient, OneshotHttpClient};
///
/// let router: Router = fake_backend();
/// let api = ApiClient::new(OneshotHttpClient::new(router));
/// let games = api.list_games().await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    token: Arc<RwLock<Option<String>>>,
}

impl OneshotHttpClient {
    /// Create a new oneshot client
    ///
    /// # Arguments
    /// * `router` - fully built Router (`with_state` already applied)
    pub fn new(router: Router) -> Self {
        Self {
            router,
            token: Arc::new(RwLock::new(None)),
        }
    }

    fn uri(path: &str, query: &[(&str, &str)]) -> String {
        let mut uri = format!("/{}", path.trim_start_matches('/'));
        if !query.is_empty() {
            let pairs: Vec<String> = query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            uri.push('?');
            uri.push_str(&pairs.join("&"));
        }
        uri
    }

    fn build_request(
        &self,
        method: http::Method,
        uri: &str,
        body: Option<Vec<u8>>,
    ) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = self.token.read().as_ref() {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }

        builder
            .body(Body::from(body.unwrap_or_default()))
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }

    /// Execute the request and return the raw body of a success response
    async fn execute(&self, request: Request<Body>) -> ClientResult<Vec<u8>> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body_bytes).to_string();
            tracing::warn!(status = status.as_u16(), body = %text, "Request failed");
            return Err(ClientError::from_status(status.as_u16(), &text));
        }

        Ok(body_bytes.to_vec())
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
        let bytes: &[u8] = if bytes.is_empty() { b"null" } else { bytes };
        serde_json::from_slice(bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to decode body: {}", e)))
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_with_query(path, &[]).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let request = self.build_request(http::Method::GET, &Self::uri(path, query), None)?;
        let bytes = self.execute(request).await?;
        Self::decode(&bytes)
    }

    async fn get_bytes(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<Vec<u8>> {
        let request = self.build_request(http::Method::GET, &Self::uri(path, query), None)?;
        self.execute(request).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_vec(body)?;
        let request = self.build_request(http::Method::POST, &Self::uri(path, &[]), Some(body))?;
        let bytes = self.execute(request).await?;
        Self::decode(&bytes)
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_vec(body)?;
        let request = self.build_request(http::Method::PUT, &Self::uri(path, &[]), Some(body))?;
        let bytes = self.execute(request).await?;
        Self::decode(&bytes)
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_encodes_query() {
        assert_eq!(OneshotHttpClient::uri("admin/games", &[]), "/admin/games");
        assert_eq!(
            OneshotHttpClient::uri("admin/users/1", &[("phone", "+234 801")]),
            "/admin/users/1?phone=%2B234%20801"
        );
    }
}
