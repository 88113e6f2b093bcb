//! Thin client for the Defenzo backend API.
//!
//! All requests go through [`ApiClient`], which attaches the stored bearer
//! token and normalizes failures into [`ApiError`]: a 401 clears the stored
//! session, 5xx becomes `Server`, transport trouble becomes `Network`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use storage::repository::SessionRepository;

use crate::error::ApiError;

pub mod types;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client bound to one backend base URL and one token store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionRepository>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, session: Arc<dyn SessionRepository>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.session.load_token().await? {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Ok(request),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                ApiError::Network(e)
            } else {
                ApiError::Http(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // The stored token is stale; drop it so the next attempt starts clean.
            if let Err(e) = self.session.clear_token().await {
                tracing::warn!(error = %e, "could not clear stale session token");
            }
            return Err(ApiError::Unauthorized);
        }
        if status.is_server_error() {
            return Err(ApiError::Server(status));
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response.json::<T>().await.map_err(ApiError::Decode)
    }

    /// GET `path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or decode failures.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorized(self.client.get(self.endpoint(path))).await?;
        Self::decode(self.send(request).await?).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or decode failures.
    pub async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorized(self.client.post(self.endpoint(path)).json(body))
            .await?;
        Self::decode(self.send(request).await?).await
    }

    /// POST `body` as JSON to `path`, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or auth failures.
    pub async fn post_json_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self
            .authorized(self.client.post(self.endpoint(path)).json(body))
            .await?;
        self.send(request).await?;
        Ok(())
    }

    /// PUT `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or decode failures.
    pub async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorized(self.client.put(self.endpoint(path)).json(body))
            .await?;
        Self::decode(self.send(request).await?).await
    }

    /// POST a multipart form to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or decode failures.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self
            .authorized(self.client.post(self.endpoint(path)).multipart(form))
            .await?;
        Self::decode(self.send(request).await?).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[test]
    fn endpoint_joins_base_and_path() {
        let client = ApiClient::new(
            "https://defenzo.example/",
            Arc::new(InMemoryRepository::new()),
        );
        assert_eq!(
            client.endpoint("/courses"),
            "https://defenzo.example/api/courses"
        );
    }
}
