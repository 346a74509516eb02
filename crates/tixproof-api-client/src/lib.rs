//! HTTP client for the ticket marketplace backend.
//!
//! Implements [`SubmissionEndpoint`](tixproof_core::SubmissionEndpoint) so an
//! upload session can submit its diff and delete slot artifacts over HTTP.
//! Unlike a plain REST helper, submission calls report the backend status
//! instead of failing on it; the engine decides what counts as success.

pub mod api;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tixproof_core::models::SubmitResponse;
use tixproof_core::{ApiAuthScheme, EngineConfig};

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
    None,
}

const DEFAULT_API_VERSION: &str = "v1";

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_prefix: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: format!("/api/{}", DEFAULT_API_VERSION),
            auth,
        })
    }

    /// Target another API version than the default `v1`.
    pub fn with_api_version(mut self, version: &str) -> Self {
        self.api_prefix = format!("/api/{}", version.trim().trim_matches('/'));
        self
    }

    /// Build a client from loaded configuration. The API key, when set, is
    /// sent with the configured scheme.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let auth = match (&config.api_key, config.api_auth) {
            (Some(key), ApiAuthScheme::Bearer) => Auth::Bearer(key.clone()),
            (Some(key), ApiAuthScheme::ApiKey) => Auth::XApiKey(key.clone()),
            (None, _) => Auth::None,
        };
        let client = Self::new(
            config.api_url.clone(),
            auth,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(client.with_api_version(&config.api_version))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Version prefix for every endpoint path, e.g. `/api/v1`
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
            Auth::None => request,
        }
    }

    /// Send a request and report the status with the body text as message.
    /// Only transport failures are errors.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<SubmitResponse> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            None
        } else {
            Some(body)
        };

        Ok(SubmitResponse { status, message })
    }

    /// POST a JSON body.
    pub async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<SubmitResponse> {
        let url = self.build_url(path);
        self.execute(self.client.post(&url).json(body)).await
    }

    /// POST a multipart form.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<SubmitResponse> {
        let url = self.build_url(path);
        self.execute(self.client.post(&url).multipart(form)).await
    }

    /// DELETE request. Returns Ok(()) on a success status.
    pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        let url = self.build_url(path);
        let mut request = self.client.delete(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = self.execute(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                response.status,
                response.message.unwrap_or_else(|| "Unknown error".to_string())
            ));
        }

        Ok(())
    }
}
