use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use super::{KvStore, Result, StoreError};
use crate::config::Config;

/// Body of `GET {base}/keys`
#[derive(Debug, Deserialize)]
struct ListKeysResponse {
    #[serde(default)]
    result: Option<Vec<KeyName>>,
}

#[derive(Debug, Deserialize)]
struct KeyName {
    name: String,
}

/// Error envelope returned by the Cloudflare API on failure
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Client for a single Workers KV namespace over the Cloudflare REST API
///
/// Cheap to share: the underlying `reqwest::Client` pools connections and
/// every call is a fresh round trip, nothing is cached locally.
#[derive(Debug, Clone)]
pub struct CloudflareKv {
    client: Client,
    base_url: Url,
    api_token: String,
    list_concurrency: Option<usize>,
}

impl CloudflareKv {
    /// Create a client for the namespace named in the configuration
    ///
    /// The namespace base URL is
    /// `{api_base}/accounts/{account_id}/storage/kv/namespaces/{namespace_id}`.
    ///
    /// # Errors
    /// Returns an error if `api_base` is not a usable URL or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(&config.api_base)
            .with_context(|| format!("Invalid Cloudflare API base URL: {}", config.api_base))?;

        base_url
            .path_segments_mut()
            .map_err(|_| anyhow!("Cloudflare API base URL cannot be a base: {}", config.api_base))?
            .pop_if_empty()
            .extend([
                "accounts",
                config.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                config.namespace_id.as_str(),
            ]);

        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!("Using KV namespace at: {}", base_url);

        Ok(Self {
            client,
            base_url,
            api_token: config.api_token.clone(),
            list_concurrency: (config.list_concurrency > 0).then_some(config.list_concurrency),
        })
    }

    /// URL of `{base}/{segments...}`, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidKey(segments.join("/")))?
            .extend(segments);
        Ok(url)
    }

    fn value_url(&self, key: &str) -> Result<Url> {
        if key.is_empty() || key == "." || key == ".." {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.endpoint(&["values", key])
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.api_token)
    }
}

/// Turn a non-success response into an `Upstream` error
///
/// Uses the first message in the API error envelope. When the body is not an
/// envelope at all the HTTP reason phrase is used instead, and when the
/// envelope carries no message (or an empty one) the numeric status is
/// reported.
async fn upstream_error(response: Response) -> StoreError {
    let status = response.status();
    let message = match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope
            .errors
            .into_iter()
            .next()
            .and_then(|detail| detail.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
        Err(_) => status_text(status),
    };
    StoreError::Upstream(message)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

#[async_trait]
impl KvStore for CloudflareKv {
    async fn list_keys(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["keys"])?;
        tracing::debug!("Listing keys from: {}", url);

        let response = self.authorized(self.client.get(url)).send().await?;
        if !response.status().is_success() {
            let error = upstream_error(response).await;
            tracing::error!("List keys error: {}", error);
            return Err(error);
        }

        let body: ListKeysResponse = response.json().await?;
        let keys: Vec<String> = body
            .result
            .unwrap_or_default()
            .into_iter()
            .map(|key| key.name)
            .collect();

        tracing::debug!("Listed {} keys", keys.len());
        Ok(keys)
    }

    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let url = self.value_url(key)?;

        let response = self.authorized(self.client.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Key not found: {}", key);
            return Ok(None);
        }
        if !response.status().is_success() {
            let error = upstream_error(response).await;
            tracing::error!("Get value error for {}: {}", key, error);
            return Err(error);
        }

        let value = response.text().await?;
        tracing::debug!("Read value for key: {}", key);
        Ok(Some(value))
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let url = self.value_url(key)?;

        let response = self
            .authorized(self.client.put(url))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(value.to_string())
            .send()
            .await?;
        if !response.status().is_success() {
            let error = upstream_error(response).await;
            tracing::error!("Put value error for {}: {}", key, error);
            return Err(error);
        }

        tracing::debug!("Stored value for key: {}", key);
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<()> {
        let url = self.value_url(key)?;

        let response = self.authorized(self.client.delete(url)).send().await?;
        if !response.status().is_success() {
            let error = upstream_error(response).await;
            tracing::error!("Delete value error for {}: {}", key, error);
            return Err(error);
        }

        tracing::debug!("Deleted key: {}", key);
        Ok(())
    }

    fn list_concurrency(&self) -> Option<usize> {
        self.list_concurrency
    }
}
