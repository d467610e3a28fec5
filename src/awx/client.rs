//! AWX Client
//!
//! Main client for interacting with the AWX API, combining authentication
//! and HTTP functionality.

use super::auth::AwxCredentials;
use super::http::AwxHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Root of the versioned AWX REST API
const API_ROOT: &str = "api/v2/";

/// Main AWX client
#[derive(Clone)]
pub struct AwxClient {
    pub credentials: AwxCredentials,
    pub http: AwxHttpClient,
    base_url: Url,
}

impl AwxClient {
    /// Create a new AWX client for the given host
    pub fn new(host: &str, credentials: AwxCredentials, insecure: bool) -> Result<Self> {
        let base_url = parse_host(host)?;
        let http = AwxHttpClient::new(insecure)?;

        tracing::debug!("AWX client for {} using {:?}", base_url, credentials);

        Ok(Self {
            credentials,
            http,
            base_url,
        })
    }

    /// The host the client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request to the AWX API
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        self.http.get(url, &self.credentials, query).await
    }

    /// Make a POST request to the AWX API
    pub async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        self.http.post(url, &self.credentials, body).await
    }

    /// Make a PUT request to the AWX API
    pub async fn put(&self, url: &str, body: &Value) -> Result<Value> {
        self.http.put(url, &self.credentials, body).await
    }

    /// Make a DELETE request to the AWX API
    pub async fn delete(&self, url: &str) -> Result<Value> {
        self.http.delete(url, &self.credentials).await
    }

    /// Check that the server answers and report its version
    pub async fn ping(&self) -> Result<String> {
        let response = self.get(&self.api_url("ping/"), &[]).await?;
        Ok(response
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string())
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build an API URL below `/api/v2/`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_ROOT, path.trim_start_matches('/'))
    }

    /// Build the Projects collection URL
    pub fn projects_url(&self) -> String {
        self.api_url("projects/")
    }

    /// Build a single Project URL
    pub fn project_url(&self, id: i64) -> String {
        self.api_url(&format!("projects/{}/", id))
    }

    /// Resolve a link returned by the API (e.g. a pagination `next` value),
    /// which is usually a server-relative path
    pub fn resolve_link(&self, link: &str) -> Result<String> {
        self.base_url
            .join(link)
            .map(String::from)
            .with_context(|| format!("Invalid link returned by AWX: {}", link))
    }
}

/// Normalize the configured host into a base URL ending in `/`
fn parse_host(host: &str) -> Result<Url> {
    let host = host.trim();
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };

    let mut url =
        Url::parse(&with_scheme).with_context(|| format!("Invalid AWX host: {}", host))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
