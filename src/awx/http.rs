//! HTTP utilities for AWX REST API calls

use super::auth::AwxCredentials;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// User agent sent with every request
const USER_AGENT: &str = concat!("tawx/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull a human readable message out of an AWX error body.
///
/// AWX answers either `{"detail": "..."}` or a map of field name to a list
/// of validation messages (`{"name": ["..."]}`).
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    if let Some(detail) = object.get("detail").and_then(|v| v.as_str()) {
        return Some(detail.to_string());
    }

    let messages: Vec<String> = object
        .iter()
        .filter_map(|(field, v)| {
            let text = match v {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(|i| i.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => return None,
            };
            Some(format!("{}: {}", field, text))
        })
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

/// HTTP client wrapper for AWX API calls
#[derive(Clone)]
pub struct AwxHttpClient {
    client: Client,
}

impl AwxHttpClient {
    /// Create a new HTTP client
    pub fn new(insecure: bool) -> Result<Self> {
        if insecure {
            tracing::warn!("TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request to the AWX API
    pub async fn get(
        &self,
        url: &str,
        credentials: &AwxCredentials,
        query: &[(&str, String)],
    ) -> Result<Value> {
        tracing::debug!("GET {} {:?}", url, query);

        let request = credentials.apply(self.client.get(url).query(query));
        self.execute(request).await
    }

    /// Make a POST request to the AWX API
    pub async fn post(&self, url: &str, credentials: &AwxCredentials, body: &Value) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let request = credentials.apply(self.client.post(url).json(body));
        self.execute(request).await
    }

    /// Make a PUT request to the AWX API
    pub async fn put(&self, url: &str, credentials: &AwxCredentials, body: &Value) -> Result<Value> {
        tracing::debug!("PUT {}", url);

        let request = credentials.apply(self.client.put(url).json(body));
        self.execute(request).await
    }

    /// Make a DELETE request to the AWX API
    pub async fn delete(&self, url: &str, credentials: &AwxCredentials) -> Result<Value> {
        tracing::debug!("DELETE {}", url);

        let request = credentials.apply(self.client.delete(url));
        self.execute(request).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(match error_detail(&body) {
                Some(detail) => anyhow::anyhow!(
                    "API request failed: {}: {}",
                    status,
                    sanitize_for_log(&detail)
                ),
                None => anyhow::anyhow!("API request failed: {}", status),
            });
        }

        // DELETE answers 204 and some endpoints 202 with no content
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Operator hint for an AWX API error, if the failure is a well-known one
pub fn format_awx_error(error: &anyhow::Error) -> Option<&'static str> {
    let error_str = error.to_string();

    if !error_str.contains("API request failed") {
        if error_str.contains("Failed to send request") {
            return Some("Could not reach the AWX host. Check --host / AWX_HOST and your network.");
        }
        return None;
    }

    if error_str.contains("401") {
        return Some("Authentication failed. Check AWX_TOKEN or AWX_USERNAME / AWX_PASSWORD.");
    }
    if error_str.contains("403") {
        return Some("Permission denied. The AWX user lacks the required role on this object.");
    }
    if error_str.contains("404") {
        return Some("Object not found on the AWX server.");
    }
    if error_str.contains("400") {
        return Some("AWX rejected the request. Check the project attributes.");
    }
    if error_str.contains("409") {
        return Some("Conflict. The project may be in use by a running job.");
    }
    if error_str.contains("500") || error_str.contains("502") || error_str.contains("503") {
        return Some("AWX service temporarily unavailable. Please try again.");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_handles_multibyte_boundaries() {
        let body = "é".repeat(300);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated"));
    }

    #[test]
    fn test_error_detail_prefers_detail_field() {
        let body = r#"{"detail": "Authentication credentials were not provided."}"#;
        assert_eq!(
            error_detail(body).as_deref(),
            Some("Authentication credentials were not provided.")
        );
    }

    #[test]
    fn test_error_detail_joins_field_errors() {
        let body = r#"{"scm_url": ["Invalid URL."], "organization": ["This field may not be null."]}"#;
        let detail = error_detail(body).unwrap();
        assert!(detail.contains("scm_url: Invalid URL."));
        assert!(detail.contains("organization: This field may not be null."));
    }

    #[test]
    fn test_error_detail_ignores_non_json() {
        assert!(error_detail("<html>Bad Gateway</html>").is_none());
    }

    #[test]
    fn test_format_awx_error_hints() {
        let err = anyhow::anyhow!("API request failed: 401 Unauthorized");
        assert!(format_awx_error(&err).unwrap().contains("Authentication failed"));

        let err = anyhow::anyhow!("something unrelated");
        assert!(format_awx_error(&err).is_none());
    }
}
