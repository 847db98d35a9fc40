//! HTTP request executor
//!
//! Issues one request per descriptor against the configured base URL and
//! hands back either a response outcome or a transport error. It never
//! prints; callers decide how to present results.

use crate::config::SmokeConfig;
use crate::contracts::*;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::{Duration, Instant};

/// Header carrying the tenant identifier
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Concatenate base URL and path, ensuring exactly one separating slash
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// OrganLink API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client with JSON headers and the configured timeout
    pub fn new(config: &SmokeConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Execute a single request.
    ///
    /// Statuses below 400 have their body parsed as JSON with a raw-text
    /// fallback; error statuses keep the body as text. Only failures to get a
    /// response at all are returned as `Err`.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ResponseOutcome, ClientError> {
        let url = self.url_for(&request.path);

        let mut builder = self.client.request(to_reqwest_method(request.method), &url);

        if let Some(tenant_id) = &request.tenant_id {
            builder = builder.header(TENANT_HEADER, tenant_id);
        }

        if request.method.sends_body() {
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(ClientError::from_transport)?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Body(e.to_string()))?;
        let latency_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            method = %request.method,
            url = %url,
            status,
            latency_ms,
            "request completed"
        );

        Ok(ResponseOutcome::from_response(status, text, latency_ms))
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Client errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to create HTTP client: {0}")]
    Build(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl ClientError {
    /// Classify a send failure
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_connect() {
            ClientError::Connect(err.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_join_url() {
        let base = "http://localhost:8080/api/v1";
        assert_eq!(
            join_url(base, "/actuator/health"),
            "http://localhost:8080/api/v1/actuator/health"
        );
        assert_eq!(
            join_url("http://localhost:8080/api/v1/", "/hospitals"),
            "http://localhost:8080/api/v1/hospitals"
        );
        assert_eq!(
            join_url(base, "organ-types"),
            "http://localhost:8080/api/v1/organ-types"
        );
        assert_eq!(join_url(base, ""), base);
    }

    #[test]
    fn test_client_uses_configured_timeout() {
        let config = SmokeConfig {
            timeout_ms: 1_500,
            ..Default::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(1_500));
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }

    proptest! {
        #[test]
        fn prop_join_url_has_single_separator(
            segments in prop::collection::vec("[a-z0-9-]{1,12}", 1..4),
            trailing in any::<bool>(),
            leading in any::<bool>(),
        ) {
            let base = if trailing {
                "http://localhost:8080/api/v1/".to_string()
            } else {
                "http://localhost:8080/api/v1".to_string()
            };
            let joined = segments.join("/");
            let path = if leading { format!("/{}", joined) } else { joined.clone() };

            let url = join_url(&base, &path);
            prop_assert_eq!(url, format!("http://localhost:8080/api/v1/{}", joined));
        }
    }
}
