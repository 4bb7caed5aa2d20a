//! HTTP client for introspection requests.

use crate::{
    introspection_to_schema, IntrospectionError, IntrospectionResponse, Result, INTROSPECTION_QUERY,
};
use graphql_autoquery::Schema;
use std::collections::HashMap;
use std::time::Duration;

/// Default timeout for introspection requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Sends the introspection query to a GraphQL endpoint.
///
/// Requests carry any configured headers (typically authentication) and are
/// bounded by a request and a connect timeout. Retries are off by default;
/// when enabled they back off exponentially starting at one second and only
/// apply to network failures and 5xx responses.
///
/// # Examples
///
/// ```no_run
/// use graphql_introspect::IntrospectionClient;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = IntrospectionClient::new()
///     .with_header("Authorization", "Bearer my-token")
///     .with_timeout(Duration::from_secs(60))
///     .with_retries(2)
///     .fetch_schema("https://api.example.com/graphql")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    headers: HashMap<String, String>,
    timeout: Duration,
    connect_timeout: Duration,
    retries: u32,
}

impl Default for IntrospectionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IntrospectionClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            headers: HashMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            retries: 0,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Maximum time for the whole request, connection included.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Number of extra attempts after a retryable failure.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Fetches the endpoint's schema and converts it for generation.
    pub async fn fetch_schema(&self, url: &str) -> Result<Schema> {
        let response = self.execute(url).await?;
        introspection_to_schema(&response)
    }

    /// Executes the introspection query, retrying retryable failures.
    #[tracing::instrument(skip(self), fields(retries = self.retries))]
    pub async fn execute(&self, url: &str) -> Result<IntrospectionResponse> {
        let mut attempt = 0;
        loop {
            match self.execute_once(url).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    let delay = Duration::from_secs(1 << attempt.min(6));
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %err,
                        "Retrying introspection"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn execute_once(&self, url: &str) -> Result<IntrospectionResponse> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| {
                IntrospectionError::Network(format!("Failed to create HTTP client: {e}"))
            })?;

        let mut request = client
            .post(url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        tracing::info!("Sending introspection query");
        let response = request
            .json(&serde_json::json!({ "query": INTROSPECTION_QUERY }))
            .send()
            .await
            .map_err(|e| IntrospectionError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "HTTP error response");
            return Err(IntrospectionError::Http(status.as_u16(), body));
        }

        let introspection: IntrospectionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse introspection response");
            IntrospectionError::Parse(e.to_string())
        })?;

        if let Some(data) = &introspection.data {
            tracing::info!(types = data.schema.types.len(), "Introspection successful");
        }
        Ok(introspection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PING_SCHEMA: &str = r#"{"data":{"__schema":{"queryType":{"name":"Query"},"mutationType":null,"subscriptionType":null,"types":[{"kind":"OBJECT","name":"Query","fields":[{"name":"ping","args":[],"type":{"kind":"SCALAR","name":"String","ofType":null}}]},{"kind":"SCALAR","name":"String","fields":null}]}}}"#;

    /// Serves a single canned HTTP response and returns the endpoint URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        serve_sequence(vec![(status, body)]).await
    }

    /// Answers one connection per response, in order, and returns the
    /// endpoint URL.
    async fn serve_sequence(responses: Vec<(&'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut chunk = [0u8; 4096];
                while !request_complete(&request) {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/graphql")
    }

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.trim().eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        buf.len() >= header_end + 4 + content_length
    }

    #[test]
    fn test_client_default() {
        let client = IntrospectionClient::new();
        assert!(client.headers.is_empty());
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.connect_timeout, Duration::from_secs(10));
        assert_eq!(client.retries, 0);
    }

    #[test]
    fn test_client_builders() {
        let client = IntrospectionClient::new()
            .with_header("Authorization", "Bearer token")
            .with_headers(vec![("X-API-Key", "key123")])
            .with_timeout(Duration::from_secs(60))
            .with_retries(3);

        assert_eq!(
            client.headers.get("Authorization"),
            Some(&"Bearer token".to_string())
        );
        assert_eq!(client.headers.len(), 2);
        assert_eq!(client.timeout, Duration::from_secs(60));
        assert_eq!(client.retries, 3);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(IntrospectionError::Network("timeout".into()).is_retryable());
        assert!(IntrospectionError::Http(503, String::new()).is_retryable());
        assert!(!IntrospectionError::Http(401, String::new()).is_retryable());
        assert!(!IntrospectionError::Parse("bad json".into()).is_retryable());
        assert!(!IntrospectionError::Invalid("no data".into()).is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_schema_from_endpoint() {
        let url = serve_once("200 OK", PING_SCHEMA).await;

        let schema = IntrospectionClient::new()
            .fetch_schema(&url)
            .await
            .unwrap();
        assert_eq!(schema.query_type(), Some("Query"));
        assert!(schema.get("Query").is_some());
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let url = serve_sequence(vec![
            ("503 Service Unavailable", r#"{"error":"warming up"}"#),
            ("200 OK", PING_SCHEMA),
        ])
        .await;

        let schema = IntrospectionClient::new()
            .with_retries(1)
            .fetch_schema(&url)
            .await
            .unwrap();
        assert_eq!(schema.query_type(), Some("Query"));
    }

    #[tokio::test]
    async fn test_server_error_without_retries_fails() {
        let url = serve_sequence(vec![
            ("503 Service Unavailable", r#"{"error":"warming up"}"#),
            ("200 OK", PING_SCHEMA),
        ])
        .await;

        let err = IntrospectionClient::new().execute(&url).await.unwrap_err();
        assert!(matches!(err, IntrospectionError::Http(503, _)));
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let url = serve_once("401 Unauthorized", r#"{"error":"nope"}"#).await;
        let err = IntrospectionClient::new().execute(&url).await.unwrap_err();
        assert!(matches!(err, IntrospectionError::Http(401, ref body) if body.contains("nope")));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = IntrospectionClient::new()
            .execute(&format!("http://{addr}/graphql"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntrospectionError::Network(_)));
    }
}
