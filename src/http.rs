//! Shared HTTP client: base URL, default headers, envelope decoding

use crate::config::ClientConfig;
use crate::error::{ClientError, Result, GENERIC_MESSAGE};
use crate::types::Envelope;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Single HTTP client every backend call goes through
///
/// Keeps a cookie jar so the session cookie set at login is sent back on
/// refresh.
#[derive(Debug, Clone)]
pub struct HttpCore {
    base_url: String,
    client: Client,
}

impl HttpCore {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Configuration(format!(
                "base url must be http(s), got {:?}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path such as `/api/user/login`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(method = %method, path = %path, "Preparing request");
        self.client.request(method, self.url(path))
    }

    /// Send a request and decode the envelope.
    ///
    /// Non-2xx responses become `ClientError::Server`, carrying the envelope
    /// message when the body has one. A 2xx envelope is returned as is, even
    /// with `status: false`; see [`Envelope::ensure_ok`].
    pub async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Envelope<Value>>(&body)
                .ok()
                .map(|envelope| envelope.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_MESSAGE.to_string());

            debug!(status = %status, message = %message, "Request rejected");
            return Err(ClientError::Server {
                status: Some(status.as_u16()),
                message,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        debug!(status = %status, envelope_status = envelope.status, "Request completed");
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let http = HttpCore::new(&ClientConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(http.base_url(), "http://localhost:5000");
        assert_eq!(http.url("/api/user/login"), "http://localhost:5000/api/user/login");
        assert_eq!(http.url("api/chat"), "http://localhost:5000/api/chat");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = HttpCore::new(&ClientConfig::new("localhost:5000")).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_non_2xx_uses_envelope_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/user/login")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":false,"message":"Wrong password"}"#)
            .create_async()
            .await;

        let http = HttpCore::new(&ClientConfig::new(server.url())).unwrap();
        let err = http
            .send::<Value>(http.request(Method::POST, "/api/user/login"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "Wrong password");
    }

    #[tokio::test]
    async fn test_non_2xx_without_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/chat")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let http = HttpCore::new(&ClientConfig::new(server.url())).unwrap();
        let err = http
            .send::<Value>(http.request(Method::GET, "/api/chat"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert_eq!(err.message(), GENERIC_MESSAGE);
    }

    #[tokio::test]
    async fn test_status_false_is_returned() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/user/exist-email")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":false,"message":"Email not found"}"#)
            .create_async()
            .await;

        let http = HttpCore::new(&ClientConfig::new(server.url())).unwrap();
        let envelope = http
            .send::<Value>(http.request(Method::GET, "/api/user/exist-email"))
            .await
            .unwrap();

        assert!(!envelope.status);
        assert_eq!(envelope.message, "Email not found");
    }
}
