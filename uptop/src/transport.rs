//! JSON-over-HTTP transport to the monitoring API.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::{ConsoleError, Result};

/// Per-request options. Content type defaults to JSON; caller headers are merged over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Abstraction over the HTTP client so the console can run against a fake API
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Issue a request for `path` (relative to the API base) and return the parsed JSON body.
    async fn request(&self, path: &str, options: RequestOptions) -> Result<Value>;
}

/// Production transport using reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, tls_ca: Option<&Path>) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ConsoleError::Config(format!("invalid API URL {base_url}: {e}")))?;
        // join() would drop the last path segment without it
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(ca) = tls_ca {
            let pem = std::fs::read(ca).map_err(|e| {
                ConsoleError::Config(format!("reading CA bundle {}: {e}", ca.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| ConsoleError::Config(format!("parsing CA bundle: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder
            .build()
            .map_err(|e| ConsoleError::Config(format!("building HTTP client: {e}")))?;

        tracing::debug!("API base URL {}", base);
        Ok(Self { client, base })
    }

    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ConsoleError::Config(format!("invalid request path {path}: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, path: &str, options: RequestOptions) -> Result<Value> {
        let url = self.url_for(path)?;
        let method = options.method.clone();
        tracing::debug!("{} {}", method, url);

        let mut req = self
            .client
            .request(options.method, url.clone())
            .headers(merged_headers(&options.headers)?);
        if let Some(body) = &options.body {
            req = req.body(serde_json::to_vec(body)?);
        }

        let response = req
            .send()
            .await
            .map_err(|e| {
                ConsoleError::Network(format!("{method} {url} failed: {}", error_chain(&e)))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                ConsoleError::Network(format!("Reading response body: {}", error_chain(&e)))
            })?;

        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status.as_u16(), body.len());
        decode_response(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            &body,
        )
    }
}

/// `e` followed by its sources; reqwest keeps the OS-level cause (refused, DNS...) out of Display.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

/// JSON content type first, then caller headers; a caller header with the same name wins.
pub fn merged_headers(extra: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ConsoleError::Config(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ConsoleError::Config(format!("invalid header value for {name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Map a finished response onto the transport contract.
pub fn decode_response(status: u16, status_text: &str, body: &str) -> Result<Value> {
    if !(200..400).contains(&status) {
        return Err(ConsoleError::Transport {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A URL that will always refuse connections (port 1 is reserved and unbound)
    const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

    #[test]
    fn non_success_status_carries_status_line_and_body() {
        let err = decode_response(404, "Not Found", r#"{"detail":"Target not found"}"#)
            .unwrap_err();
        match err {
            ConsoleError::Transport {
                status,
                status_text,
                body,
            } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
                assert_eq!(body, r#"{"detail":"Target not found"}"#);
            }
            other => panic!("expected ConsoleError::Transport, got {other:?}"),
        }
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(decode_response(204, "No Content", "").unwrap(), Value::Null);
    }

    #[test]
    fn success_body_is_parsed() {
        let v = decode_response(200, "OK", r#"[{"id":1}]"#).unwrap();
        assert_eq!(v, json!([{"id": 1}]));
    }

    #[test]
    fn garbage_success_body_is_decode_error() {
        let err = decode_response(200, "OK", "<html>").unwrap_err();
        assert!(matches!(err, ConsoleError::Decode(_)), "{err:?}");
    }

    #[test]
    fn content_type_defaults_to_json() {
        let headers = merged_headers(&[]).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn caller_headers_are_merged_and_win() {
        let headers = merged_headers(&[
            ("X-Trace".to_string(), "abc".to_string()),
            ("content-type".to_string(), "application/merge-patch+json".to_string()),
        ])
        .unwrap();
        assert_eq!(headers["x-trace"], "abc");
        assert_eq!(headers[CONTENT_TYPE], "application/merge-patch+json");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn paths_join_onto_base_with_prefix() {
        let t = HttpTransport::new("http://monitor.local:8000/api", None).unwrap();
        assert_eq!(
            t.url_for("/targets/3/uptime?hours=48").unwrap().as_str(),
            "http://monitor.local:8000/api/targets/3/uptime?hours=48"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = HttpTransport::new("not a url", None).unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)), "{err:?}");
    }

    #[tokio::test]
    async fn connection_refused_returns_network_error() {
        let client = HttpTransport::new(UNREACHABLE_URL, None).unwrap();
        let err = client
            .request("/targets", RequestOptions::get())
            .await
            .unwrap_err();

        match &err {
            ConsoleError::Network(msg) => {
                assert!(
                    msg.starts_with("GET http://127.0.0.1:1/targets failed:"),
                    "{msg}"
                );
                // the OS-level cause, not just reqwest's "error sending request"
                let lower = msg.to_ascii_lowercase();
                assert!(
                    lower.contains("refused") || lower.contains("connect"),
                    "{msg}"
                );
            }
            other => panic!("expected ConsoleError::Network, got {other:?}"),
        }
    }

    #[test]
    fn error_chain_appends_sources() {
        #[derive(Debug)]
        struct Outer(std::io::Error);
        impl std::fmt::Display for Outer {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("error sending request")
            }
        }
        impl std::error::Error for Outer {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let e = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        ));
        assert_eq!(error_chain(&e), "error sending request: Connection refused");
    }

    #[tokio::test]
    async fn caller_headers_reach_the_server() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            sock.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n[]",
            )
            .await
            .unwrap();
            String::from_utf8_lossy(&buf).to_ascii_lowercase()
        });

        let client = HttpTransport::new(&format!("http://{addr}"), None).unwrap();
        let v = client
            .request("/targets", RequestOptions::get().header("X-Trace", "abc"))
            .await
            .unwrap();
        assert_eq!(v, json!([]));

        let head = server.await.unwrap();
        assert!(head.starts_with("get /targets http/1.1"), "{head}");
        assert!(head.contains("x-trace: abc"), "{head}");
        assert!(head.contains("content-type: application/json"), "{head}");
    }
}
