use std::time::{Duration, Instant};

use reqwest::StatusCode;
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct PageClientConfig {
    pub user_agent: String,
    pub default_timeout: Duration,
}

impl PageClientConfig {
    pub fn from_env() -> Self {
        let user_agent = std::env::var("USER_AGENT").unwrap_or_else(|_| {
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
        });

        let default_timeout = std::env::var("REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        Self {
            user_agent,
            default_timeout,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {timeout:?}: {url}")]
    Timeout { url: String, timeout: Duration },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: StatusCode },
}

/// Thin HTTP GET client for wiki pages.
///
/// One outbound call per fetch with a bounded timeout. Failures are not
/// retried here; a re-issued request is the retry mechanism.
#[derive(Clone)]
pub struct PageClient {
    config: PageClientConfig,
    http: reqwest::Client,
}

impl PageClient {
    pub fn new(config: PageClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { config, http })
    }

    /// GET the given URL and return the response body as text.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let timeout = self.config.default_timeout;
        debug!(url, timeout_ms = timeout.as_millis() as u64, "GET");
        let started = Instant::now();

        let resp = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().await.map_err(|e| self.map_error(url, e))?;

        info!(
            url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "GET complete"
        );
        Ok(body)
    }

    fn map_error(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.config.default_timeout,
            }
        } else {
            FetchError::Request(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn client_with_timeout(ms: u64) -> PageClient {
        PageClient::new(PageClientConfig {
            user_agent: "uma-common/test".to_string(),
            default_timeout: Duration::from_millis(ms),
        })
        .expect("client builds")
    }

    /// Accept one connection, read the request, write `response` verbatim.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn get_text_returns_body_on_success() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 5\r\nconnection: close\r\n\r\nhello",
        );
        let body = client_with_timeout(2_000)
            .get_text(&url)
            .await
            .expect("success");
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        );
        let err = client_with_timeout(2_000)
            .get_text(&url)
            .await
            .expect_err("404 should fail");
        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        // Accept the connection but never respond.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let handle = std::thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                std::thread::sleep(Duration::from_millis(1_000));
                drop(stream);
            }
        });

        let err = client_with_timeout(200)
            .get_text(&format!("http://{addr}/"))
            .await
            .expect_err("should time out");
        assert!(matches!(err, FetchError::Timeout { .. }), "got {err:?}");
        let _ = handle.join();
    }
}
