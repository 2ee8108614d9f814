use async_trait::async_trait;
use std::time::Duration;

/// Desktop browser User-Agent; some sites serve reduced markup to unknown clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Retrieves the raw HTML of a webpage.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url` and return its body as text.
    ///
    /// # Errors
    /// Returns a description of the cause on transport failure, timeout or a
    /// non-2xx status.
    async fn fetch(&self, url: &str) -> Result<String, String>;
}

/// reqwest-backed fetcher with a browser User-Agent and a bounded timeout
pub struct HttpPageFetcher {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            timeout,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, String> {
        let start_time = std::time::Instant::now();

        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                format!("request timed out after {}s", self.timeout.as_secs())
            } else {
                e.to_string()
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {} for {}", status.as_u16(), url));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                format!("request timed out after {}s", self.timeout.as_secs())
            } else {
                format!("Failed to read response body: {}", e)
            }
        })?;

        tracing::info!(
            url = %url,
            status = status.as_u16(),
            html_length = body.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "Page fetched"
        );

        Ok(body)
    }
}
