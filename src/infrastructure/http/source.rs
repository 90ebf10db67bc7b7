use crate::domain::errors::ScrapeError;
use crate::domain::ports::MetricsSource;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Plain GET against a metrics endpoint.
pub struct HttpMetricsSource {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpMetricsSource {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    async fn scrape(&self) -> Result<Vec<u8>, ScrapeError> {
        let request = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .build()
            .map_err(|e| ScrapeError::BuildRequest {
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ScrapeError::Transport {
                reason: e.to_string(),
            })?;

        // Status is not inspected: an error page is forwarded like any body.
        let status = response.status();
        let body = response.bytes().await.map_err(|e| ScrapeError::ReadBody {
            reason: e.to_string(),
        })?;

        debug!(url = %self.url, %status, bytes = body.len(), "scraped source");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_scrape_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("foo 1\n"))
            .mount(&mock_server)
            .await;

        let source = HttpMetricsSource::new(
            Client::new(),
            format!("{}/metrics", mock_server.uri()),
            Duration::from_secs(2),
        );

        assert_eq!(source.scrape().await.unwrap(), b"foo 1\n");
    }

    #[tokio::test]
    async fn test_scrape_ignores_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let source = HttpMetricsSource::new(Client::new(), mock_server.uri(), Duration::from_secs(2));

        assert_eq!(source.scrape().await.unwrap(), b"boom");
    }

    #[tokio::test]
    async fn test_scrape_invalid_url_is_build_error() {
        let source = HttpMetricsSource::new(Client::new(), "not a url", Duration::from_secs(1));
        let err = source.scrape().await.unwrap_err();
        assert!(matches!(err, ScrapeError::BuildRequest { .. }));
    }

    #[tokio::test]
    async fn test_scrape_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let source = HttpMetricsSource::new(Client::new(), mock_server.uri(), Duration::from_millis(50));
        let err = source.scrape().await.unwrap_err();
        assert!(matches!(err, ScrapeError::Transport { .. }));
    }
}
