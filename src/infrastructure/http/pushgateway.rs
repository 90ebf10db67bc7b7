use crate::domain::errors::PushError;
use crate::domain::payload::PushRequest;
use crate::domain::ports::MetricsSink;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// POSTs text exposition payloads to a Pushgateway-compatible endpoint.
pub struct PushgatewaySink {
    client: Client,
    url: String,
    timeout: Duration,
}

impl PushgatewaySink {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MetricsSink for PushgatewaySink {
    async fn push(&self, request: PushRequest) -> Result<(), PushError> {
        let mut builder = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "text/plain")
            .body(request.body);
        if let Some(auth) = &request.auth {
            builder = builder.header(AUTHORIZATION, auth.header_value());
        }
        let http_request = builder.build().map_err(|e| PushError::BuildRequest {
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| PushError::Transport {
                reason: e.to_string(),
            })?;

        // Drain and discard; the status code does not decide success.
        let status = response.status();
        let drained = response.bytes().await.map(|b| b.len()).unwrap_or(0);
        debug!(url = %self.url, %status, drained, "push response received");
        Ok(())
    }

    fn target(&self) -> &str {
        &self.url
    }
}
