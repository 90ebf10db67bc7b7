use crate::domain::errors::{CustomMetricsError, PushError, ScrapeError};
use crate::domain::payload::PushRequest;
use async_trait::async_trait;

/// Where scraped metrics come from.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Full response body of one scrape, status code ignored.
    async fn scrape(&self) -> Result<Vec<u8>, ScrapeError>;
}

/// Where the combined payload goes.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Deliver one payload. Any completed round trip counts as delivered.
    async fn push(&self, request: PushRequest) -> Result<(), PushError>;

    /// Target description for logs.
    fn target(&self) -> &str;
}

/// Supplies the fragment appended to every push.
#[async_trait]
pub trait CustomMetricsProvider: Send + Sync {
    /// Newline-terminated lines, or empty when there is nothing to add.
    async fn fragment(&self) -> Result<Vec<u8>, CustomMetricsError>;

    fn describe(&self) -> String;
}
