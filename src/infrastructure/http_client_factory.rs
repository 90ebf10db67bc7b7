use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the client shared by the scrape and push legs.
    ///
    /// No client-wide timeout and no retries: each leg sets its own
    /// per-request timeout and a failed leg just ends the cycle.
    pub fn create_client() -> Client {
        Client::builder()
            .pool_max_idle_per_host(2)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("prom2pushgateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
