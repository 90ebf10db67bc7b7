pub mod custom_metrics;
pub mod http;
pub mod http_client_factory;
pub mod observability;
