// Scrape-push cycle and its scheduler
pub mod forwarder;

// Readiness tracking
pub mod monitoring;

// Process orchestrator
pub mod system;
