use prom2pushgateway::application::system::Application;
use prom2pushgateway::config::{Config, EnvLookup};
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn free_local_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}

fn config_for(pairs: &[(&str, String)]) -> Config {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Config::from_lookup(&EnvLookup::from_map(&env))
}

async fn wait_for_health(url: &str, expected: u16) {
    for _ in 0..50 {
        if let Ok(response) = reqwest::get(url).await {
            if response.status().as_u16() == expected {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{} never returned {}", url, expected);
}

#[tokio::test]
async fn test_repeated_scrape_failures_keep_looping() {
    let health_addr = free_local_addr();
    let app = Application::build(config_for(&[
        ("SOURCE_URL", "http://127.0.0.1:9/metrics".to_string()),
        ("PUSHGATEWAY_URL", "http://127.0.0.1:9/metrics/job/x".to_string()),
        ("CUSTOM_METRICS_FILE", "/nonexistent/custom-metrics.txt".to_string()),
        ("INTERVAL", "1".to_string()),
        ("HEALTH_ADDR", health_addr.clone()),
    ]))
    .unwrap();
    let health = app.health.clone();

    let token = CancellationToken::new();
    let run = tokio::spawn(app.run(token.clone()));

    let url = format!("http://{}/healthz", health_addr);
    wait_for_health(&url, 503).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    wait_for_health(&url, 503).await;
    assert!(!health.is_ready());

    token.cancel();
    let cycles = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("shutdown within grace window")
        .unwrap();
    assert!(cycles >= 2, "loop continued after failures, ran {}", cycles);
}

#[tokio::test]
async fn test_cancel_during_wait_exits_without_new_cycle() {
    let source = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("foo 1\n"))
        .mount(&source)
        .await;
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&gateway)
        .await;

    let health_addr = free_local_addr();
    let app = Application::build(config_for(&[
        ("SOURCE_URL", source.uri()),
        ("PUSHGATEWAY_URL", gateway.uri()),
        ("CUSTOM_METRICS_FILE", "/nonexistent/custom-metrics.txt".to_string()),
        ("INTERVAL", "60".to_string()),
        ("HEALTH_ADDR", health_addr.clone()),
    ]))
    .unwrap();

    let token = CancellationToken::new();
    let run = tokio::spawn(app.run(token.clone()));

    wait_for_health(&format!("http://{}/healthz", health_addr), 200).await;

    token.cancel();
    let cycles = tokio::time::timeout(Duration::from_secs(4), run)
        .await
        .expect("shutdown within grace window")
        .unwrap();

    assert_eq!(cycles, 1);
    assert_eq!(gateway.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_before_start_runs_nothing() {
    let gateway = MockServer::start().await;
    let app = Application::build(config_for(&[
        ("SOURCE_URL", "http://127.0.0.1:9/metrics".to_string()),
        ("PUSHGATEWAY_URL", gateway.uri()),
        ("HEALTH_ADDR", free_local_addr()),
    ]))
    .unwrap();

    let token = CancellationToken::new();
    token.cancel();

    assert_eq!(app.run(token).await, 0);
    assert!(gateway.received_requests().await.unwrap().is_empty());
}
