//! Access policy gate behavior over a real HTTP round trip

use crate::common::{ids, mount_catalog, mount_details, mount_robots, read_csv, test_config};
use gastrominer::miner::Coordinator;
use gastrominer::robots::{check_access, AccessVerdict};
use gastrominer::{GastroError, RunPhase};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn denying_service(robots_status: u16, robots_body: &str) -> MockServer {
    let server = MockServer::start().await;
    mount_robots(&server, robots_status, robots_body).await;
    Mock::given(method("POST"))
        .and(body_string_contains("level=\"1\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("level=\"2\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_disallow_stops_run_before_any_query() {
    let server = denying_service(200, "User-agent: *\nDisallow: /").await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut coordinator = Coordinator::new(test_config(&server, &csv_path, 4)).unwrap();
    let err = coordinator
        .run_until(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, GastroError::AccessDenied { .. }));
    assert_eq!(err.phase(), "policy");
    assert_eq!(coordinator.phase(), RunPhase::Aborted);
    // Header only
    assert_eq!(read_csv(&csv_path).len(), 1);
}

#[tokio::test]
async fn test_forbidden_policy_denies() {
    let server = denying_service(403, "").await;

    let dir = TempDir::new().unwrap();
    let mut coordinator =
        Coordinator::new(test_config(&server, &dir.path().join("out.csv"), 4)).unwrap();
    let err = coordinator
        .run_until(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, GastroError::AccessDenied { .. }));
}

#[tokio::test]
async fn test_unavailable_policy_proceeds() {
    let server = MockServer::start().await;
    mount_robots(&server, 503, "").await;
    mount_catalog(&server, &ids(5)).await;
    mount_details(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut coordinator = Coordinator::new(test_config(&server, &csv_path, 2)).unwrap();
    let summary = coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(summary.succeeded, 5);
    assert_eq!(read_csv(&csv_path).len(), 6);
}

#[tokio::test]
async fn test_crawl_delay_does_not_block_run() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nCrawl-delay: 30\nAllow: /").await;
    mount_catalog(&server, &ids(3)).await;
    mount_details(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let mut coordinator =
        Coordinator::new(test_config(&server, &dir.path().join("out.csv"), 2)).unwrap();
    let summary = coordinator.run_until(std::future::pending()).await.unwrap();
    assert_eq!(summary.succeeded, 3);
}

#[tokio::test]
async fn test_groups_match_on_product_token() {
    let client = reqwest::Client::new();
    let agent = "GastroMiner-Bot/2.2 (Educational Research)";
    let target = "http://www.bedca.net/bdpub/procquery.php";

    let ours = MockServer::start().await;
    mount_robots(&ours, 200, "User-agent: GastroMiner-Bot\nDisallow: /bdpub/").await;
    let check =
        check_access(&client, agent, target, &format!("{}/robots.txt", ours.uri())).await;
    assert_eq!(check.verdict, AccessVerdict::Denied);

    let theirs = MockServer::start().await;
    mount_robots(&theirs, 200, "User-agent: OtherBot\nDisallow: /").await;
    let check =
        check_access(&client, agent, target, &format!("{}/robots.txt", theirs.uri())).await;
    assert_eq!(check.verdict, AccessVerdict::Allowed);
}
