//! End-to-end extraction runs against a fake food service

use crate::common::{
    detail_body, fake_service, ids, max_arrivals_within, mount_catalog, mount_details,
    mount_robots, read_csv, test_config, TimedEcho, QUERY_PATH,
};
use gastrominer::miner::{Coordinator, FailureReason};
use gastrominer::record::Row;
use gastrominer::storage::{RecordSink, StorageError, StorageResult};
use gastrominer::{CatalogError, GastroError, RunPhase};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_run_writes_header_and_every_row() {
    let server = fake_service(30).await;
    mount_details(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let config = test_config(&server, &csv_path, 4);

    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(summary.total, 30);
    assert_eq!(summary.completed, 30);
    assert_eq!(summary.succeeded, 30);
    assert_eq!(summary.failed(), 0);
    assert!(!summary.interrupted);
    assert_eq!(summary.phase, RunPhase::Done);
    assert_eq!(coordinator.phase(), RunPhase::Done);

    let records = read_csv(&csv_path);
    assert_eq!(records[0], vec!["f_id", "f_ori_name", "calcio", "sodio"]);
    assert_eq!(records.len(), 31);

    // Completion order is arbitrary; each identifier appears exactly once
    let written: HashSet<String> = records[1..].iter().map(|r| r[0].clone()).collect();
    let expected: HashSet<String> = ids(30).into_iter().collect();
    assert_eq!(written, expected);

    let row_7 = records[1..].iter().find(|r| r[0] == "7").unwrap();
    assert_eq!(row_7, &vec!["7", "Alimento 7", "7.5", "NA"]);
}

#[tokio::test]
async fn test_one_failing_identifier_is_skipped() {
    let server = fake_service(100).await;
    // Mounted first so it takes precedence over the echoing responder
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_string_contains("<cond3>57</cond3>"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_details(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut coordinator = Coordinator::new(test_config(&server, &csv_path, 10)).unwrap();
    let summary = coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(summary.completed, 100);
    assert_eq!(summary.succeeded, 99);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].id, "57");
    assert_eq!(summary.failures[0].reason, FailureReason::HttpStatus(500));

    let records = read_csv(&csv_path);
    assert_eq!(records.len(), 100);
    assert!(records[1..].iter().all(|r| r[0] != "57"));
}

#[tokio::test]
async fn test_throttle_spaces_requests_of_a_single_worker() {
    let server = fake_service(3).await;
    mount_details(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server, &dir.path().join("out.csv"), 1);
    config.engine.throttle_ms = 100;

    let started = Instant::now();
    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(summary.succeeded, 3);
    assert!(
        started.elapsed() >= Duration::from_millis(300),
        "three throttled requests finished in {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_pool_never_exceeds_worker_count() {
    let server = fake_service(12).await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_string_contains("level=\"2\""))
        .respond_with(TimedEcho {
            delay: Duration::from_millis(100),
            arrivals: Arc::clone(&arrivals),
        })
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut coordinator = Coordinator::new(test_config(&server, &dir.path().join("out.csv"), 3))
        .unwrap();
    let summary = coordinator.run_until(std::future::pending()).await.unwrap();
    assert_eq!(summary.succeeded, 12);

    // A request occupies its worker for at least the 100ms response delay,
    // so any 90ms window can see at most one arrival per worker
    let arrivals = arrivals.lock().unwrap();
    assert_eq!(arrivals.len(), 12);
    let peak = max_arrivals_within(&arrivals, Duration::from_millis(90));
    assert!(peak <= 3, "{} requests in flight with 3 workers", peak);
    assert!(peak >= 2, "requests never overlapped");
}

#[tokio::test]
async fn test_malformed_detail_is_a_failure() {
    let server = fake_service(5).await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_string_contains("<cond3>3</cond3>"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<foodresponse><food>"))
        .mount(&server)
        .await;
    mount_details(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut coordinator = Coordinator::new(test_config(&server, &csv_path, 2)).unwrap();
    let summary = coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed(), 1);
    assert!(matches!(
        summary.failures[0].reason,
        FailureReason::Malformed(_)
    ));
}

#[tokio::test]
async fn test_every_detail_request_is_one_identifier() {
    let server = fake_service(12).await;
    mount_details(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut coordinator = Coordinator::new(test_config(&server, &csv_path, 3)).unwrap();
    coordinator.run_until(std::future::pending()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let detail_requests = requests
        .iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains("level=\"2\""))
        .count();
    assert_eq!(detail_requests, 12);
}

#[tokio::test]
async fn test_catalog_error_is_fatal() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nAllow: /").await;
    Mock::given(method("POST"))
        .and(body_string_contains("level=\"1\""))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("level=\"2\""))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_body("1")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut coordinator = Coordinator::new(test_config(&server, &csv_path, 2)).unwrap();
    let err = coordinator
        .run_until(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, GastroError::Catalog(CatalogError::Status(500))));
    assert_eq!(err.phase(), "catalog");
    assert_eq!(coordinator.phase(), RunPhase::Aborted);
}

#[tokio::test]
async fn test_empty_catalog_leaves_header_only() {
    let server = MockServer::start().await;
    mount_robots(&server, 404, "").await;
    mount_catalog(&server, &[]).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut coordinator = Coordinator::new(test_config(&server, &csv_path, 2)).unwrap();
    let err = coordinator
        .run_until(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, GastroError::Catalog(CatalogError::Empty)));
    assert_eq!(read_csv(&csv_path).len(), 1);
}

#[tokio::test]
async fn test_interrupt_keeps_written_rows_and_drops_in_flight() {
    let server = fake_service(40).await;
    mount_details(&server, Duration::from_millis(100)).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut coordinator = Coordinator::new(test_config(&server, &csv_path, 2)).unwrap();
    let summary = coordinator
        .run_until(tokio::time::sleep(Duration::from_millis(450)))
        .await
        .unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.phase, RunPhase::Aborted);
    assert!(summary.completed > 0);
    assert!(summary.completed < 40);
    assert_eq!(read_csv(&csv_path).len(), summary.succeeded + 1);

    // Abandoned tasks never reach the file
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(read_csv(&csv_path).len(), summary.succeeded + 1);
}

struct BrokenSink {
    attempts: AtomicU64,
}

impl RecordSink for BrokenSink {
    fn append(&self, row: &Row) -> StorageResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::RowWidth {
            expected: row.len() + 1,
            got: row.len(),
        })
    }

    fn rows_written(&self) -> u64 {
        0
    }
}

#[tokio::test]
async fn test_storage_failure_aborts_run() {
    let server = fake_service(20).await;
    mount_details(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("unused.csv"), 4);
    let sink = Arc::new(BrokenSink {
        attempts: AtomicU64::new(0),
    });

    let mut coordinator = Coordinator::with_sink(config, sink.clone()).unwrap();
    let err = coordinator
        .run_until(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, GastroError::Storage(_)));
    assert_eq!(err.phase(), "storage");
    assert_eq!(coordinator.phase(), RunPhase::Aborted);
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unwritable_output_fails_before_any_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("missing").join("out.csv");

    let result = Coordinator::new(test_config(&server, &csv_path, 2));
    assert!(matches!(result, Err(GastroError::Storage(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}
