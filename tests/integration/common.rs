//! Shared fixtures: a fake food service and test configurations

use gastrominer::config::Config;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const QUERY_PATH: &str = "/bdpub/procquery.php";

/// Builds a config pointed at `server`, writing to `csv_path`
pub fn test_config(server: &MockServer, csv_path: &Path, workers: u32) -> Config {
    let mut config = Config::default();
    config.endpoint.url = format!("{}{}", server.uri(), QUERY_PATH);
    config.endpoint.robots_url = format!("{}/robots.txt", server.uri());
    config.engine.workers = workers;
    config.engine.throttle_ms = 1;
    config.engine.timeout_secs = 5;
    config.output.csv_path = csv_path.display().to_string();
    config.schema.primary_fields = vec!["f_id".to_string(), "f_ori_name".to_string()];
    config.schema.detail_fields = vec!["calcio".to_string(), "sodio".to_string()];
    config
}

pub fn catalog_body(ids: &[String]) -> String {
    let foods: String = ids
        .iter()
        .map(|id| format!("<food><f_id>{}</f_id></food>", id))
        .collect();
    format!("<?xml version=\"1.0\" encoding=\"utf-8\"?><foodresponse>{}</foodresponse>", foods)
}

pub fn detail_body(id: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><foodresponse><food>\
         <f_id>{id}</f_id><f_ori_name>Alimento {id}</f_ori_name>\
         <foodvalue><c_ori_name>calcio</c_ori_name><best_location>{id}.5</best_location></foodvalue>\
         </food></foodresponse>"
    )
}

pub fn ids(count: usize) -> Vec<String> {
    (1..=count).map(|i| i.to_string()).collect()
}

/// Answers every detail query with a record for the queried identifier
pub struct EchoDetail {
    pub delay: Duration,
}

impl Respond for EchoDetail {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = String::from_utf8_lossy(&request.body);
        let id = body
            .split("<cond3>")
            .nth(1)
            .and_then(|rest| rest.split("</cond3>").next())
            .unwrap_or("?");
        ResponseTemplate::new(200)
            .set_body_string(detail_body(id))
            .set_delay(self.delay)
    }
}

/// Like [`EchoDetail`], and records when each detail request arrived
pub struct TimedEcho {
    pub delay: Duration,
    pub arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for TimedEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        EchoDetail { delay: self.delay }.respond(request)
    }
}

/// Largest number of arrivals falling inside any `window`
pub fn max_arrivals_within(arrivals: &[Instant], window: Duration) -> usize {
    let mut sorted = arrivals.to_vec();
    sorted.sort();
    (0..sorted.len())
        .map(|i| {
            sorted[i..]
                .iter()
                .take_while(|t| t.duration_since(sorted[i]) < window)
                .count()
        })
        .max()
        .unwrap_or(0)
}

pub async fn mount_robots(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_catalog(server: &MockServer, ids: &[String]) {
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_string_contains("level=\"1\""))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_body(ids)))
        .mount(server)
        .await;
}

pub async fn mount_details(server: &MockServer, delay: Duration) {
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_string_contains("level=\"2\""))
        .respond_with(EchoDetail { delay })
        .mount(server)
        .await;
}

/// A permissive robots.txt, a catalog of `count` ids, and echoing details
pub async fn fake_service(count: usize) -> MockServer {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nAllow: /").await;
    mount_catalog(&server, &ids(count)).await;
    server
}

/// Every record in the CSV file, header included
pub fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(String::from).collect())
        .collect()
}
