//! Integration tests for scraping a cluster served by wiremock

use chrono::NaiveDate;
use core::time::Duration;
use oneday_exporter_lib::Host;
use oneday_exporter_lib::client::{ClientOptions, EsClient};
use oneday_exporter_lib::collectors::{Collector, Exporter, INDICES, ScrapeDay};
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test host that captures output to in-memory buffers.
#[derive(Default)]
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

fn stats(entries: &[(&str, u64)]) -> serde_json::Value {
    let indices: serde_json::Map<_, _> = entries
        .iter()
        .map(|(index, size)| {
            (
                (*index).to_string(),
                json!({
                    "primaries": {"store": {"size_in_bytes": size}, "indexing": {"index_total": 7}},
                    "total": {"store": {"size_in_bytes": size * 2}}
                }),
            )
        })
        .collect();

    json!({"_shards": {"total": 2}, "indices": indices})
}

fn metric_line<'a>(text: &'a str, name: &str, label: &str) -> Option<&'a str> {
    text.lines()
        .find(|line| line.starts_with(&format!("oneday_elasticsearch_{name}{{")) && line.contains(label))
}

async fn mount_cluster(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cluster_name": "logs", "version": {"number": "7.10.2"}})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/*-2021.12.02/_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats(&[("app-2021.12.02", 1500), ("app-2021.12.01", 1000)])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/*-2021.12.02/_mapping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "app-2021.12.02": {"mappings": {"properties": {
                "message": {"type": "text", "fields": {"raw": {"type": "keyword"}}},
                "level": {"type": "keyword"}
            }}}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/*-2021.12.02/_settings"))
        .and(query_param("include_defaults", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "app-2021.12.02": {
                "settings": {"index": {"number_of_shards": "1"}},
                "defaults": {"index": {"mapping": {"total_fields": {"limit": "1000"}}}}
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/_cluster/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "persistent": {"cluster": {"max_shards_per_node": "3000"}},
            "transient": {"cluster": {"routing": {"allocation": {"exclude": {"_ip": "10.0.0.1"}}}}}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/_cluster/health/*-2021.12.02"))
        .and(query_param("level", "indices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cluster_name": "logs",
            "status": "green",
            "indices": {"app-2021.12.02": {"status": "green", "number_of_shards": 1, "number_of_replicas": 1}}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_scrape_command_against_cluster() {
    let server = MockServer::start().await;
    mount_cluster(&server).await;

    let mut host = TestHost::default();
    let uri = server.uri();
    let result = oneday_exporter_lib::run(
        &mut host,
        [
            "oneday-exporter",
            "scrape",
            "--elasticsearch-url",
            uri.as_str(),
            "--project",
            "acme",
            "--date",
            "2021-12-02",
            "--log-level",
            "none",
        ],
    )
    .await;

    assert!(result.is_ok(), "scrape failed: {result:?}");
    assert_eq!(host.exit_code, None);

    let text = host.output_str();

    let primary = metric_line(&text, "indices_store_size_bytes_primary", "index=\"app-2021.12.02\"").unwrap();
    assert!(primary.contains("cluster=\"logs\""));
    assert!(primary.contains("project=\"acme\""));
    assert!(primary.ends_with(" 1500"));
    assert!(metric_line(&text, "indices_store_size_bytes_primary", "index=\"app-2021.12.01\"").is_none());

    assert!(metric_line(&text, "indices_group_store_size_bytes", "index_group=\"app\"").unwrap().ends_with(" 0"));
    assert!(metric_line(&text, "fields_count_total", "index=\"app-2021.12.02\"").unwrap().ends_with(" 3"));
    assert!(metric_line(&text, "fields_limit_total", "index=\"app-2021.12.02\"").unwrap().ends_with(" 1000"));
    assert!(metric_line(&text, "exclude_exists", "scope=\"transient\"").unwrap().ends_with(" 1"));
    assert!(metric_line(&text, "exclude_exists", "scope=\"persistent\"").unwrap().ends_with(" 0"));
    assert!(text.lines().any(|line| line.starts_with("oneday_elasticsearch_cluster_max_shards_per_node{") && line.ends_with(" 3000")));
    assert!(metric_line(&text, "indices_health_status", "color=\"green\"").unwrap().ends_with(" 1"));
    assert!(metric_line(&text, "collector_success", "collector=\"health\"").unwrap().ends_with(" 1"));

    // snapshots need a repository and cat-indices is off by default
    assert!(!text.contains("snapshots_count_total"));
    assert!(!text.contains("cat_indices"));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_scrape_command_with_optional_collectors() {
    let server = MockServer::start().await;
    mount_cluster(&server).await;

    Mock::given(method("GET"))
        .and(path("/_snapshot/backups/*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"snapshots": [{"snapshot": "a"}, {"snapshot": "b"}]})))
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("oneday-exporter.toml");
    std::fs::write(
        &config_path,
        "cluster_name = \"override\"\nsnapshot_repository = \"backups\"\n\n[collectors]\nfields = false\n",
    )
    .expect("Failed to write test config");

    let mut host = TestHost::default();
    let uri = server.uri();
    let config = config_path.to_string_lossy().into_owned();
    let result = oneday_exporter_lib::run(
        &mut host,
        [
            "oneday-exporter",
            "scrape",
            "-c",
            config.as_str(),
            "--elasticsearch-url",
            uri.as_str(),
            "--date",
            "2021-12-02",
            "--log-level",
            "none",
        ],
    )
    .await;

    assert!(result.is_ok(), "scrape failed: {result:?}");

    let text = host.output_str();
    let snapshots = metric_line(&text, "snapshots_count_total", "repository=\"backups\"").unwrap();
    assert!(snapshots.contains("cluster=\"override\""));
    assert!(snapshots.ends_with(" 2"));
    assert!(!text.contains("fields_count_total"));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_scrape_command_fails_when_every_collector_fails() {
    let server = MockServer::start().await;

    let mut host = TestHost::default();
    let uri = server.uri();
    let result = oneday_exporter_lib::run(
        &mut host,
        [
            "oneday-exporter",
            "scrape",
            "--elasticsearch-url",
            uri.as_str(),
            "--cluster-name",
            "logs",
            "--log-level",
            "none",
        ],
    )
    .await;

    assert!(result.is_err());
    assert_eq!(host.exit_code, Some(1));
    assert!(metric_line(&host.output_str(), "collector_success", "collector=\"indices\"").unwrap().ends_with(" 0"));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_unresolvable_cluster_name_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let mut host = TestHost::default();
    let uri = server.uri();
    let result = oneday_exporter_lib::run(
        &mut host,
        ["oneday-exporter", "scrape", "--elasticsearch-url", uri.as_str(), "--log-level", "none"],
    )
    .await;

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("401"), "unexpected error: {message}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_group_growth_between_scrapes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/*-2021.12.02/_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats(&[("app-2021.12.02", 1000)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/*-2021.12.02/_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats(&[("app-2021.12.01", 9000), ("app-2021.12.02", 1500)])))
        .mount(&server)
        .await;

    let client = EsClient::new(&ClientOptions {
        base_url: Url::parse(&server.uri()).unwrap(),
        timeout: Duration::from_secs(5),
        insecure_skip_verify: false,
        ca_certificate: None,
        username: None,
        password: None,
    })
    .unwrap();

    let mut exporter = Exporter::new(client, HashMap::new());
    exporter.register(Collector::new(&INDICES));

    let day = ScrapeDay::new(NaiveDate::from_ymd_opt(2021, 12, 2).unwrap());
    let first = exporter.scrape(&day).await;
    let second = exporter.scrape(&day).await;

    let growth = |scrape: &oneday_exporter_lib::collectors::Scrape| {
        scrape
            .observations
            .iter()
            .find(|o| o.name() == "indices_group_store_size_bytes" && o.label("index_group") == Some("app"))
            .map(|o| o.value)
    };

    assert_eq!(growth(&first), Some(0.0));
    assert_eq!(growth(&second), Some(500.0));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_basic_auth_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(wiremock::matchers::basic_auth("exporter", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cluster_name": "secured"})))
        .mount(&server)
        .await;

    let client = EsClient::new(&ClientOptions {
        base_url: Url::parse(&server.uri()).unwrap(),
        timeout: Duration::from_secs(5),
        insecure_skip_verify: false,
        ca_certificate: None,
        username: Some("exporter".into()),
        password: Some("secret".into()),
    })
    .unwrap();

    assert_eq!(client.cluster_name().await.unwrap(), "secured");
}
