// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end scrape scenarios against an in-memory device.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;

use connectbox_exporter::api::metrics::{FamilyExporter, MetricExporter};
use connectbox_exporter::api::router;
use connectbox_exporter::device::{DeviceClient, DeviceSession, DocumentId};
use connectbox_exporter::error::ConnectivityError;
use connectbox_exporter::extractors::resolve_all;
use connectbox_exporter::metrics::SampleValue;
use connectbox_exporter::scrape::ConnectBoxCollector;

const SOURCE: &str = "192.168.0.1";

/// What the fake device answers for one document.
#[derive(Clone)]
enum Reply {
    Document(&'static [u8]),
    Unreachable,
}

#[derive(Default)]
struct Log {
    logins: usize,
    fetched: Vec<DocumentId>,
    logouts: usize,
}

struct FakeModem {
    login_ok: bool,
    logout_ok: bool,
    fetch_delay: Duration,
    replies: HashMap<DocumentId, Reply>,
    log: Arc<Mutex<Log>>,
}

struct FakeSession {
    logout_ok: bool,
    fetch_delay: Duration,
    replies: HashMap<DocumentId, Reply>,
    log: Arc<Mutex<Log>>,
}

#[async_trait]
impl DeviceClient for FakeModem {
    type Session = FakeSession;

    async fn open(&self) -> Result<FakeSession, ConnectivityError> {
        self.log.lock().unwrap().logins += 1;
        if !self.login_ok {
            return Err(ConnectivityError::AccessDenied);
        }
        Ok(FakeSession {
            logout_ok: self.logout_ok,
            fetch_delay: self.fetch_delay,
            replies: self.replies.clone(),
            log: self.log.clone(),
        })
    }
}

#[async_trait]
impl DeviceSession for FakeSession {
    async fn fetch(&mut self, function: DocumentId) -> Result<Vec<u8>, ConnectivityError> {
        tokio::time::sleep(self.fetch_delay).await;
        self.log.lock().unwrap().fetched.push(function);
        match self.replies.get(&function) {
            Some(Reply::Document(body)) => Ok(body.to_vec()),
            Some(Reply::Unreachable) | None => Err(ConnectivityError::Timeout {
                url: "http://192.168.0.1/xml/getter.xml".to_string(),
            }),
        }
    }

    async fn close(&mut self) -> Result<(), ConnectivityError> {
        self.log.lock().unwrap().logouts += 1;
        if self.logout_ok {
            Ok(())
        } else {
            Err(ConnectivityError::UnexpectedStatus {
                url: "http://192.168.0.1/xml/setter.xml".to_string(),
                status: 500,
            })
        }
    }
}

fn healthy_replies() -> HashMap<DocumentId, Reply> {
    HashMap::from([
        (
            DocumentId::GLOBALSETTINGS,
            Reply::Document(include_bytes!("fixtures/global_settings.xml")),
        ),
        (
            DocumentId::CM_SYSTEM_INFO,
            Reply::Document(include_bytes!("fixtures/cm_system_info.xml")),
        ),
        (
            DocumentId::CMSTATUS,
            Reply::Document(include_bytes!("fixtures/cm_status.xml")),
        ),
        (
            DocumentId::DOWNSTREAM_TABLE,
            Reply::Document(include_bytes!("fixtures/downstream_table.xml")),
        ),
        (
            DocumentId::SIGNAL_TABLE,
            Reply::Document(include_bytes!("fixtures/signal_table.xml")),
        ),
        (
            DocumentId::UPSTREAM_TABLE,
            Reply::Document(include_bytes!("fixtures/upstream_table.xml")),
        ),
        (
            DocumentId::LANUSERTABLE,
            Reply::Document(include_bytes!("fixtures/lan_user_table.xml")),
        ),
        (
            DocumentId::CMSTATE,
            Reply::Document(include_bytes!("fixtures/cm_state.xml")),
        ),
    ])
}

fn collector(
    extractors: &[&str],
    login_ok: bool,
    replies: HashMap<DocumentId, Reply>,
) -> (ConnectBoxCollector<FakeModem>, Arc<Mutex<Log>>) {
    let log = Arc::new(Mutex::new(Log::default()));
    let modem = FakeModem {
        login_ok,
        logout_ok: true,
        fetch_delay: Duration::ZERO,
        replies,
        log: log.clone(),
    };
    let extractors = resolve_all(extractors).expect("known extractors");
    (ConnectBoxCollector::new(modem, extractors, SOURCE), log)
}

#[tokio::test]
async fn test_full_scrape() {
    let (collector, log) = collector(
        &["device_status", "downstream", "lan_users", "temperature", "upstream"],
        true,
        healthy_replies(),
    );
    let scrape = collector.scrape().await;

    for (name, ok) in scrape.outcome.successes() {
        assert!(*ok, "{name} should have succeeded");
    }
    assert_eq!(scrape.outcome.durations().len(), 5);
    // 3 + 7 + 2 + 2 + 4 domain families in extractor order
    assert_eq!(scrape.families.len(), 18);
    assert_eq!(scrape.families[0].name, "connectbox_device");

    let log = log.lock().unwrap();
    assert_eq!(log.logins, 1);
    assert_eq!(log.logouts, 1);
    assert_eq!(
        log.fetched,
        vec![
            DocumentId::GLOBALSETTINGS,
            DocumentId::CM_SYSTEM_INFO,
            DocumentId::CMSTATUS,
            DocumentId::DOWNSTREAM_TABLE,
            DocumentId::SIGNAL_TABLE,
            DocumentId::LANUSERTABLE,
            DocumentId::CMSTATE,
            DocumentId::UPSTREAM_TABLE,
        ]
    );
}

#[tokio::test]
async fn test_schema_failure_only_skips_that_extractor() {
    let mut replies = healthy_replies();
    replies.insert(
        DocumentId::CMSTATE,
        Reply::Document(b"<cmstate><TunnerTemperature>100</TunnerTemperature>"),
    );
    let (collector, log) = collector(&["temperature", "upstream"], true, replies);
    let scrape = collector.scrape().await;

    assert_eq!(scrape.outcome.success("temperature"), Some(false));
    assert_eq!(scrape.outcome.success("upstream"), Some(true));
    assert_eq!(scrape.outcome.success("login_logout"), Some(true));

    let completed: Vec<_> = scrape
        .outcome
        .durations()
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(completed, vec!["upstream"]);

    assert!(scrape
        .families
        .iter()
        .all(|f| f.name.starts_with("connectbox_upstream_")));
    assert_eq!(log.lock().unwrap().logouts, 1);
}

#[tokio::test]
async fn test_login_failure() {
    let (collector, log) = collector(&["temperature", "upstream"], false, healthy_replies());
    let scrape = collector.scrape().await;

    assert!(scrape.families.is_empty());
    assert!(scrape.outcome.durations().is_empty());
    assert_eq!(
        scrape.outcome.successes(),
        &[
            ("temperature".to_string(), false),
            ("upstream".to_string(), false),
            ("login_logout".to_string(), false),
        ]
    );

    let log = log.lock().unwrap();
    assert!(log.fetched.is_empty());
    assert_eq!(log.logouts, 0);
}

#[tokio::test]
async fn test_connectivity_failure_aborts_remaining_extractors() {
    let mut replies = healthy_replies();
    replies.insert(DocumentId::CMSTATE, Reply::Unreachable);
    let (collector, log) = collector(&["downstream", "temperature", "upstream"], true, replies);
    let scrape = collector.scrape().await;

    assert_eq!(scrape.outcome.success("downstream"), Some(true));
    assert_eq!(scrape.outcome.success("temperature"), Some(false));
    assert_eq!(scrape.outcome.success("upstream"), Some(false));
    // logout still succeeded
    assert_eq!(scrape.outcome.success("login_logout"), Some(true));

    let log = log.lock().unwrap();
    assert!(!log.fetched.contains(&DocumentId::UPSTREAM_TABLE));
    assert_eq!(log.logouts, 1);
}

#[tokio::test]
async fn test_logout_failure_keeps_extractor_results() {
    let log = Arc::new(Mutex::new(Log::default()));
    let modem = FakeModem {
        login_ok: true,
        logout_ok: false,
        fetch_delay: Duration::ZERO,
        replies: healthy_replies(),
        log: log.clone(),
    };
    let collector = ConnectBoxCollector::new(modem, resolve_all(&["temperature"]).unwrap(), SOURCE);
    let scrape = collector.scrape().await;

    assert_eq!(scrape.outcome.success("temperature"), Some(true));
    assert_eq!(scrape.outcome.success("login_logout"), Some(false));
    assert_eq!(log.lock().unwrap().logouts, 1);
}

#[tokio::test]
async fn test_collect_reports_bookkeeping() {
    let mut replies = healthy_replies();
    replies.insert(DocumentId::UPSTREAM_TABLE, Reply::Document(b"not xml"));
    let (collector, _) = collector(&["temperature", "upstream"], true, replies);
    let families = collector.collect().await;

    let up = families
        .iter()
        .find(|f| f.name == "connectbox_up")
        .expect("connectbox_up family");
    let values: Vec<_> = up
        .samples
        .iter()
        .map(|s| (s.label_values[0].as_str(), s.value.clone()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("temperature", SampleValue::Number(1.0)),
            ("upstream", SampleValue::Number(0.0)),
            ("login_logout", SampleValue::Number(1.0)),
        ]
    );

    let text = FamilyExporter::new(&families).export_metrics();
    assert!(text.contains("connectbox_up{extractor=\"upstream\",source=\"192.168.0.1\"} 0\n"));
    assert!(text.contains("connectbox_temperature_celsius{source=\"192.168.0.1\"} 0\n"));
    assert!(text.contains("# TYPE connectbox_scrape_duration_seconds gauge\n"));
}

#[tokio::test]
async fn test_scrapes_are_independent() {
    let (collector, log) = collector(&["temperature"], true, healthy_replies());
    let collector = Arc::new(collector);

    let (first, second) = tokio::join!(collector.scrape(), collector.scrape());
    assert_eq!(first.outcome.successes(), second.outcome.successes());
    assert_eq!(first.families, second.families);

    let log = log.lock().unwrap();
    assert_eq!(log.logins, 2);
    assert_eq!(log.logouts, 2);
}

#[tokio::test]
async fn test_client_disconnect_still_logs_out() {
    let log = Arc::new(Mutex::new(Log::default()));
    let modem = FakeModem {
        login_ok: true,
        logout_ok: true,
        fetch_delay: Duration::from_millis(300),
        replies: healthy_replies(),
        log: log.clone(),
    };
    let collector = ConnectBoxCollector::new(
        modem,
        resolve_all(&["device_status"]).unwrap(),
        SOURCE,
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(collector));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // gives up long before the three slow fetches are done
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let result = client.get(format!("http://{addr}/metrics")).send().await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let log = log.lock().unwrap();
    assert_eq!(log.logins, 1);
    assert_eq!(log.fetched.len(), 3);
    assert_eq!(log.logouts, 1);
}
