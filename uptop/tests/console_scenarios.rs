//! End-to-end console flows against an in-memory monitoring API.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use uptop::api::MonitorApi;
use uptop::console::{MSG_EMPTY, MSG_SELECT_FIRST};
use uptop::detail::{PICK_ACTION_PROMPT, TITLE_PLACEHOLDER};
use uptop::form::{TargetForm, MSG_TCP_PORT};
use uptop::registry::{ActionKind, RowAction};
use uptop::status::StatusKind;
use uptop::transport::{RequestOptions, Transport};
use uptop::{Confirm, Console, ConsoleError, Result};

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: String,
    path: String,
    body: Option<Value>,
}

#[derive(Default)]
struct FakeApi {
    targets: Mutex<Vec<Value>>,
    next_id: Mutex<i64>,
    log: Mutex<Vec<Recorded>>,
    fail_deletes: bool,
}

impl FakeApi {
    fn seeded(n: i64) -> Self {
        let targets = (1..=n)
            .map(|id| {
                json!({"id": id, "name": format!("t{id}"), "type": "http",
                       "target": format!("https://t{id}.example"), "port": null, "enabled": true})
            })
            .collect();
        Self {
            targets: Mutex::new(targets),
            next_id: Mutex::new(n + 1),
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    fn ids(&self) -> Vec<i64> {
        self.targets
            .lock()
            .unwrap()
            .iter()
            .filter_map(|t| t["id"].as_i64())
            .collect()
    }
}

fn not_found() -> ConsoleError {
    ConsoleError::Transport {
        status: 404,
        status_text: "Not Found".into(),
        body: r#"{"detail":"Target not found"}"#.into(),
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn request(&self, path: &str, options: RequestOptions) -> Result<Value> {
        let method = options.method.as_str().to_string();
        self.log.lock().unwrap().push(Recorded {
            method: method.clone(),
            path: path.to_string(),
            body: options.body.clone(),
        });

        let (route, query) = path.split_once('?').unwrap_or((path, ""));
        let segs: Vec<&str> = route.trim_start_matches('/').split('/').collect();
        match (method.as_str(), segs.as_slice()) {
            ("GET", ["targets"]) => Ok(Value::Array(self.targets.lock().unwrap().clone())),
            ("POST", ["targets"]) => {
                let mut body = options.body.unwrap_or(Value::Null);
                let mut next = self.next_id.lock().unwrap();
                body["id"] = json!(*next);
                *next += 1;
                self.targets.lock().unwrap().push(body.clone());
                Ok(body)
            }
            ("DELETE", ["targets", id]) => {
                if self.fail_deletes {
                    return Err(ConsoleError::Transport {
                        status: 500,
                        status_text: "Internal Server Error".into(),
                        body: "boom".into(),
                    });
                }
                let mut targets = self.targets.lock().unwrap();
                let before = targets.len();
                targets.retain(|t| t["id"].to_string() != *id);
                if targets.len() == before {
                    Err(not_found())
                } else {
                    Ok(json!({"ok": true}))
                }
            }
            ("GET", ["targets", id, "checks"]) => {
                let id: i64 = id.parse().unwrap();
                Ok(json!([{"target_id": id, "ok": true, "latency_ms": 12}]))
            }
            ("GET", ["targets", id, "uptime"]) => {
                let hours = query.trim_start_matches("hours=");
                Ok(json!({"target_id": id.parse::<i64>().unwrap(),
                          "window_hours": hours.parse::<i64>().unwrap(),
                          "uptime_pct": 99.5}))
            }
            _ => Err(not_found()),
        }
    }
}

struct Always(bool);

#[async_trait]
impl Confirm for Always {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

fn console(api: &Arc<FakeApi>, yes: bool) -> Console {
    Console::new(MonitorApi::new(api.clone()), Arc::new(Always(yes)))
}

fn form(name: &str, kind: &str, target: &str, port: &str) -> TargetForm {
    TargetForm {
        name: name.into(),
        kind: kind.into(),
        target: target.into(),
        port: port.into(),
    }
}

#[tokio::test]
async fn empty_registry_invites_first_target() {
    let api = Arc::new(FakeApi::default());
    let c = console(&api, true);
    c.refresh().await;

    let st = c.snapshot().await;
    assert!(st.registry.is_empty());
    assert!(st.registry.bindings().is_empty());
    assert_eq!(st.status.text, MSG_EMPTY);
    assert_eq!(st.status.kind, StatusKind::Info);
}

#[tokio::test]
async fn create_tcp_target_sends_integer_port_and_lists_it() {
    let api = Arc::new(FakeApi::seeded(6));
    let c = console(&api, true);
    c.refresh().await;

    c.add_target(&form("db1", "tcp", "10.0.0.5", "5432")).await;

    let post = api
        .requests()
        .into_iter()
        .find(|r| r.method == "POST")
        .expect("create request");
    assert_eq!(post.path, "/targets");
    assert_eq!(
        post.body,
        Some(json!({"name": "db1", "type": "tcp", "target": "10.0.0.5",
                    "port": 5432, "enabled": true}))
    );

    let st = c.snapshot().await;
    assert_eq!(st.status.text, "Target created: id=7");
    assert_eq!(st.status.kind, StatusKind::Ok);
    assert!(st.registry.contains(7));
    assert_eq!(st.registry.len(), 7);
    // one select and one delete binding per row, no leftovers from the first render
    assert_eq!(st.registry.bindings().len(), 14);
}

#[tokio::test]
async fn deleting_the_selected_target_resets_detail() {
    let api = Arc::new(FakeApi::seeded(7));
    let c = console(&api, true);
    c.refresh().await;

    c.select_target(7).await;
    let st = c.snapshot().await;
    assert_eq!(st.detail.title, "#7");
    assert_eq!(st.detail.output, PICK_ACTION_PROMPT);

    c.delete_target(7).await;
    let st = c.snapshot().await;
    assert_eq!(st.selection.get(), None);
    assert_eq!(st.detail.title, TITLE_PLACEHOLDER);
    assert_eq!(st.detail.output, "");
    assert_eq!(st.status.text, "Deleted target #7");
    assert!(!st.registry.contains(7));
    assert_eq!(api.ids(), vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn uptime_uses_typed_hours() {
    let api = Arc::new(FakeApi::seeded(3));
    let c = console(&api, true);
    c.refresh().await;
    c.select_target(3).await;

    c.load_uptime("48").await;

    let last = api.requests().pop().unwrap();
    assert_eq!(last.method, "GET");
    assert_eq!(last.path, "/targets/3/uptime?hours=48");
    let st = c.snapshot().await;
    let shown: Value = serde_json::from_str(&st.detail.output).unwrap();
    assert_eq!(shown["window_hours"], 48);
}

#[tokio::test]
async fn blank_hours_falls_back_to_a_day() {
    let api = Arc::new(FakeApi::seeded(2));
    let c = console(&api, true);
    c.select_target(2).await;
    c.load_uptime("  ").await;
    assert_eq!(api.requests().pop().unwrap().path, "/targets/2/uptime?hours=24");
}

#[tokio::test]
async fn checks_are_paged_by_twenty() {
    let api = Arc::new(FakeApi::seeded(2));
    let c = console(&api, true);
    c.select_target(1).await;
    c.load_checks().await;

    assert_eq!(api.requests().pop().unwrap().path, "/targets/1/checks?limit=20");
    let st = c.snapshot().await;
    assert!(st.detail.output.contains("latency_ms"));
    assert_eq!(st.status.kind, StatusKind::Ok);
}

#[tokio::test]
async fn tcp_without_port_never_hits_the_network() {
    let api = Arc::new(FakeApi::default());
    let c = console(&api, true);
    c.add_target(&form("db", "tcp", "10.0.0.5", "")).await;

    assert!(api.requests().is_empty());
    let st = c.snapshot().await;
    assert_eq!(st.status.text, MSG_TCP_PORT);
    assert_eq!(st.status.kind, StatusKind::Err);
}

#[tokio::test]
async fn non_tcp_port_is_sent_as_null() {
    let api = Arc::new(FakeApi::default());
    let c = console(&api, true);
    c.add_target(&form("site", "http", "https://example.com", "8080")).await;

    let post = api.requests().into_iter().find(|r| r.method == "POST").unwrap();
    assert_eq!(post.body.unwrap()["port"], Value::Null);
}

#[tokio::test]
async fn loads_without_selection_are_refused_locally() {
    let api = Arc::new(FakeApi::seeded(1));
    let c = console(&api, true);

    c.load_checks().await;
    assert_eq!(c.snapshot().await.status.text, MSG_SELECT_FIRST);
    c.load_uptime("12").await;
    assert_eq!(c.snapshot().await.status.text, MSG_SELECT_FIRST);
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let api = Arc::new(FakeApi::seeded(2));
    let c = console(&api, false);
    c.refresh().await;
    c.delete_target(2).await;

    assert!(api.requests().iter().all(|r| r.method != "DELETE"));
    assert_eq!(api.ids(), vec![1, 2]);
}

#[tokio::test]
async fn failed_delete_keeps_list_and_reports() {
    let api = Arc::new(FakeApi {
        fail_deletes: true,
        ..FakeApi::seeded(2)
    });
    let c = console(&api, true);
    c.refresh().await;
    c.select_target(2).await;

    c.delete_target(2).await;

    let st = c.snapshot().await;
    assert_eq!(st.status.kind, StatusKind::Err);
    assert!(st.status.text.starts_with("500"), "{}", st.status.text);
    assert_eq!(st.registry.len(), 2);
    assert_eq!(st.selection.get(), Some(2));
}

#[tokio::test]
async fn row_bindings_drive_the_dispatcher() {
    let api = Arc::new(FakeApi::seeded(3));
    let c = console(&api, true);
    c.refresh().await;

    let action = c
        .snapshot()
        .await
        .registry
        .binding(1, ActionKind::Select)
        .unwrap();
    assert_eq!(action, RowAction::Select(2));
    c.dispatch(action).await;
    assert_eq!(c.snapshot().await.selection.get(), Some(2));

    let del = c.snapshot().await.registry.binding(0, ActionKind::Delete).unwrap();
    c.dispatch(del).await;
    assert_eq!(api.ids(), vec![2, 3]);
    // still selected: a different target was deleted
    assert_eq!(c.snapshot().await.selection.get(), Some(2));
}

#[tokio::test]
async fn concurrent_operations_leave_a_consistent_registry() {
    let api = Arc::new(FakeApi::seeded(2));
    let c = console(&api, true);
    c.refresh().await;

    let new_target = form("api", "icmp", "10.0.0.9", "");
    tokio::join!(c.add_target(&new_target), c.delete_target(1));

    let st = c.snapshot().await;
    assert!(st.status.text == "Deleted target #1" || st.status.text == "Target created: id=3");
    c.refresh().await;
    let st = c.snapshot().await;
    assert!(st.registry.contains(3));
    assert!(!st.registry.contains(1));
    assert_eq!(st.registry.bindings().len(), 2 * st.registry.len());
}
