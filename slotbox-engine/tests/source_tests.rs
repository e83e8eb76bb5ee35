mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotbox_engine::{
    AddOptions, ContentQuery, ContentSource, EngineConfig, HttpContentSource, HttpSourceConfig,
    LoadOutcome, MemoryContentSource, Slot, SlotEnv, SlotError, SortOrder,
};
use slotbox_types::{BoxId, ContentDescriptor, NodeId};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn standalone(node: i64) -> EngineConfig {
    EngineConfig {
        standalone: true,
        node_id: Some(NodeId::new(node)),
        ..Default::default()
    }
}

fn http_source(server: &MockServer) -> HttpContentSource {
    HttpContentSource::new(HttpSourceConfig {
        base_url: server.uri(),
        ..Default::default()
    })
}

fn stored(content: &str, box_id: i64, sort_id: u32) -> ContentDescriptor {
    text(content)
        .with_box_id(BoxId::new(box_id))
        .with_sort_id(sort_id)
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn http_source_config_default() {
    let cfg = HttpSourceConfig::default();
    assert_eq!(cfg.base_url, "http://localhost");
    assert_eq!(cfg.content_path, "/admin/object/content");
    assert_eq!(cfg.timeout_secs, 30);
}

#[test]
fn http_source_config_serde_fills_defaults() {
    let cfg: HttpSourceConfig =
        serde_json::from_str(r#"{"base_url": "https://cms.example.com"}"#).unwrap();
    assert_eq!(cfg.base_url, "https://cms.example.com");
    assert_eq!(cfg.content_path, "/admin/object/content");
}

#[test]
fn engine_config_serde_fills_defaults() {
    let cfg: EngineConfig = serde_json::from_str(r#"{"node_id": 4}"#).unwrap();
    assert_eq!(cfg.node_id, Some(NodeId::new(4)));
    assert!(cfg.standalone);
    assert_eq!(cfg.leave_grace_ms, 100);
}

// ── HTTP source ─────────────────────────────────────────────────

#[tokio::test]
async fn http_fetch_sends_filters_and_parses_data() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/object/content"))
        .and(query_param("filter[boxId]", "3"))
        .and(query_param("filter[node]", "9"))
        .and(query_param("order[sort]", "asc"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"type": "text", "content": "a", "boxId": 3, "sortId": 1},
                {"type": "image", "content": {"src": "b.png"}, "boxId": "3", "sortId": 2},
                "garbage"
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = http_source(&server);
    let contents = source
        .fetch_contents(&ContentQuery::new(BoxId::new(3), NodeId::new(9)))
        .await
        .unwrap();

    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0].content_type.as_deref(), Some("text"));
    assert_eq!(contents[1].box_id, Some(BoxId::new(3)));
    assert_eq!(contents[1].content, json!({"src": "b.png"}));
}

#[tokio::test]
async fn http_fetch_descending_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("order[sort]", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let query = ContentQuery {
        order: SortOrder::Descending,
        ..ContentQuery::new(BoxId::new(1), NodeId::new(1))
    };
    let contents = http_source(&server).fetch_contents(&query).await.unwrap();
    assert!(contents.is_empty());
}

#[tokio::test]
async fn http_fetch_without_data_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0})))
        .mount(&server)
        .await;

    let contents = http_source(&server)
        .fetch_contents(&ContentQuery::new(BoxId::new(1), NodeId::new(1)))
        .await
        .unwrap();
    assert!(contents.is_empty());
}

#[tokio::test]
async fn http_fetch_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = http_source(&server)
        .fetch_contents(&ContentQuery::new(BoxId::new(1), NodeId::new(1)))
        .await
        .unwrap_err();
    match err {
        SlotError::Remote(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("boom"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn http_fetch_invalid_json_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = http_source(&server)
        .fetch_contents(&ContentQuery::new(BoxId::new(1), NodeId::new(1)))
        .await;
    assert!(matches!(result, Err(SlotError::Http(_))));
}

#[tokio::test]
async fn http_base_url_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/object/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpContentSource::new(HttpSourceConfig {
        base_url: format!("{}/", server.uri()),
        ..Default::default()
    });
    source
        .fetch_contents(&ContentQuery::new(BoxId::new(1), NodeId::new(1)))
        .await
        .unwrap();
}

// ── Memory source ───────────────────────────────────────────────

#[tokio::test]
async fn memory_source_sorts_by_sort_id() {
    let source = MemoryContentSource::new().with_contents(
        BoxId::new(1),
        NodeId::new(2),
        vec![stored("b", 1, 2), text("loose"), stored("a", 1, 1)],
    );

    let query = ContentQuery::new(BoxId::new(1), NodeId::new(2));
    let contents = source.fetch_contents(&query).await.unwrap();
    let order: Vec<_> = contents.iter().map(|d| d.content.clone()).collect();
    assert_eq!(order, vec![json!("a"), json!("b"), json!("loose")]);

    let other = ContentQuery::new(BoxId::new(1), NodeId::new(3));
    assert!(source.fetch_contents(&other).await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_source_failure() {
    let source = MemoryContentSource::new().failing("offline");
    let result = source
        .fetch_contents(&ContentQuery::new(BoxId::new(1), NodeId::new(2)))
        .await;
    assert!(matches!(result, Err(SlotError::Remote(m)) if m == "offline"));
}

// ── Initial load ────────────────────────────────────────────────

#[tokio::test]
async fn standalone_slot_loads_on_initialize() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("filter[boxId]", "3"))
        .and(query_param("filter[node]", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"type": "text", "content": "a", "boxId": 3, "sortId": 1},
                {"type": "text", "content": "b", "boxId": 3, "sortId": 2}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut slot = Slot::initialize(
        &multi_region(r#"{"id": 3}"#),
        standalone(9),
        SlotEnv::default(),
        &http_source(&server),
    )
    .await;

    assert_eq!(slot.len(), 2);
    assert!(!slot.has_changes());
}

#[tokio::test]
async fn initialize_without_node_skips_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let config = EngineConfig {
        node_id: None,
        ..Default::default()
    };
    let slot = Slot::initialize(
        &multi_region(r#"{"id": 3}"#),
        config,
        SlotEnv::default(),
        &http_source(&server),
    )
    .await;
    assert!(slot.is_empty());
}

#[tokio::test]
async fn initialize_without_box_id_skips_fetch() {
    let source = MemoryContentSource::new().failing("must not be called");
    let slot = Slot::initialize(&multi_region("{}"), standalone(1), SlotEnv::default(), &source).await;
    assert!(slot.is_empty());
}

#[tokio::test]
async fn embedded_slot_does_not_load() {
    let source = MemoryContentSource::new().with_contents(
        BoxId::new(3),
        NodeId::new(9),
        vec![stored("a", 3, 1)],
    );
    let config = EngineConfig {
        standalone: false,
        ..standalone(9)
    };
    let slot = Slot::initialize(&multi_region(r#"{"id": 3}"#), config, SlotEnv::default(), &source).await;
    assert!(slot.is_empty());
}

#[tokio::test]
async fn failed_load_keeps_initial_layout() {
    let source = MemoryContentSource::new().failing("offline");
    let mut slot = Slot::new(
        &single_region(r#"{"id": 3, "type": "text"}"#),
        standalone(9),
        SlotEnv::default(),
    );
    let auto_filled = slot.item_ids();

    let outcome = slot.load_contents(&source).await.unwrap();

    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(slot.item_ids(), auto_filled);
}

#[tokio::test]
async fn load_replaces_auto_filled_item() {
    let source = MemoryContentSource::new().with_contents(
        BoxId::new(3),
        NodeId::new(9),
        vec![stored("from server", 3, 1)],
    );
    let mut slot = Slot::new(
        &single_region(r#"{"id": 3, "type": "text"}"#),
        standalone(9),
        SlotEnv::default(),
    );
    assert_eq!(slot.len(), 1);

    let outcome = slot.load_contents(&source).await.unwrap();

    assert_eq!(outcome, LoadOutcome::Applied(1));
    assert_eq!(slot.items()[0].content(), &json!("from server"));
    assert!(slot.items()[0].is_removable());
}

#[tokio::test]
async fn load_missing_context_is_an_error() {
    let mut slot = Slot::new(&multi_region("{}"), standalone(9), SlotEnv::default());
    let result = slot.load_contents(&MemoryContentSource::new()).await;
    assert!(matches!(result, Err(SlotError::MissingContext("box id"))));

    let slot = Slot::new(&multi_region(r#"{"id": 1}"#), offline_config(), SlotEnv::default());
    assert!(matches!(slot.begin_load(), Err(SlotError::MissingContext("node id"))));
}

// ── Load race ───────────────────────────────────────────────────

#[test]
fn edit_during_fetch_discards_result() {
    let mut slot = Slot::new(&multi_region(r#"{"id": 3}"#), standalone(9), SlotEnv::default());
    let ticket = slot.begin_load().unwrap();
    assert_eq!(ticket.query().box_id, BoxId::new(3));
    assert_eq!(ticket.query().node_id, NodeId::new(9));

    let added = slot.add_content(Some(text("mine")), AddOptions::default()).unwrap();
    let outcome = slot.finish_load(ticket, Ok(vec![stored("theirs", 3, 1)]));

    assert_eq!(outcome, LoadOutcome::Stale);
    assert_eq!(slot.item_ids(), vec![added]);
}

#[test]
fn drag_without_drop_does_not_invalidate_fetch() {
    let mut slot = Slot::new(&multi_region(r#"{"id": 3}"#), standalone(9), SlotEnv::default());
    let ticket = slot.begin_load().unwrap();

    let layout = stacked_layout(&[]);
    slot.on_drag_over(&slotbox_engine::DragOverEvent {
        target: Some(slotbox_engine::EventTarget::slot(slot.id())),
        pointer: at(150.0),
        layout,
    });

    let outcome = slot.finish_load(ticket, Ok(vec![stored("a", 3, 1), stored("b", 3, 2)]));
    assert_eq!(outcome, LoadOutcome::Applied(2));
    assert!(slot.placeholder_anchor().is_none());
}

#[test]
fn finish_load_without_edits_applies() {
    let mut slot = Slot::new(&multi_region(r#"{"id": 3}"#), standalone(9), SlotEnv::default());
    let ticket = slot.begin_load().unwrap();

    let outcome = slot.finish_load(ticket, Ok(vec![stored("a", 3, 1)]));
    assert_eq!(outcome, LoadOutcome::Applied(1));
    assert!(!slot.has_changes());
}
