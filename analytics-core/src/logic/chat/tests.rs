use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use super::fallback::{self, Intent, EMPTY_DATASET_MESSAGE, OFFLINE_MESSAGE};
use super::*;
use crate::logic::dataset::MetricRecord;

fn record(node: &str, hour: u32, uptime: f64, latency: f64, reward: f64) -> MetricRecord {
    MetricRecord {
        timestamp: NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
        node_id: node.to_string(),
        uptime_score: uptime,
        storage_used_gb: 400.0,
        latency_ms: latency,
        epoch_rewards: reward,
    }
}

fn sample() -> Dataset {
    Dataset::new(vec![
        record("Node_0_PubKey_1000", 0, 0.90, 30.0, 2.0),
        record("Node_0_PubKey_1000", 1, 0.92, 50.0, 4.0),
        record("Node_1_PubKey_2000", 0, 0.99, 25.0, 6.0),
        record("Node_2_PubKey_3000", 0, 0.30, 900.0, 0.0),
    ])
}

// ============================================================================
// FALLBACK
// ============================================================================

#[test]
fn test_intent_priority() {
    assert_eq!(fallback::detect_intent("Which node is MOST ACTIVE?"), Intent::HighestUptime);
    assert_eq!(
        fallback::detect_intent("highest uptime and average reward"),
        Intent::HighestUptime
    );
    assert_eq!(fallback::detect_intent("average reward please"), Intent::AverageReward);
    assert_eq!(fallback::detect_intent("How many nodes exist?"), Intent::NodeCount);
    assert_eq!(fallback::detect_intent("hello"), Intent::Unknown);
}

#[test]
fn test_fallback_answers() {
    let data = sample();

    assert_eq!(
        fallback::answer("how many nodes are online", &data),
        "There are 3 unique nodes in the dataset."
    );
    assert_eq!(
        fallback::answer("who has the highest uptime", &data),
        "The node with the highest activity is Node_1_PubKey_2000 with an uptime score of 0.9900."
    );
    assert_eq!(
        fallback::answer("average reward?", &data),
        "The average epoch reward across the network is 3.0000 XAND."
    );
    assert_eq!(fallback::answer("tell me a joke", &data), OFFLINE_MESSAGE);
}

#[test]
fn test_fallback_on_empty_dataset() {
    let empty = Dataset::default();
    assert_eq!(fallback::answer("highest uptime", &empty), EMPTY_DATASET_MESSAGE);
    assert_eq!(fallback::answer("average reward", &empty), EMPTY_DATASET_MESSAGE);
    assert_eq!(
        fallback::answer("how many nodes", &empty),
        "There are 0 unique nodes in the dataset."
    );
}

#[tokio::test]
async fn test_fallback_agent_requires_data() {
    let agent = ChatAgent::from_settings(None, Some(Arc::new(sample())));
    assert!(!agent.is_augmented());

    assert_eq!(
        agent.respond("how many nodes", None).await,
        Err(ChatError::DataUnavailable)
    );
    assert_eq!(
        agent.respond("how many nodes", Some(&sample())).await.unwrap(),
        "There are 3 unique nodes in the dataset."
    );
}

#[test]
fn test_credential_without_data_falls_back() {
    let agent = ChatAgent::from_settings(Some(LlmSettings::new("gsk-test")), None);
    assert!(!agent.is_augmented());
}

// ============================================================================
// TOOLS
// ============================================================================

#[test]
fn test_tool_definitions_are_functions() {
    let defs = tools::definitions();
    assert_eq!(defs.len(), 4);
    for def in &defs {
        assert_eq!(def["type"], "function");
        assert!(def["function"]["name"].is_string());
    }
}

#[test]
fn test_describe_dataset_tool() {
    let out = tools::execute(&sample(), tools::DESCRIBE_DATASET, "");
    assert_eq!(out["rows"], 4);
    assert_eq!(out["nodes"], 3);
    assert_eq!(out["columns"]["latency_ms"]["max"], 900.0);
    assert_eq!(out["time_range"]["start"], "2024-06-01 00:00:00.000000");
}

#[test]
fn test_aggregate_tool() {
    let out = tools::execute(
        &sample(),
        tools::AGGREGATE_METRIC,
        r#"{"metric": "epoch_rewards", "op": "sum"}"#,
    );
    assert_eq!(out["value"], 12.0);
    assert_eq!(out["op"], "sum");
}

#[test]
fn test_top_nodes_tool() {
    let out = tools::execute(
        &sample(),
        tools::TOP_NODES,
        r#"{"metric": "latency_ms", "count": 2, "ascending": true}"#,
    );
    let nodes = out["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["node_id"], "Node_1_PubKey_2000");
    assert_eq!(nodes[1]["node_id"], "Node_0_PubKey_1000");
    assert_eq!(nodes[1]["mean"], 40.0);
}

#[test]
fn test_node_summary_tool() {
    let out = tools::execute(&sample(), tools::NODE_SUMMARY, r#"{"node_id": "Node_0_PubKey_1000"}"#);
    assert_eq!(out["samples"], 2);
    assert_eq!(out["means"]["epoch_rewards"], 3.0);

    let missing = tools::execute(&sample(), tools::NODE_SUMMARY, r#"{"node_id": "Node_9"}"#);
    assert!(missing["error"].as_str().unwrap().contains("Node_9"));
}

#[test]
fn test_tool_errors_are_reported_as_json() {
    let unknown = tools::execute(&sample(), "drop_everything", "{}");
    assert!(unknown["error"].as_str().unwrap().contains("unknown tool"));

    let bad = tools::execute(&sample(), tools::AGGREGATE_METRIC, r#"{"metric": "bogus"}"#);
    assert!(bad["error"].as_str().unwrap().starts_with("invalid arguments"));
}

// ============================================================================
// LLM AGENT (mock chat-completions server)
// ============================================================================

#[derive(Clone, Default)]
struct MockState {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn tool_then_answer(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    let n = state.calls.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(body);

    if n == 0 {
        Json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "describe_dataset", "arguments": "{}" }
                    }]
                }
            }]
        }))
    } else {
        Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "There are 3 nodes." } }]
        }))
    }
}

async fn always_tool(State(state): State<MockState>) -> Json<Value> {
    state.calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "tool_calls": [{
                    "id": "loop",
                    "type": "function",
                    "function": { "name": "describe_dataset", "arguments": "" }
                }]
            }
        }]
    }))
}

async fn server_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn spawn_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn settings(base_url: String) -> LlmSettings {
    LlmSettings {
        base_url,
        timeout_seconds: 5,
        ..LlmSettings::new("gsk-test")
    }
}

#[tokio::test]
async fn test_agent_runs_tool_then_answers() {
    let state = MockState::default();
    let router = Router::new()
        .route("/v1/chat/completions", post(tool_then_answer))
        .with_state(state.clone());
    let url = spawn_mock(router).await;

    let agent = ChatAgent::from_settings(Some(settings(url)), Some(Arc::new(sample())));
    assert!(agent.is_augmented());

    let answer = agent.respond("how many nodes?", None).await.unwrap();
    assert_eq!(answer, "There are 3 nodes.");
    assert_eq!(state.calls.load(Ordering::SeqCst), 2);

    let requests = state.requests.lock().unwrap();
    assert_eq!(requests[0]["messages"][0]["role"], "system");
    assert_eq!(requests[0]["messages"][1]["content"], "how many nodes?");
    assert_eq!(requests[0]["tools"].as_array().unwrap().len(), 4);

    let second = requests[1]["messages"].as_array().unwrap();
    let tool_msg = second.last().unwrap();
    assert_eq!(tool_msg["role"], "tool");
    assert_eq!(tool_msg["tool_call_id"], "call_1");
    let payload: Value = serde_json::from_str(tool_msg["content"].as_str().unwrap()).unwrap();
    assert_eq!(payload["nodes"], 3);
}

#[tokio::test]
async fn test_agent_round_limit() {
    let state = MockState::default();
    let router = Router::new()
        .route("/v1/chat/completions", post(always_tool))
        .with_state(state.clone());
    let url = spawn_mock(router).await;

    let agent = LlmAgent::new(settings(url), Arc::new(sample()))
        .unwrap()
        .with_max_rounds(3);
    let err = agent.run("loop forever").await.unwrap_err();

    assert!(matches!(err, AgentError::TooManyRounds(3)));
    assert_eq!(state.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_agent_failure_becomes_message() {
    let router = Router::new().route("/v1/chat/completions", post(server_error));
    let url = spawn_mock(router).await;

    let agent = ChatAgent::from_settings(Some(settings(url)), Some(Arc::new(sample())));
    let answer = agent.respond("anything", None).await.unwrap();

    assert!(answer.starts_with("AI Error: "), "got: {}", answer);
    assert!(answer.contains("500"));
    assert!(answer.ends_with("(Check backend logs)"));
}
