//! Dataset tools exposed to the LLM agent.
//!
//! The model never sees raw rows; it calls these functions and receives JSON.
//! Bad arguments come back as `{"error": ...}` so the model can correct itself.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::logic::dataset::record::timestamp_format;
use crate::logic::dataset::{Aggregate, Column, Dataset};

pub const DESCRIBE_DATASET: &str = "describe_dataset";
pub const TOP_NODES: &str = "top_nodes";
pub const AGGREGATE_METRIC: &str = "aggregate_metric";
pub const NODE_SUMMARY: &str = "node_summary";

const MAX_TOP_NODES: usize = 50;

const METRIC_NAMES: [&str; 4] = ["uptime_score", "storage_used_gb", "latency_ms", "epoch_rewards"];

/// Function tool definitions in chat-completions format
pub fn definitions() -> Vec<Value> {
    vec![
        function(
            DESCRIBE_DATASET,
            "Row count, node count, time range and per-column mean/min/max of the pNode history.",
            json!({ "type": "object", "properties": {} }),
        ),
        function(
            TOP_NODES,
            "Rank nodes by their mean value of a metric.",
            json!({
                "type": "object",
                "properties": {
                    "metric": { "type": "string", "enum": METRIC_NAMES },
                    "count": { "type": "integer", "minimum": 1, "maximum": MAX_TOP_NODES },
                    "ascending": { "type": "boolean", "description": "true for lowest first" }
                },
                "required": ["metric"]
            }),
        ),
        function(
            AGGREGATE_METRIC,
            "Aggregate one metric over every row of the dataset.",
            json!({
                "type": "object",
                "properties": {
                    "metric": { "type": "string", "enum": METRIC_NAMES },
                    "op": { "type": "string", "enum": ["mean", "min", "max", "sum", "median"] }
                },
                "required": ["metric", "op"]
            }),
        ),
        function(
            NODE_SUMMARY,
            "Sample count and per-metric averages for a single node identifier.",
            json!({
                "type": "object",
                "properties": { "node_id": { "type": "string" } },
                "required": ["node_id"]
            }),
        ),
    ]
}

fn function(name: &str, description: &str, parameters: Value) -> Value {
    json!({
        "type": "function",
        "function": { "name": name, "description": description, "parameters": parameters }
    })
}

// ============================================================================
// ARGUMENTS
// ============================================================================

#[derive(Debug, Deserialize)]
struct TopNodesArgs {
    metric: Column,
    #[serde(default = "default_count")]
    count: usize,
    #[serde(default)]
    ascending: bool,
}

fn default_count() -> usize {
    5
}

#[derive(Debug, Deserialize)]
struct AggregateArgs {
    metric: Column,
    op: Aggregate,
}

#[derive(Debug, Deserialize)]
struct NodeSummaryArgs {
    node_id: String,
}

// ============================================================================
// EXECUTION
// ============================================================================

/// Run a tool by name. `arguments` is the JSON string sent by the model.
pub fn execute(dataset: &Dataset, name: &str, arguments: &str) -> Value {
    let raw = if arguments.trim().is_empty() { "{}" } else { arguments };

    let result = match name {
        DESCRIBE_DATASET => Ok(describe(dataset)),
        TOP_NODES => parse::<TopNodesArgs>(raw).map(|args| top_nodes(dataset, args)),
        AGGREGATE_METRIC => parse::<AggregateArgs>(raw).map(|args| aggregate(dataset, args)),
        NODE_SUMMARY => parse::<NodeSummaryArgs>(raw).and_then(|args| node_summary(dataset, args)),
        other => Err(format!("unknown tool '{}'", other)),
    };

    result.unwrap_or_else(|error| {
        log::debug!("Tool {} failed: {}", name, error);
        json!({ "error": error })
    })
}

fn parse<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid arguments: {}", e))
}

fn describe(dataset: &Dataset) -> Value {
    let columns: serde_json::Map<String, Value> = Column::ALL
        .iter()
        .map(|&c| {
            (
                c.name().to_string(),
                json!({
                    "mean": dataset.aggregate(c, Aggregate::Mean),
                    "min": dataset.aggregate(c, Aggregate::Min),
                    "max": dataset.aggregate(c, Aggregate::Max),
                }),
            )
        })
        .collect();

    let time_range = dataset.time_range().map(|(start, end)| {
        json!({
            "start": start.format(timestamp_format::FORMAT).to_string(),
            "end": end.format(timestamp_format::FORMAT).to_string(),
        })
    });

    json!({
        "rows": dataset.len(),
        "nodes": dataset.distinct_nodes(),
        "time_range": time_range,
        "columns": columns,
    })
}

fn top_nodes(dataset: &Dataset, args: TopNodesArgs) -> Value {
    let count = args.count.clamp(1, MAX_TOP_NODES);
    let ranked: Vec<Value> = dataset
        .top_nodes(args.metric, count, args.ascending)
        .into_iter()
        .map(|(node_id, value)| json!({ "node_id": node_id, "mean": value }))
        .collect();

    json!({ "metric": args.metric, "ascending": args.ascending, "nodes": ranked })
}

fn aggregate(dataset: &Dataset, args: AggregateArgs) -> Value {
    json!({
        "metric": args.metric,
        "op": args.op,
        "value": dataset.aggregate(args.metric, args.op),
    })
}

fn node_summary(dataset: &Dataset, args: NodeSummaryArgs) -> Result<Value, String> {
    let rows = dataset.node_records(&args.node_id);
    if rows.is_empty() {
        return Err(format!("no records for node '{}'", args.node_id));
    }

    let mut means = serde_json::Map::new();
    for column in Column::ALL {
        let values: Vec<f64> = rows.iter().map(|r| r.value(column)).collect();
        means.insert(column.name().to_string(), json!(Aggregate::Mean.apply(&values)));
    }

    Ok(json!({
        "node_id": args.node_id,
        "samples": rows.len(),
        "means": means,
    }))
}
