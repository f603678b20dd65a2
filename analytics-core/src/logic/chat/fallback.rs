//! Offline responder used when no LLM credential is configured.
//!
//! Three keyword intents over the dataset; anything else gets a canned reply.

use crate::logic::dataset::{Column, Dataset};

pub const OFFLINE_MESSAGE: &str = "I'm currently running in 'Offline Mode' (No API Key). \
I can answer basic questions about 'highest uptime', 'average reward', or 'how many nodes'.";

pub const EMPTY_DATASET_MESSAGE: &str = "The dataset does not contain any node records yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    HighestUptime,
    AverageReward,
    NodeCount,
    Unknown,
}

/// Match intents in priority order on the lowercased query
pub fn detect_intent(query: &str) -> Intent {
    let query = query.to_lowercase();
    if query.contains("highest uptime") || query.contains("most active") {
        Intent::HighestUptime
    } else if query.contains("average reward") {
        Intent::AverageReward
    } else if query.contains("how many nodes") {
        Intent::NodeCount
    } else {
        Intent::Unknown
    }
}

pub fn answer(query: &str, dataset: &Dataset) -> String {
    let intent = detect_intent(query);
    log::debug!("Rule-based fallback agent, intent {:?}", intent);

    match intent {
        Intent::HighestUptime => match dataset.highest_uptime() {
            Some(top) => format!(
                "The node with the highest activity is {} with an uptime score of {:.4}.",
                top.node_id, top.uptime_score
            ),
            None => EMPTY_DATASET_MESSAGE.to_string(),
        },
        Intent::AverageReward => match dataset.mean(Column::EpochRewards) {
            Some(avg) => format!("The average epoch reward across the network is {:.4} XAND.", avg),
            None => EMPTY_DATASET_MESSAGE.to_string(),
        },
        Intent::NodeCount => format!("There are {} unique nodes in the dataset.", dataset.distinct_nodes()),
        Intent::Unknown => OFFLINE_MESSAGE.to_string(),
    }
}
