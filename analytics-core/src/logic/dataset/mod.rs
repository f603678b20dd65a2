//! Dataset Module - pNode Telemetry Table
//!
//! Flat table of hourly metric records, read once from CSV at startup and
//! shared read-only afterwards. Both models train on it and the chat agent
//! answers questions over it.

pub mod record;
pub mod reader;
pub mod writer;


use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDateTime;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

pub use record::{Column, MetricInput, MetricRecord, FEATURE_COLUMNS, FEATURE_COUNT};
pub use reader::read_csv;
pub use writer::write_csv;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ============================================================================
// AGGREGATES
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Mean,
    Min,
    Max,
    Sum,
    Median,
}

impl Aggregate {
    /// Apply to a slice of values. `None` for an empty slice.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let value = match self {
            Aggregate::Sum => values.iter().sum(),
            Aggregate::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregate::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregate::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
        };
        Some(value)
    }
}

// ============================================================================
// DATASET
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<MetricRecord>,
}

impl Dataset {
    pub fn new(records: Vec<MetricRecord>) -> Self {
        Self { records }
    }

    /// Load the table from a CSV file
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let records = read_csv(path)?;
        log::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `n x 3` matrix of model features
    pub fn feature_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.records.len(), FEATURE_COUNT), |(i, j)| {
            self.records[i].features()[j]
        })
    }

    /// Regression target
    pub fn rewards(&self) -> Array1<f64> {
        self.records.iter().map(|r| r.epoch_rewards).collect()
    }

    pub fn column(&self, column: Column) -> Vec<f64> {
        self.records.iter().map(|r| r.value(column)).collect()
    }

    /// Sorted distinct node identifiers
    pub fn node_ids(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.node_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn distinct_nodes(&self) -> usize {
        self.node_ids().len()
    }

    pub fn aggregate(&self, column: Column, op: Aggregate) -> Option<f64> {
        op.apply(&self.column(column))
    }

    pub fn mean(&self, column: Column) -> Option<f64> {
        self.aggregate(column, Aggregate::Mean)
    }

    /// Record with the highest uptime. Ties resolve to the earliest row.
    pub fn highest_uptime(&self) -> Option<&MetricRecord> {
        self.records.iter().fold(None, |best: Option<&MetricRecord>, r| match best {
            Some(b) if b.uptime_score >= r.uptime_score => Some(b),
            _ => Some(r),
        })
    }

    pub fn node_records(&self, node_id: &str) -> Vec<&MetricRecord> {
        self.records.iter().filter(|r| r.node_id == node_id).collect()
    }

    /// Per-node mean of a column, ordered by node identifier
    pub fn node_means(&self, column: Column) -> Vec<(String, f64)> {
        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for r in &self.records {
            let entry = sums.entry(r.node_id.as_str()).or_insert((0.0, 0));
            entry.0 += r.value(column);
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(node, (sum, count))| (node.to_string(), sum / count as f64))
            .collect()
    }

    /// Nodes ranked by their mean value of `column`
    pub fn top_nodes(&self, column: Column, count: usize, ascending: bool) -> Vec<(String, f64)> {
        let mut means = self.node_means(column);
        if ascending {
            means.sort_by(|a, b| a.1.total_cmp(&b.1));
        } else {
            means.sort_by(|a, b| b.1.total_cmp(&a.1));
        }
        means.truncate(count);
        means
    }

    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.iter().map(|r| r.timestamp).min()?;
        let last = self.records.iter().map(|r| r.timestamp).max()?;
        Some((first, last))
    }
}

impl From<Vec<MetricRecord>> for Dataset {
    fn from(records: Vec<MetricRecord>) -> Self {
        Self::new(records)
    }
}
