use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of model features per sample
pub const FEATURE_COUNT: usize = 3;

/// Feature column names, in model order
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = ["uptime_score", "storage_used_gb", "latency_ms"];

/// One hourly telemetry sample for a pNode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetricRecord {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub node_id: String,

    /// Fraction of the hour the node was reachable, in [0, 1]
    pub uptime_score: f64,
    pub storage_used_gb: f64,
    pub latency_ms: f64,

    pub epoch_rewards: f64,
}

impl MetricRecord {
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.uptime_score, self.storage_used_gb, self.latency_ms]
    }

    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::UptimeScore => self.uptime_score,
            Column::StorageUsedGb => self.storage_used_gb,
            Column::LatencyMs => self.latency_ms,
            Column::EpochRewards => self.epoch_rewards,
        }
    }
}

/// Model input: the three features without identity or target.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MetricInput {
    pub uptime_score: f64,
    pub storage_used_gb: f64,
    pub latency_ms: f64,
}

impl MetricInput {
    pub fn new(uptime_score: f64, storage_used_gb: f64, latency_ms: f64) -> Self {
        Self { uptime_score, storage_used_gb, latency_ms }
    }

    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.uptime_score, self.storage_used_gb, self.latency_ms]
    }
}

impl From<&MetricRecord> for MetricInput {
    fn from(record: &MetricRecord) -> Self {
        Self::new(record.uptime_score, record.storage_used_gb, record.latency_ms)
    }
}

/// Numeric columns of the dataset
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    UptimeScore,
    StorageUsedGb,
    LatencyMs,
    EpochRewards,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::UptimeScore,
        Column::StorageUsedGb,
        Column::LatencyMs,
        Column::EpochRewards,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::UptimeScore => "uptime_score",
            Column::StorageUsedGb => "storage_used_gb",
            Column::LatencyMs => "latency_ms",
            Column::EpochRewards => "epoch_rewards",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown column '{}'", s))
    }
}

/// Timestamps are stored as `YYYY-MM-DD HH:MM:SS.ffffff`.
/// Reading also accepts the `T` separator and a missing fraction.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

    const PARSE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        PARSE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
            .ok_or_else(|| format!("invalid timestamp '{}'", raw))
    }
}
