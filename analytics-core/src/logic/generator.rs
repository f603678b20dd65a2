//! Synthetic pNode Telemetry Generator
//!
//! Builds an hourly history for a fleet of nodes. Each node gets a fixed base
//! reliability and storage capacity; samples jitter around those bases and a
//! small fraction are replaced by anomalies (uptime collapse, storage drop,
//! latency spike). Reward is a fixed function of uptime and storage plus noise.

use chrono::{Duration, Local, NaiveDateTime};
use rand::Rng;

use crate::constants::{DEFAULT_ANOMALY_RATE, DEFAULT_HISTORY_DAYS, DEFAULT_NODE_COUNT};
use crate::logic::dataset::MetricRecord;

// ============================================================================
// RANGES
// ============================================================================

const BASE_RELIABILITY: (f64, f64) = (0.8, 0.99);
const BASE_STORAGE_GB: (f64, f64) = (100.0, 1000.0);
const UPTIME_JITTER: f64 = 0.05;
const STORAGE_JITTER_GB: (f64, f64) = (-10.0, 50.0);

pub const NORMAL_LATENCY_MS: (f64, f64) = (20.0, 100.0);
pub const ANOMALY_LATENCY_MS: (f64, f64) = (500.0, 2000.0);
pub const ANOMALY_UPTIME: (f64, f64) = (0.1, 0.5);
const ANOMALY_STORAGE_FACTOR: f64 = 0.2;

const REWARD_PER_UPTIME_GB: f64 = 0.01;
const REWARD_NOISE: (f64, f64) = (0.0, 5.0);

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub nodes: usize,
    pub days: i64,
    /// Probability that any single sample is an anomaly
    pub anomaly_rate: f64,
    /// Last timestamp of the series (inclusive)
    pub end: NaiveDateTime,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            nodes: DEFAULT_NODE_COUNT,
            days: DEFAULT_HISTORY_DAYS,
            anomaly_rate: DEFAULT_ANOMALY_RATE,
            end: Local::now().naive_local(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(nodes: usize, days: i64) -> Self {
        Self {
            nodes,
            days,
            ..Default::default()
        }
    }

    pub fn with_anomaly_rate(mut self, rate: f64) -> Self {
        self.anomaly_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = end;
        self
    }
}

/// A generated record plus whether it was an injected anomaly
#[derive(Debug, Clone)]
pub struct LabeledRecord {
    pub record: MetricRecord,
    pub is_anomaly: bool,
}

// ============================================================================
// GENERATION
// ============================================================================

/// Hourly timestamps from `end - days` to `end`, both ends included
pub fn hourly_timestamps(end: NaiveDateTime, days: i64) -> Vec<NaiveDateTime> {
    let start = end - Duration::days(days.max(0));
    let mut stamps = Vec::new();
    let mut current = start;
    while current <= end {
        stamps.push(current);
        current += Duration::hours(1);
    }
    stamps
}

/// Generate records grouped by node, ascending time within each node
pub fn generate<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Vec<MetricRecord> {
    generate_labeled(config, rng)
        .into_iter()
        .map(|labeled| labeled.record)
        .collect()
}

pub fn generate_labeled<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Vec<LabeledRecord> {
    let timestamps = hourly_timestamps(config.end, config.days);
    let anomaly_rate = config.anomaly_rate.clamp(0.0, 1.0);
    let mut out = Vec::with_capacity(config.nodes * timestamps.len());

    for index in 0..config.nodes {
        let base_reliability = rng.gen_range(BASE_RELIABILITY.0..BASE_RELIABILITY.1);
        let base_storage = rng.gen_range(BASE_STORAGE_GB.0..BASE_STORAGE_GB.1);
        let node_id = format!("Node_{}_PubKey_{}", index, rng.gen_range(1000..=9999));

        for &timestamp in &timestamps {
            let is_anomaly = rng.gen_bool(anomaly_rate);

            let mut uptime = (base_reliability + rng.gen_range(-UPTIME_JITTER..UPTIME_JITTER)).clamp(0.0, 1.0);
            if is_anomaly {
                uptime = rng.gen_range(ANOMALY_UPTIME.0..ANOMALY_UPTIME.1);
            }

            let mut storage = base_storage + rng.gen_range(STORAGE_JITTER_GB.0..STORAGE_JITTER_GB.1);
            if is_anomaly {
                storage *= ANOMALY_STORAGE_FACTOR;
            }

            let latency = if is_anomaly {
                rng.gen_range(ANOMALY_LATENCY_MS.0..ANOMALY_LATENCY_MS.1)
            } else {
                rng.gen_range(NORMAL_LATENCY_MS.0..NORMAL_LATENCY_MS.1)
            };

            let reward = uptime * storage * REWARD_PER_UPTIME_GB
                + rng.gen_range(REWARD_NOISE.0..REWARD_NOISE.1);

            out.push(LabeledRecord {
                record: MetricRecord {
                    timestamp,
                    node_id: node_id.clone(),
                    uptime_score: uptime,
                    storage_used_gb: storage,
                    latency_ms: latency,
                    epoch_rewards: reward,
                },
                is_anomaly,
            });
        }
    }

    log::debug!(
        "Generated {} samples for {} nodes over {} days",
        out.len(),
        config.nodes,
        config.days
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_end() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 30, 0).unwrap()
    }

    #[test]
    fn test_one_day_is_25_hourly_samples() {
        let stamps = hourly_timestamps(fixed_end(), 1);
        assert_eq!(stamps.len(), 25);
        assert_eq!(stamps[0], fixed_end() - Duration::days(1));
        assert_eq!(*stamps.last().unwrap(), fixed_end());
    }

    #[test]
    fn test_two_nodes_one_day() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = GeneratorConfig::new(2, 1).with_end(fixed_end());
        let records = generate(&config, &mut rng);

        assert_eq!(records.len(), 50);

        let mut ids: Vec<&str> = records.iter().map(|r| r.node_id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 2);
        assert!(ids[0].starts_with("Node_0_PubKey_"));
        assert!(ids[1].starts_with("Node_1_PubKey_"));
    }

    #[test]
    fn test_uptime_always_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = GeneratorConfig::new(30, 3).with_end(fixed_end()).with_anomaly_rate(0.2);

        for r in generate(&config, &mut rng) {
            assert!((0.0..=1.0).contains(&r.uptime_score), "uptime {}", r.uptime_score);
        }
    }

    #[test]
    fn test_anomalies_have_inflated_latency() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = GeneratorConfig::new(10, 5).with_end(fixed_end()).with_anomaly_rate(0.3);
        let labeled = generate_labeled(&config, &mut rng);

        let anomalies: Vec<_> = labeled.iter().filter(|l| l.is_anomaly).collect();
        let normal: Vec<_> = labeled.iter().filter(|l| !l.is_anomaly).collect();
        assert!(!anomalies.is_empty());
        assert!(!normal.is_empty());

        for l in &anomalies {
            assert!(l.record.latency_ms >= ANOMALY_LATENCY_MS.0);
            assert!(l.record.uptime_score < ANOMALY_UPTIME.1);
        }
        for l in &normal {
            assert!(l.record.latency_ms < NORMAL_LATENCY_MS.1);
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let config = GeneratorConfig::new(3, 1).with_end(fixed_end());
        let a = generate(&config, &mut StdRng::seed_from_u64(42));
        let b = generate(&config, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
