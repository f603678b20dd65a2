use super::*;
use crate::logic::dataset::{Dataset, MetricInput};
use crate::logic::generator::{generate, GeneratorConfig};
use chrono::NaiveDate;
use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generated(nodes: usize, days: i64, seed: u64) -> Dataset {
    let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(8, 0, 0).unwrap();
    let config = GeneratorConfig::new(nodes, days).with_end(end);
    Dataset::new(generate(&config, &mut StdRng::seed_from_u64(seed)))
}

fn small_boosting() -> BoostingParams {
    BoostingParams {
        n_estimators: 30,
        ..Default::default()
    }
}

// ============================================================================
// REWARD PREDICTOR
// ============================================================================

#[test]
fn test_untrained_predictor_returns_zero() {
    let predictor = RewardPredictor::new();
    assert!(!predictor.is_trained());
    for (u, s, l) in [(0.0, 0.0, 0.0), (0.99, 900.0, 25.0), (-5.0, f64::MAX, f64::NAN)] {
        assert_eq!(predictor.predict(u, s, l), 0.0);
    }
}

#[test]
fn test_predictor_trains_on_two_node_day() {
    let data = generated(2, 1, 5);
    assert_eq!(data.len(), 50);

    let mut predictor = RewardPredictor::with_params(small_boosting());
    let report = predictor.train(&data).unwrap();

    assert!(predictor.is_trained());
    assert_eq!(report.status, "trained");
    let score = report.score.unwrap();
    assert!(score.is_finite() && score > 0.5, "R2 {}", score);

    let projected = predictor.predict(0.95, 500.0, 40.0);
    assert!(projected.is_finite());
}

#[test]
fn test_predictor_rejects_empty_dataset() {
    let mut predictor = RewardPredictor::new();
    assert_eq!(predictor.train(&Dataset::default()), Err(ModelError::EmptyDataset));
    assert!(!predictor.is_trained());
    assert_eq!(predictor.predict(0.9, 100.0, 30.0), 0.0);
}

#[test]
fn test_boosting_learns_step_function() {
    let x = array![[0.0], [1.0], [2.0], [3.0], [10.0], [11.0], [12.0], [13.0]];
    let y = [1.0, 1.0, 1.0, 1.0, 9.0, 9.0, 9.0, 9.0];

    let mut model = GradientBoostedRegressor::new(BoostingParams::default());
    model.fit(&x, &y).unwrap();

    let pred = model.predict(&array![[1.5], [11.5]]).unwrap();
    assert!((pred[0] - 1.0).abs() < 0.1, "low side {}", pred[0]);
    assert!((pred[1] - 9.0).abs() < 0.1, "high side {}", pred[1]);
}

#[test]
fn test_boosting_shape_checks() {
    let mut model = GradientBoostedRegressor::new(small_boosting());
    assert_eq!(model.predict(&array![[1.0]]), Err(ModelError::NotFitted));

    let err = model.fit(&array![[1.0], [2.0]], &[1.0]).unwrap_err();
    assert_eq!(err, ModelError::ShapeMismatch { expected: 2, actual: 1 });
}

#[test]
fn test_r2_score() {
    assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0);
    assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]), 0.0);
    assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 4.0]), 1.0);
    assert_eq!(r2_score(&[4.0, 4.0], &[3.0, 4.0]), 0.0);
}

// ============================================================================
// ANOMALY DETECTOR
// ============================================================================

#[test]
fn test_untrained_detector_returns_empty() {
    let detector = AnomalyDetector::new();
    assert!(!detector.is_trained());
    let out = detector.analyze(&[MetricInput::new(0.9, 400.0, 50.0)]);
    assert!(out.is_empty());
}

#[test]
fn test_detector_flags_outlier() {
    let data = generated(5, 4, 9);
    let mut detector = AnomalyDetector::new();
    let report = detector.train(&data).unwrap();
    assert_eq!(report.score, None);
    assert!(detector.is_trained());

    let typical = data
        .records()
        .iter()
        .find(|r| r.latency_ms < 100.0 && r.uptime_score > 0.85)
        .map(MetricInput::from)
        .unwrap();
    let outlier = MetricInput::new(0.15, 20.0, 1800.0);

    let results = detector.analyze(&[outlier, typical]);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status, AnomalyStatus::Risk);
    assert!(results[0].anomaly_score < 0.0);
    assert!(results[0].anomaly_score < results[1].anomaly_score);
}

#[test]
fn test_contamination_fraction_on_training_rows() {
    let data = generated(4, 5, 21);
    let mut detector = AnomalyDetector::new();
    detector.train(&data).unwrap();

    let inputs: Vec<MetricInput> = data.records().iter().map(MetricInput::from).collect();
    let risky = detector
        .analyze(&inputs)
        .iter()
        .filter(|r| r.status == AnomalyStatus::Risk)
        .count();

    let fraction = risky as f64 / inputs.len() as f64;
    assert!(fraction > 0.0 && fraction <= 0.06, "fraction {}", fraction);
}

#[test]
fn test_detector_is_deterministic() {
    let data = generated(3, 2, 1);
    let mut a = AnomalyDetector::new();
    let mut b = AnomalyDetector::new();
    a.train(&data).unwrap();
    b.train(&data).unwrap();

    let probe = [MetricInput::new(0.5, 120.0, 700.0)];
    assert_eq!(a.analyze(&probe), b.analyze(&probe));
}

#[test]
fn test_scaler_standardizes_columns() {
    let x = array![[1.0, 5.0], [3.0, 5.0]];
    let mut scaler = StandardScaler::new();
    let z = scaler.fit_transform(&x).unwrap();

    assert_eq!(z, array![[-1.0, 0.0], [1.0, 0.0]]);
    assert!(matches!(
        scaler.transform(&array![[1.0]]),
        Err(ModelError::ShapeMismatch { expected: 2, actual: 1 })
    ));
}

#[test]
fn test_percentile_interpolates() {
    let values = [4.0, 1.0, 3.0, 2.0];
    assert_eq!(isolation::percentile(&values, 0.0), Some(1.0));
    assert_eq!(isolation::percentile(&values, 100.0), Some(4.0));
    assert_eq!(isolation::percentile(&values, 50.0), Some(2.5));
    assert_eq!(isolation::percentile(&[], 5.0), None);
}

#[test]
fn test_average_path_length() {
    assert_eq!(isolation::average_path_length(1), 0.0);
    assert_eq!(isolation::average_path_length(2), 1.0);
    let c256 = isolation::average_path_length(256);
    assert!((c256 - 10.24).abs() < 0.01, "c(256) = {}", c256);
}
