//! Bootstrap behaviour through the dispatcher

mod common;

use common::{informative_cohort, panel_from};
use tir_core::{sequential, CancellationToken, Error, TargetRange, TimeWindow};
use tir_estimate::{estimate_tir, ConfidenceLevel, Dispatcher, Method, Model, TirConfig};

fn config() -> TirConfig {
    TirConfig::new()
        .with_range(TargetRange::STANDARD_GLUCOSE)
        .with_seed(2024)
}

#[test]
fn fewer_than_two_replicates_rejected() {
    let panel = panel_from(&[("A", 0.0, 100.0), ("B", 0.0, 200.0)]);
    for n in [0, 1] {
        let err = estimate_tir(&panel, &config().with_bootstrap(n)).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { expected: 2, .. }));
    }
}

#[test]
fn fixed_seed_is_deterministic() {
    let panel = informative_cohort(30, 1);
    for method in [Method::Naive, Method::Proposed] {
        let cfg = config().with_method(method).with_bootstrap(40);
        let a = estimate_tir(&panel, &cfg).unwrap();
        let b = estimate_tir(&panel, &cfg).unwrap();
        assert_eq!(a.standard_error, b.standard_error);
        assert_eq!(a.lower, b.lower);
        assert_eq!(a.upper, b.upper);
    }
}

#[test]
fn point_estimate_ignores_seed_and_replicate_count() {
    let panel = informative_cohort(30, 2);
    let point = estimate_tir(&panel, &config()).unwrap().estimate;
    for (seed, n) in [(1, 2), (2, 25), (3, 60)] {
        let result = estimate_tir(&panel, &config().with_seed(seed).with_bootstrap(n)).unwrap();
        assert_eq!(result.estimate, point);
        let summary = result.bootstrap.as_ref().unwrap();
        assert_eq!(summary.replicates.len(), n);
    }
}

#[test]
fn interval_and_standard_error_are_sane() {
    let panel = informative_cohort(50, 4);
    let result = estimate_tir(&panel, &config().with_bootstrap(100)).unwrap();
    let (se, lower, upper) = (
        result.standard_error.unwrap(),
        result.lower.unwrap(),
        result.upper.unwrap(),
    );
    assert!(se > 0.0);
    assert!(0.0 <= lower && lower <= upper && upper <= 1.0);
    assert!(lower < result.estimate && result.estimate < upper);
}

#[test]
fn configured_level_narrows_interval_and_labels_columns() {
    let panel = informative_cohort(50, 4);
    let wide = estimate_tir(&panel, &config().with_bootstrap(100)).unwrap();
    let narrow = estimate_tir(
        &panel,
        &config()
            .with_bootstrap(100)
            .with_confidence_level(ConfidenceLevel::new(0.9).unwrap()),
    )
    .unwrap();

    assert!(narrow.lower.unwrap() >= wide.lower.unwrap());
    assert!(narrow.upper.unwrap() <= wide.upper.unwrap());
    let labels: Vec<String> = narrow.columns().into_iter().map(|(name, _)| name).collect();
    assert!(labels.contains(&"lower_5%".to_string()));
    assert!(labels.contains(&"upper_95%".to_string()));
}

#[test]
fn hazard_bootstrap_refits_per_replicate() {
    let panel = informative_cohort(40, 6);
    let cfg = config()
        .with_model(Model::Hazard)
        .with_formula("var1")
        .with_bootstrap(15);
    let result = estimate_tir(&panel, &cfg).unwrap();
    let summary = result.bootstrap.as_ref().unwrap();
    assert_eq!(summary.n_resamples, 15);
    assert!(result.standard_error.unwrap() > 0.0);
}

#[test]
fn sequential_and_default_engines_agree() {
    let panel = informative_cohort(30, 8);
    let cfg = config().with_bootstrap(30);
    let default = Dispatcher::new(cfg.clone()).run(&panel).unwrap();
    let sequential = Dispatcher::new(cfg).with_engine(sequential()).run(&panel).unwrap();
    assert_eq!(
        default.bootstrap.unwrap().replicates,
        sequential.bootstrap.unwrap().replicates
    );
}

#[test]
fn subjects_outside_window_are_not_resampled() {
    // B is only observed after the window closes
    let panel = panel_from(&[("A", 0.0, 100.0), ("A", 5.0, 250.0), ("B", 500.0, 100.0)]);
    let window = TimeWindow::new(0.0, 100.0).unwrap();
    for method in [Method::Naive, Method::Proposed] {
        let cfg = config()
            .with_method(method)
            .with_window(window)
            .with_seed(1)
            .with_bootstrap(50);
        let result = estimate_tir(&panel, &cfg).unwrap();
        assert_eq!(result.estimate, 0.5);

        let summary = result.bootstrap.as_ref().unwrap();
        assert_eq!(summary.replicates.len(), 50);
        assert!(summary.replicates.iter().all(|&r| r == 0.5));
        assert_eq!(result.standard_error, Some(0.0));
        assert_eq!((result.lower, result.upper), (Some(0.5), Some(0.5)));
    }
}

#[test]
fn window_without_rows_is_an_empty_window_error() {
    let panel = panel_from(&[("A", 0.0, 100.0), ("B", 500.0, 100.0)]);
    let window = TimeWindow::new(1000.0, 2000.0).unwrap();
    for method in [Method::Naive, Method::Proposed] {
        let cfg = config().with_method(method).with_window(window).with_bootstrap(10);
        let err = estimate_tir(&panel, &cfg).unwrap_err();
        assert!(matches!(err, Error::EmptyWindow { .. }));
    }
}

#[test]
fn cancelled_run_stops() {
    let panel = informative_cohort(20, 10);
    let token = CancellationToken::new();
    token.cancel();
    let err = Dispatcher::new(config().with_bootstrap(50))
        .with_cancellation(token)
        .run(&panel)
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[test]
fn serialised_record_matches_expected_fields() {
    let panel = informative_cohort(20, 12);
    let point = serde_json::to_value(estimate_tir(&panel, &config()).unwrap().rounded(3)).unwrap();
    assert_eq!(point.as_object().unwrap().len(), 1);

    let boot = estimate_tir(&panel, &config().with_bootstrap(20)).unwrap().rounded(3);
    let json = serde_json::to_value(&boot).unwrap();
    assert_eq!(json["estimate"], serde_json::json!(boot.estimate));
    assert!(json.get("lower_2.5%").is_some());
    assert!(json.get("upper_97.5%").is_some());
    assert!(json.get("standard_error").is_some());
}
