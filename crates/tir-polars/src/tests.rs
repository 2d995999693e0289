use crate::*;
use polars::prelude::*;
use tir_core::TargetRange;

fn frame() -> DataFrame {
    df![
        "patient_id" => ["a", "a", "a", "b", "b"],
        "time" => [0.0, 5.0, 10.0, 0.0, 5.0],
        "glucose" => [100.0, 120.0, 150.0, 200.0, 60.0],
    ]
    .unwrap()
}

#[test]
fn test_to_panel_groups_rows() {
    let panel = frame().to_panel(&ColumnNames::default(), &[]).unwrap();
    assert_eq!(panel.n_subjects(), 2);
    assert_eq!(panel.n_observations(), 5);
    assert_eq!(panel.subjects()[0].id().label(), "a");
}

#[test]
fn test_naive_through_frame() {
    let config = TirConfig::new()
        .with_method(Method::Naive)
        .with_range(TargetRange::STANDARD_GLUCOSE);
    let result = frame().estimate_tir(&ColumnNames::default(), &config).unwrap();
    assert!((result.estimate - 0.5).abs() < 1e-12);
}

#[test]
fn test_result_frame_layout() {
    let result = TirResult {
        estimate: 0.72345,
        standard_error: None,
        lower: None,
        upper: None,
        warnings: Vec::new(),
        bootstrap: None,
    };
    let df = result_frame(&result, 2).unwrap();
    assert_eq!(df.shape(), (1, 2));
    assert_eq!(df.column(LABEL_COLUMN).unwrap().str().unwrap().get(0), Some("TIR"));
    assert_eq!(df.column("estimate").unwrap().f64().unwrap().get(0), Some(0.72));
}

#[test]
fn test_missing_column() {
    let err = frame()
        .to_panel(&ColumnNames::default().with_value("sgv"), &[])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidColumn(name) if name == "sgv"));
}
