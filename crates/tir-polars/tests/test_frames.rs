//! DataFrame ingestion and estimation

mod common;

use approx::assert_relative_eq;
use common::{cohort_frame, extract_single_value};
use polars::prelude::*;
use tir_core::TargetRange;
use tir_polars::{ColumnNames, Error, Method, Model, TirConfig, TirFrameExt, LABEL_COLUMN};

fn glucose() -> TirConfig {
    TirConfig::new().with_range(TargetRange::STANDARD_GLUCOSE)
}

#[test]
fn test_column_overrides() -> anyhow::Result<()> {
    let df = df![
        "id" => [1i64, 1, 2],
        "minutes" => [0i32, 5, 0],
        "sgv" => [100.0, 250.0, 150.0],
    ]?;
    let columns = ColumnNames::new("id", "sgv", "minutes");
    let result = df.estimate_tir(&columns, &glucose().with_method(Method::Naive))?;
    assert_relative_eq!(result.estimate, (0.5 + 1.0) / 2.0);
    Ok(())
}

#[test]
fn test_non_numeric_value_column() {
    let df = df![
        "patient_id" => ["a"],
        "time" => [0.0],
        "glucose" => ["high"],
    ]
    .unwrap();
    let err = df.estimate_tir(&ColumnNames::default(), &glucose()).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_null_values_rejected() {
    let df = df![
        "patient_id" => ["a", "a"],
        "time" => [Some(0.0), None],
        "glucose" => [100.0, 110.0],
    ]
    .unwrap();
    let err = df.to_panel(&ColumnNames::default(), &[]).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_formula_selects_covariate_columns() -> anyhow::Result<()> {
    let df = cohort_frame(60, 3);
    let config = glucose().with_model(Model::Hazard).with_formula("var1");
    let weighted = df.estimate_tir(&ColumnNames::default(), &config)?;
    let proposed = df.estimate_tir(&ColumnNames::default(), &glucose())?;
    assert!(weighted.estimate < proposed.estimate);

    let missing = glucose().with_model(Model::Hazard).with_formula("age");
    assert!(matches!(
        df.estimate_tir(&ColumnNames::default(), &missing),
        Err(Error::InvalidColumn(name)) if name == "age"
    ));
    Ok(())
}

#[test]
fn test_bootstrap_summary_frame() -> anyhow::Result<()> {
    let df = cohort_frame(30, 5);
    let config = glucose().with_bootstrap(25).with_seed(1);
    let summary = df.tir_summary(&ColumnNames::default(), &config, 3)?;

    let names: Vec<&str> = summary
        .get_column_names()
        .into_iter()
        .map(|n| n.as_str())
        .collect();
    assert_eq!(
        names,
        vec![LABEL_COLUMN, "estimate", "standard_error", "lower_2.5%", "upper_97.5%"]
    );

    let estimate = extract_single_value(&summary, "estimate");
    let lower = extract_single_value(&summary, "lower_2.5%");
    let upper = extract_single_value(&summary, "upper_97.5%");
    assert!(lower <= estimate && estimate <= upper);
    assert_eq!((estimate * 1000.0).round() / 1000.0, estimate);
    Ok(())
}
