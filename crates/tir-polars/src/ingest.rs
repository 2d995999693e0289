//! Column extraction from DataFrames

use crate::{ColumnNames, Error, Result};
use polars::prelude::*;
use tir_core::{Panel, Record};
use tracing::debug;

/// Non-null `f64` values of a numeric column
pub(crate) fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| Error::InvalidColumn(name.to_string()))?;

    let float_column = match column.dtype() {
        DataType::Float64 => column.clone(),
        DataType::Float32
        | DataType::Int64
        | DataType::Int32
        | DataType::Int16
        | DataType::Int8
        | DataType::UInt64
        | DataType::UInt32
        | DataType::UInt16
        | DataType::UInt8 => column.cast(&DataType::Float64)?,
        dt => {
            return Err(Error::TypeMismatch {
                column: name.to_string(),
                expected: "numeric".to_string(),
                got: format!("{:?}", dt),
            });
        }
    };

    float_column
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                Error::InvalidInput(format!("Column '{name}' has a null at row {row}"))
            })
        })
        .collect()
}

/// Subject labels of a string or integer column
pub(crate) fn subject_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .map_err(|_| Error::InvalidColumn(name.to_string()))?;

    let labels = match column.dtype() {
        DataType::String => column.clone(),
        DataType::Int64
        | DataType::Int32
        | DataType::Int16
        | DataType::Int8
        | DataType::UInt64
        | DataType::UInt32
        | DataType::UInt16
        | DataType::UInt8 => column.cast(&DataType::String)?,
        dt => {
            return Err(Error::TypeMismatch {
                column: name.to_string(),
                expected: "string or integer".to_string(),
                got: format!("{:?}", dt),
            });
        }
    };

    labels
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, label)| {
            label.map(str::to_string).ok_or_else(|| {
                Error::InvalidInput(format!("Column '{name}' has a null at row {row}"))
            })
        })
        .collect()
}

/// Build a panel from long-format rows
pub(crate) fn frame_to_panel(
    df: &DataFrame,
    columns: &ColumnNames,
    covariates: &[&str],
) -> Result<Panel> {
    let subjects = subject_column(df, &columns.subject)?;
    let times = numeric_column(df, &columns.time)?;
    let values = numeric_column(df, &columns.value)?;
    let covariate_values = covariates
        .iter()
        .map(|name| numeric_column(df, name))
        .collect::<Result<Vec<_>>>()?;

    let records = subjects
        .into_iter()
        .zip(times)
        .zip(values)
        .enumerate()
        .map(|(row, ((subject, time), value))| {
            Record::new(subject, time, value)
                .with_covariates(covariate_values.iter().map(|c| c[row]).collect())
        });

    let names = covariates.iter().map(|c| c.to_string()).collect();
    let panel = Panel::from_records(names, records)?;
    debug!(
        n_rows = df.height(),
        n_subjects = panel.n_subjects(),
        "Ingested panel"
    );
    Ok(panel)
}
