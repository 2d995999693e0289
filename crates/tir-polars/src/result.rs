//! Result records as DataFrames

use crate::Result;
use polars::prelude::*;
use tir_estimate::{TirResult, RESULT_LABEL};

/// Name of the row-label column in result frames
pub const LABEL_COLUMN: &str = "label";

/// One-row frame labelled `TIR`, numbers rounded to `decimals` places
///
/// Columns are `label`, `estimate` and, for bootstrapped results,
/// `standard_error` and the two interval endpoints.
pub fn result_frame(result: &TirResult, decimals: u32) -> Result<DataFrame> {
    let rounded = result.rounded(decimals);

    let mut columns: Vec<Column> = vec![Series::new(LABEL_COLUMN.into(), vec![RESULT_LABEL]).into()];
    for (name, value) in rounded.columns() {
        columns.push(Series::new(name.as_str().into(), vec![value]).into());
    }

    Ok(DataFrame::new(columns)?)
}
