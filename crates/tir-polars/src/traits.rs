//! Extension trait for time-in-range estimation on Polars DataFrames

use crate::ingest::frame_to_panel;
use crate::result::result_frame;
use crate::{ColumnNames, Result};
use polars::prelude::*;
use tir_core::Panel;
use tir_estimate::{estimate_tir, TirConfig, TirResult};
use tir_hazard::Formula;

/// Time-in-range operations on long-format DataFrames
///
/// Each row is one observation: a subject id, a time and a value, plus any
/// covariate columns the hazard model formula names.
pub trait TirFrameExt {
    /// Group rows into a panel
    ///
    /// # Arguments
    /// * `columns` - Subject, value and time column names
    /// * `covariates` - Numeric covariate columns to carry on every row
    fn to_panel(&self, columns: &ColumnNames, covariates: &[&str]) -> Result<Panel>;

    /// Estimate time in range as `config` describes
    ///
    /// Covariates are the columns named by the configured formula.
    fn estimate_tir(&self, columns: &ColumnNames, config: &TirConfig) -> Result<TirResult>;

    /// Estimate and render the result as a one-row frame
    ///
    /// # Returns
    /// DataFrame with a `label` column (`TIR`) and one column per reported
    /// number, rounded to `decimals` places
    fn tir_summary(
        &self,
        columns: &ColumnNames,
        config: &TirConfig,
        decimals: u32,
    ) -> Result<DataFrame>;
}

impl TirFrameExt for DataFrame {
    fn to_panel(&self, columns: &ColumnNames, covariates: &[&str]) -> Result<Panel> {
        frame_to_panel(self, columns, covariates)
    }

    fn estimate_tir(&self, columns: &ColumnNames, config: &TirConfig) -> Result<TirResult> {
        let formula = Formula::parse(config.formula())?;
        let covariates: Vec<&str> = formula.terms().iter().map(String::as_str).collect();
        let panel = self.to_panel(columns, &covariates)?;
        Ok(estimate_tir(&panel, config)?)
    }

    fn tir_summary(
        &self,
        columns: &ColumnNames,
        config: &TirConfig,
        decimals: u32,
    ) -> Result<DataFrame> {
        let result = self.estimate_tir(columns, config)?;
        result_frame(&result, decimals)
    }
}
