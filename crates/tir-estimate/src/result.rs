//! Estimation result record

use serde::{Deserialize, Serialize};
use std::fmt;
use tir_confidence::BootstrapResult;
use tir_core::{NumericWarning, PointEstimate};

/// Row label used when a result is rendered as a table
pub const RESULT_LABEL: &str = "TIR";

/// Time-in-range estimate with optional bootstrap summary
///
/// Serialises as `estimate`, `standard_error`, `lower_2.5%` and
/// `upper_97.5%`; the last three are omitted without a bootstrap. The field
/// names are fixed, whatever confidence level produced the interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TirResult {
    pub estimate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_error: Option<f64>,
    #[serde(rename = "lower_2.5%", default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(rename = "upper_97.5%", default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<NumericWarning>,
    /// Replicates and timings of the bootstrap run
    #[serde(skip)]
    pub bootstrap: Option<BootstrapResult>,
}

impl TirResult {
    pub fn from_point(point: PointEstimate) -> Self {
        Self {
            estimate: point.value,
            standard_error: None,
            lower: None,
            upper: None,
            warnings: point.warnings,
            bootstrap: None,
        }
    }

    pub fn from_bootstrap(result: BootstrapResult) -> Self {
        Self {
            estimate: result.estimate.value,
            standard_error: Some(result.standard_error),
            lower: Some(result.interval.lower),
            upper: Some(result.interval.upper),
            warnings: result.estimate.warnings.clone(),
            bootstrap: Some(result),
        }
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.standard_error.is_some()
    }

    /// Copy with every reported number rounded to `decimals` places
    pub fn rounded(&self, decimals: u32) -> Self {
        let round = |x: f64| round_to(x, decimals);
        Self {
            estimate: round(self.estimate),
            standard_error: self.standard_error.map(round),
            lower: self.lower.map(round),
            upper: self.upper.map(round),
            warnings: self.warnings.clone(),
            bootstrap: self.bootstrap.clone(),
        }
    }

    /// Reported `(column, value)` pairs in display order
    ///
    /// Interval columns are labelled with the percentiles of the confidence
    /// level actually used.
    pub fn columns(&self) -> Vec<(String, f64)> {
        let mut columns = vec![("estimate".to_string(), self.estimate)];
        if let Some(se) = self.standard_error {
            columns.push(("standard_error".to_string(), se));
        }
        let (lower_label, upper_label) = match &self.bootstrap {
            Some(result) => result.interval.tail_labels(),
            None => ("2.5%".to_string(), "97.5%".to_string()),
        };
        if let Some(lower) = self.lower {
            columns.push((format!("lower_{lower_label}"), lower));
        }
        if let Some(upper) = self.upper {
            columns.push((format!("upper_{upper_label}"), upper));
        }
        columns
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = (x * scale).round() / scale;
    if scaled.is_finite() {
        scaled
    } else {
        x
    }
}

impl fmt::Display for TirResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<(String, String)> = self
            .columns()
            .into_iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        let widths: Vec<usize> = cells
            .iter()
            .map(|(name, value)| name.len().max(value.len()))
            .collect();

        write!(f, "{:width$}", "", width = RESULT_LABEL.len())?;
        for ((name, _), width) in cells.iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }
        writeln!(f)?;
        write!(f, "{RESULT_LABEL}")?;
        for ((_, value), width) in cells.iter().zip(&widths) {
            write!(f, "  {value:>width$}")?;
        }
        Ok(())
    }
}
