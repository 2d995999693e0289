//! Bootstrap interval methods
//!
//! Methods turn a bootstrap distribution into a confidence interval around
//! the original estimate.

use crate::{ConfidenceInterval, ConfidenceLevel};
use tir_core::utils::{quantile_sorted, sorted};
use tir_core::{Error, Result};

/// Bootstrap method for calculating confidence intervals
///
/// This trait defines how to construct a confidence interval from
/// bootstrap estimates.
pub trait BootstrapMethod: Clone + Send + Sync {
    /// Calculate confidence interval from bootstrap distribution
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval>;

    /// Method name for documentation
    fn name(&self) -> &'static str;
}

/// Percentile bootstrap method
///
/// Uses the empirical percentiles of the bootstrap distribution, linearly
/// interpolated between order statistics, as interval endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval> {
        if bootstrap_estimates.is_empty() {
            return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
        }
        if bootstrap_estimates.iter().any(|x| !x.is_finite()) {
            return Err(Error::non_finite("bootstrap estimates"));
        }

        let sorted = sorted(bootstrap_estimates);
        let tail = confidence_level.tail_probability();

        Ok(ConfidenceInterval::new(
            quantile_sorted(&sorted, tail),
            quantile_sorted(&sorted, 1.0 - tail),
            original_estimate,
            confidence_level.value(),
        ))
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}
