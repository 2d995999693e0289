//! Estimation settings

use crate::dispatch::{Method, Model};
use serde::{Deserialize, Serialize};
use tir_confidence::ConfidenceLevel;
use tir_core::{Error, Result, TargetRange, TimeWindow};
use tir_hazard::CoxTimeVaryingFitter;

/// Settings of one time-in-range estimation
///
/// Defaults: the non-informative estimator (`proposed` with no model) over
/// the first week, unbounded range, no bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TirConfig {
    method: Method,
    model: Model,
    window: TimeWindow,
    range: TargetRange,
    bootstrap: Option<usize>,
    confidence_level: ConfidenceLevel,
    period: f64,
    formula: String,
    penalizer: f64,
    seed: Option<u64>,
}

impl Default for TirConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            model: Model::default(),
            window: TimeWindow::default(),
            range: TargetRange::unbounded(),
            bootstrap: None,
            confidence_level: ConfidenceLevel::NINETY_FIVE,
            period: 5.0,
            formula: String::new(),
            penalizer: CoxTimeVaryingFitter::DEFAULT_PENALIZER,
            seed: None,
        }
    }
}

impl TirConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_range(mut self, range: TargetRange) -> Self {
        self.range = range;
        self
    }

    /// Bootstrap with `n_resamples` replicates
    pub fn with_bootstrap(mut self, n_resamples: usize) -> Self {
        self.bootstrap = Some(n_resamples);
        self
    }

    pub fn without_bootstrap(mut self) -> Self {
        self.bootstrap = None;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: ConfidenceLevel) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Sampling period added to each row's time to close its interval
    pub fn with_period(mut self, period: f64) -> Self {
        self.period = period;
        self
    }

    /// Hazard-model covariates, e.g. `"age + hba1c"`
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    pub fn with_penalizer(mut self, penalizer: f64) -> Self {
        self.penalizer = penalizer;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn range(&self) -> &TargetRange {
        &self.range
    }

    pub fn bootstrap(&self) -> Option<usize> {
        self.bootstrap
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn penalizer(&self) -> f64 {
        self.penalizer
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Reject settings no estimator can run with
    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.bootstrap {
            if n < 2 {
                return Err(Error::InsufficientData {
                    expected: 2,
                    actual: n,
                });
            }
        }
        if !self.period.is_finite() || self.period <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Sampling period must be positive and finite, got {}",
                self.period
            )));
        }
        if !self.penalizer.is_finite() || self.penalizer < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Penalizer must be finite and non-negative, got {}",
                self.penalizer
            )));
        }
        // Deserialised windows and ranges bypass their constructors
        TimeWindow::new(self.window.min_time(), self.window.max_time())?;
        TargetRange::from_bounds(self.range.lower(), self.range.upper())?;
        Ok(())
    }
}
