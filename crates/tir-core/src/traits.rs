//! Estimator strategy trait and point-estimate diagnostics

use crate::panel::Panel;
use crate::range::TimeWindow;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A time-in-range point estimator over a featured panel
///
/// Implementations must not mutate shared state: the bootstrap calls
/// `estimate` once per replicate, possibly from several threads.
pub trait PanelEstimator: Send + Sync {
    /// Estimate time in range within `window`
    fn estimate(&self, panel: &Panel, window: &TimeWindow) -> Result<PointEstimate>;

    /// Estimator name for logs and reports
    fn name(&self) -> &'static str;
}

impl<E: PanelEstimator + ?Sized> PanelEstimator for &E {
    fn estimate(&self, panel: &Panel, window: &TimeWindow) -> Result<PointEstimate> {
        (**self).estimate(panel, window)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Non-fatal numeric-degeneracy findings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericWarning {
    /// A weighted per-time mean fell outside `[0, 1]`
    WeightedMeanOutOfRange { time: f64, value: f64 },
    /// A weight exceeded the extreme-weight threshold
    ExtremeWeight { time: f64, weight: f64 },
}

impl fmt::Display for NumericWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightedMeanOutOfRange { time, value } => {
                write!(f, "weighted in-range mean {value} at time {time} is outside [0, 1]")
            }
            Self::ExtremeWeight { time, weight } => {
                write!(f, "extreme inverse-survival weight {weight:.3e} at time {time}")
            }
        }
    }
}

/// A point estimate with any degeneracy warnings raised while computing it
#[derive(Debug, Clone, PartialEq)]
pub struct PointEstimate {
    pub value: f64,
    pub warnings: Vec<NumericWarning>,
}

impl PointEstimate {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: f64, warnings: Vec<NumericWarning>) -> Self {
        Self { value, warnings }
    }

    pub fn is_degenerate(&self) -> bool {
        !self.warnings.is_empty()
    }
}
