//! Hazard-model interface consumed by the weighted estimator

use crate::baseline::BaselineHazard;
use tir_core::{Observation, Panel, Result};

/// A time-varying hazard model fitted on the counting-process rows of a panel
///
/// `fit` reads, per observation, the subject, the interval
/// `[time, interval_stop)`, the `event` flag and the covariates. Every call
/// must produce an independent fit; implementations hold configuration only.
pub trait HazardModel: Send + Sync {
    type Fitted: FittedHazard;

    fn fit(&self, panel: &Panel) -> Result<Self::Fitted>;
}

/// The outcome of a hazard fit
pub trait FittedHazard {
    /// Baseline cumulative hazard by time
    fn baseline_cumulative_hazard(&self) -> &BaselineHazard;

    /// Relative risk multiplier of one row
    fn predict_partial_hazard(&self, observation: &Observation) -> f64;
}

impl<M: HazardModel + ?Sized> HazardModel for &M {
    type Fitted = M::Fitted;

    fn fit(&self, panel: &Panel) -> Result<Self::Fitted> {
        (**self).fit(panel)
    }
}
