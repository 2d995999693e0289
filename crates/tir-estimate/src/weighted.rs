//! Time-in-range under informative censoring
//!
//! A hazard model fitted on the counting-process rows gives every row an
//! inverse-survival weight: rows of subjects who were likely to have dropped
//! out by that time stand in for the similar subjects who did. Per-time
//! means of the in-range indicator are weighted accordingly and then
//! averaged over time.

use crate::aggregate::TimePoints;
use tir_core::{
    Error, NumericWarning, Panel, PanelEstimator, PointEstimate, Result, TimeWindow,
};
use tir_hazard::{CoxTimeVaryingFitter, FittedHazard, Formula, HazardIncrements, HazardModel};
use tracing::{debug, instrument, warn};

/// Weights above this are reported as [`NumericWarning::ExtremeWeight`]
pub const EXTREME_WEIGHT: f64 = 1e6;

/// Inverse-survival weights of every row, grouped by subject in panel order
///
/// For each row the baseline hazard increment at the row's start time (zero
/// when the baseline has no entry at that time) is scaled by the row's
/// partial hazard. Contributions are summed over each subject's rows in time
/// order and the weight is the exponential of the running sum.
pub fn inverse_survival_weights<F>(panel: &Panel, fitted: &F) -> Result<Vec<Vec<f64>>>
where
    F: FittedHazard + ?Sized,
{
    let increments = HazardIncrements::from_baseline(fitted.baseline_cumulative_hazard());

    panel
        .subjects()
        .iter()
        .map(|subject| {
            let mut cumulative = 0.0;
            subject
                .observations()
                .iter()
                .map(|obs| {
                    cumulative += increments.increment_at(obs.time) * fitted.predict_partial_hazard(obs);
                    let weight = cumulative.exp();
                    if weight.is_finite() {
                        Ok(weight)
                    } else {
                        Err(Error::Computation(format!(
                            "Inverse-survival weight of subject '{}' at time {} is not finite",
                            subject.id(),
                            obs.time
                        )))
                    }
                })
                .collect()
        })
        .collect()
}

/// Hazard-weighted per-time in-range means, averaged over time
#[derive(Debug, Clone)]
pub struct InformativeWeightedEstimator<M> {
    model: M,
}

impl<M: HazardModel> InformativeWeightedEstimator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl InformativeWeightedEstimator<CoxTimeVaryingFitter> {
    /// Weighted estimator over a ridge-penalised time-varying Cox model
    pub fn cox(formula: Formula, penalizer: f64) -> Self {
        Self::new(CoxTimeVaryingFitter::new(formula).with_penalizer(penalizer))
    }
}

impl Default for InformativeWeightedEstimator<CoxTimeVaryingFitter> {
    fn default() -> Self {
        Self::new(CoxTimeVaryingFitter::default())
    }
}

impl<M: HazardModel> PanelEstimator for InformativeWeightedEstimator<M> {
    #[instrument(skip_all, fields(n_subjects = panel.n_subjects()))]
    fn estimate(&self, panel: &Panel, window: &TimeWindow) -> Result<PointEstimate> {
        panel.require_features()?;
        if !panel.observations().any(|(_, o)| window.contains(o.time)) {
            return Err(window.empty_error());
        }

        let fitted = self.model.fit(panel)?;
        let weights = inverse_survival_weights(panel, &fitted)?;

        let mut points = TimePoints::default();
        for (subject, subject_weights) in panel.subjects().iter().zip(&weights) {
            for (obs, &weight) in subject.observations().iter().zip(subject_weights) {
                if window.contains(obs.time) {
                    points.add(obs.time, obs.indicator(), weight);
                }
            }
        }

        let mut warnings = Vec::new();
        let mut total = 0.0;
        for (time, totals) in points.iter() {
            if !(totals.weight > 0.0) {
                return Err(Error::Computation(format!(
                    "Total weight at time {time} is {}",
                    totals.weight
                )));
            }
            let value = totals.weighted_in_range / totals.weight;
            if !(0.0..=1.0).contains(&value) {
                warnings.push(NumericWarning::WeightedMeanOutOfRange { time, value });
            }
            if totals.max_weight > EXTREME_WEIGHT {
                warnings.push(NumericWarning::ExtremeWeight {
                    time,
                    weight: totals.max_weight,
                });
            }
            total += value;
        }
        let value = total / points.len() as f64;

        for warning in &warnings {
            warn!(%warning, "Numeric degeneracy in weighted estimate");
        }
        debug!(n_time_points = points.len(), value, "Weighted estimate");

        Ok(PointEstimate::with_warnings(value, warnings))
    }

    fn name(&self) -> &'static str {
        "informative-weighted"
    }
}
