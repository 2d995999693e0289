//! Naive time-in-range: average of per-subject in-range fractions

use tir_core::utils::mean;
use tir_core::{Observation, Panel, PanelEstimator, PointEstimate, Result, TimeWindow};
use tracing::{debug, instrument};

/// Mean over subjects of each subject's in-range fraction inside the window
///
/// Every subject weighs the same regardless of how long it was followed.
/// Subjects with no rows inside the window do not contribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveEstimator;

impl NaiveEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl PanelEstimator for NaiveEstimator {
    #[instrument(skip_all, fields(n_subjects = panel.n_subjects()))]
    fn estimate(&self, panel: &Panel, window: &TimeWindow) -> Result<PointEstimate> {
        panel.require_features()?;

        let per_subject: Vec<f64> = panel
            .subjects()
            .iter()
            .filter_map(|subject| {
                let inside: Vec<f64> = subject
                    .observations()
                    .iter()
                    .filter(|o| window.contains(o.time))
                    .map(Observation::indicator)
                    .collect();
                (!inside.is_empty()).then(|| mean(&inside))
            })
            .collect();

        if per_subject.is_empty() {
            return Err(window.empty_error());
        }

        let value = mean(&per_subject);
        debug!(n_contributing = per_subject.len(), value, "Naive estimate");
        Ok(PointEstimate::new(value))
    }

    fn name(&self) -> &'static str {
        "naive"
    }
}
