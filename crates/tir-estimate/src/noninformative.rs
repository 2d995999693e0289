//! Time-in-range under non-informative censoring

use crate::aggregate::TimePoints;
use tir_core::{Panel, PanelEstimator, PointEstimate, Result, TimeWindow};
use tracing::{debug, instrument};

/// Mean over distinct times of the in-range fraction among subjects observed
/// at that time
///
/// Valid when dropout is unrelated to the monitored quantity: each time
/// point is summarised by whoever is still observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInformativeEstimator;

impl NonInformativeEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl PanelEstimator for NonInformativeEstimator {
    #[instrument(skip_all, fields(n_subjects = panel.n_subjects()))]
    fn estimate(&self, panel: &Panel, window: &TimeWindow) -> Result<PointEstimate> {
        panel.require_features()?;

        let mut points = TimePoints::default();
        for (_, obs) in panel.observations().filter(|(_, o)| window.contains(o.time)) {
            points.add(obs.time, obs.indicator(), 1.0);
        }
        if points.is_empty() {
            return Err(window.empty_error());
        }

        let total: f64 = points
            .iter()
            .map(|(_, totals)| totals.weighted_in_range / totals.weight)
            .sum();
        let value = total / points.len() as f64;

        debug!(n_time_points = points.len(), value, "Non-informative estimate");
        Ok(PointEstimate::new(value))
    }

    fn name(&self) -> &'static str {
        "non-informative"
    }
}
