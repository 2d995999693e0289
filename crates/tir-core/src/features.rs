//! Row feature derivation
//!
//! Adds the in-range indicator, the end-of-follow-up event flag and the
//! interval stop time to every observation of a panel.

use crate::panel::{FeatureSpec, Panel, Subject};
use crate::range::TargetRange;
use crate::{Error, Result};
use tracing::{debug, instrument};

/// Derive `in_range`, `event` and `interval_stop` for every row
///
/// The first row attaining a subject's maximum time is its event row; every
/// other row is not. `interval_stop = time + period`.
#[instrument(skip(panel), fields(n_subjects = panel.n_subjects()))]
pub fn derive_row_features(panel: &Panel, range: TargetRange, period: f64) -> Result<Panel> {
    if !period.is_finite() || period <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "Sampling period must be positive and finite, got {period}"
        )));
    }

    let subjects = panel
        .subjects()
        .iter()
        .map(|subject| derive_subject(subject, &range, period))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        n_observations = panel.n_observations(),
        "Derived row features with range {range}"
    );

    Ok(panel.with_features(subjects, FeatureSpec { range, period }))
}

fn derive_subject(subject: &Subject, range: &TargetRange, period: f64) -> Result<Subject> {
    let rows = subject.observations();
    let last = rows
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, obs)| match best {
            Some((_, t)) if obs.time <= t => best,
            _ => Some((i, obs.time)),
        })
        .map(|(i, _)| i)
        .ok_or_else(|| Error::EmptySubject(subject.id().to_string()))?;

    let observations = rows
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let mut row = obs.clone();
            row.in_range = range.contains(obs.value);
            row.event = i == last;
            row.interval_stop = obs.time + period;
            row
        })
        .collect();

    Ok(subject.with_observations(observations))
}
