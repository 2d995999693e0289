//! Baseline cumulative hazard and hazard-increment tables

use ordered_float::OrderedFloat;
use tir_core::{Error, Result};

/// Baseline cumulative hazard at strictly increasing times
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineHazard {
    points: Vec<(f64, f64)>,
}

impl BaselineHazard {
    /// Build from `(time, cumulative hazard)` pairs in any order
    pub fn new(mut points: Vec<(f64, f64)>) -> Result<Self> {
        if points
            .iter()
            .any(|&(t, h)| !t.is_finite() || !h.is_finite())
        {
            return Err(Error::non_finite("baseline cumulative hazard"));
        }
        points.sort_by_key(|&(t, _)| OrderedFloat(t));
        if points
            .windows(2)
            .any(|w| OrderedFloat(w[0].0) == OrderedFloat(w[1].0))
        {
            return Err(Error::InvalidInput(
                "Baseline cumulative hazard has duplicate times".to_string(),
            ));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// First differences of a baseline cumulative hazard
///
/// The increment at the earliest time is the baseline value itself, since
/// there is nothing before it to subtract.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardIncrements {
    increments: Vec<(f64, f64)>,
}

impl HazardIncrements {
    pub fn from_baseline(baseline: &BaselineHazard) -> Self {
        let mut previous: Option<f64> = None;
        let increments = baseline
            .points()
            .iter()
            .map(|&(t, h)| {
                let diff = previous.map_or(h, |p| h - p);
                previous = Some(h);
                (t, diff)
            })
            .collect();
        Self { increments }
    }

    pub fn increments(&self) -> &[(f64, f64)] {
        &self.increments
    }

    /// Increment at exactly `time`, or 0 when the table has no such time
    pub fn increment_at(&self, time: f64) -> f64 {
        self.lookup(time).unwrap_or(0.0)
    }

    /// Increment at exactly `time`, if present
    pub fn lookup(&self, time: f64) -> Option<f64> {
        self.increments
            .binary_search_by_key(&OrderedFloat(time), |&(t, _)| OrderedFloat(t))
            .ok()
            .map(|i| self.increments[i].1)
    }
}
