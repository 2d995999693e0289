//! Per-time-point aggregation shared by the time-averaged estimators

use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// Weighted in-range totals keyed by observation time
#[derive(Debug, Default)]
pub(crate) struct TimePoints {
    by_time: BTreeMap<OrderedFloat<f64>, Totals>,
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Totals {
    pub weighted_in_range: f64,
    pub weight: f64,
    pub max_weight: f64,
}

impl TimePoints {
    pub fn add(&mut self, time: f64, indicator: f64, weight: f64) {
        let totals = self.by_time.entry(OrderedFloat(time)).or_default();
        totals.weighted_in_range += weight * indicator;
        totals.weight += weight;
        totals.max_weight = totals.max_weight.max(weight);
    }

    pub fn len(&self) -> usize {
        self.by_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }

    /// Distinct times in increasing order with their totals
    pub fn iter(&self) -> impl Iterator<Item = (f64, &Totals)> {
        self.by_time.iter().map(|(t, totals)| (t.0, totals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_exact_time() {
        let mut points = TimePoints::default();
        points.add(10.0, 1.0, 1.0);
        points.add(5.0, 0.0, 2.0);
        points.add(10.0, 0.0, 3.0);

        let collected: Vec<(f64, f64, f64)> = points
            .iter()
            .map(|(t, totals)| (t, totals.weighted_in_range, totals.weight))
            .collect();
        assert_eq!(collected, vec![(5.0, 0.0, 2.0), (10.0, 1.0, 4.0)]);
        assert_eq!(points.len(), 2);
    }
}
