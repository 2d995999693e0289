//! Target ranges, estimation windows and the in-range indicator

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed target interval `[lo, hi]`
///
/// A missing bound is unbounded on that side, so the default range accepts
/// every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetRange {
    lower: Option<f64>,
    upper: Option<f64>,
}

impl TargetRange {
    /// The conventional glucose target range, 70–180 mg/dL
    pub const STANDARD_GLUCOSE: Self = Self {
        lower: Some(70.0),
        upper: Some(180.0),
    };

    /// Create a range with both bounds inclusive
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        Self::from_bounds(Some(lower), Some(upper))
    }

    /// Create a range where `None` leaves that side open
    pub fn from_bounds(lower: Option<f64>, upper: Option<f64>) -> Result<Self> {
        if lower.is_some_and(f64::is_nan) || upper.is_some_and(f64::is_nan) {
            return Err(Error::InvalidParameter(
                "Range bounds must not be NaN".to_string(),
            ));
        }
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo > hi {
                return Err(Error::InvalidParameter(format!(
                    "Range lower bound {lo} exceeds upper bound {hi}"
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// The range that contains every value
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Check membership, both bounds inclusive. NaN is never in range.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        if x.is_nan() {
            return false;
        }
        self.lower.map_or(true, |lo| lo <= x) && self.upper.map_or(true, |hi| x <= hi)
    }
}

impl fmt::Display for TargetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(lo), Some(hi)) => write!(f, "[{lo}, {hi}]"),
            (Some(lo), None) => write!(f, "[{lo}, +inf)"),
            (None, Some(hi)) => write!(f, "(-inf, {hi}]"),
            (None, None) => write!(f, "(-inf, +inf)"),
        }
    }
}

/// In-range indicator: 1 if `range` contains `x`, else 0
#[inline]
pub fn value_in_range(x: f64, range: &TargetRange) -> u8 {
    u8::from(range.contains(x))
}

/// Inclusive time window `[min_time, max_time]` restricting estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    min_time: f64,
    max_time: f64,
}

impl TimeWindow {
    /// One week in minutes, less one 5-minute sampling period
    pub const DEFAULT_MAX_TIME: f64 = 1440.0 * 7.0 - 5.0;

    pub fn new(min_time: f64, max_time: f64) -> Result<Self> {
        if !min_time.is_finite() || !max_time.is_finite() {
            return Err(Error::InvalidParameter(
                "Time window bounds must be finite".to_string(),
            ));
        }
        if min_time > max_time {
            return Err(Error::InvalidParameter(format!(
                "Time window start {min_time} exceeds end {max_time}"
            )));
        }
        Ok(Self { min_time, max_time })
    }

    pub fn min_time(&self) -> f64 {
        self.min_time
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        self.min_time <= time && time <= self.max_time
    }

    /// Error value reported when no observation falls in this window
    pub fn empty_error(&self) -> Error {
        Error::EmptyWindow {
            min_time: self.min_time,
            max_time: self.max_time,
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            min_time: 0.0,
            max_time: Self::DEFAULT_MAX_TIME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let range = TargetRange::new(70.0, 180.0).unwrap();
        assert_eq!(value_in_range(70.0, &range), 1);
        assert_eq!(value_in_range(180.0, &range), 1);
        assert_eq!(value_in_range(125.0, &range), 1);
        assert_eq!(value_in_range(69.999, &range), 0);
        assert_eq!(value_in_range(180.001, &range), 0);
    }

    #[test]
    fn test_default_range_is_unbounded() {
        let range = TargetRange::default();
        assert_eq!(range, TargetRange::unbounded());
        assert_eq!(value_in_range(-1e300, &range), 1);
        assert_eq!(value_in_range(1e300, &range), 1);
        assert_eq!(value_in_range(f64::NAN, &range), 0);
    }

    #[test]
    fn test_half_open_ranges() {
        let above = TargetRange::from_bounds(Some(3.9), None).unwrap();
        assert!(above.contains(3.9));
        assert!(above.contains(1e9));
        assert!(!above.contains(3.8));
        assert_eq!(above.to_string(), "[3.9, +inf)");
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(TargetRange::new(180.0, 70.0).is_err());
        assert!(TargetRange::new(f64::NAN, 70.0).is_err());
        // A degenerate single-point range is allowed
        let point = TargetRange::new(5.0, 5.0).unwrap();
        assert!(point.contains(5.0));
    }

    #[test]
    fn test_time_window() {
        let window = TimeWindow::default();
        assert_eq!(window.min_time(), 0.0);
        assert_eq!(window.max_time(), 10075.0);
        assert!(window.contains(0.0));
        assert!(window.contains(10075.0));
        assert!(!window.contains(10080.0));

        assert!(TimeWindow::new(10.0, 5.0).is_err());
        assert!(TimeWindow::new(0.0, f64::INFINITY).is_err());
    }

    proptest! {
        #[test]
        fn indicator_matches_definition(
            x in -1e6f64..1e6,
            a in -1e6f64..1e6,
            b in -1e6f64..1e6,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let range = TargetRange::new(lo, hi).unwrap();
            let expected = u8::from(lo <= x && x <= hi);
            prop_assert_eq!(value_in_range(x, &range), expected);
            prop_assert_eq!(value_in_range(lo, &range), 1);
            prop_assert_eq!(value_in_range(hi, &range), 1);
        }
    }
}
