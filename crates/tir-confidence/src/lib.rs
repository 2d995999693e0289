//! Cluster bootstrap confidence intervals for time-in-range estimators
//!
//! [`ClusterBootstrap`] wraps any [`tir_core::PanelEstimator`]: it resamples
//! whole subjects with replacement, re-runs the estimator on every resample
//! and summarises the replicates as a standard error and a percentile
//! interval.
//!
//! # Example
//!
//! ```rust
//! use tir_confidence::{ClusterBootstrap, PercentileBootstrap};
//! use tir_core::{sequential, utils, Panel, PanelEstimator, PointEstimate, Record, Result, TimeWindow};
//!
//! struct MeanValue;
//!
//! impl PanelEstimator for MeanValue {
//!     fn estimate(&self, panel: &Panel, _window: &TimeWindow) -> Result<PointEstimate> {
//!         let values: Vec<f64> = panel.observations().map(|(_, o)| o.value).collect();
//!         Ok(PointEstimate::new(utils::mean(&values)))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "mean"
//!     }
//! }
//!
//! let records = (0..10).map(|i| Record::new(format!("s{i}"), 0.0, i as f64));
//! let panel = Panel::from_records(Vec::new(), records)?;
//!
//! let result = ClusterBootstrap::new(sequential(), PercentileBootstrap)
//!     .with_resamples(200)
//!     .with_seed(1)
//!     .run(&MeanValue, &panel, &TimeWindow::default())?;
//!
//! assert_eq!(result.estimate.value, 4.5);
//! assert!(result.interval.lower < 4.5 && 4.5 < result.interval.upper);
//! # Ok::<(), tir_core::Error>(())
//! ```

pub mod bootstrap;
pub mod bootstrap_methods;
pub mod resample;
pub mod types;

pub use bootstrap::{BootstrapResult, ClusterBootstrap};
pub use bootstrap_methods::{BootstrapMethod, PercentileBootstrap};
pub use resample::{cluster_resample, draw_subject_indices};
pub use types::{ConfidenceInterval, ConfidenceLevel};
