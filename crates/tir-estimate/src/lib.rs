//! Time-in-range estimators
//!
//! Three estimators of the fraction of observation time a monitored value
//! spends inside a target range, for panels whose subjects are followed for
//! different lengths of time:
//!
//! - [`NaiveEstimator`]: mean of per-subject in-range fractions;
//! - [`NonInformativeEstimator`]: mean over time points of the in-range
//!   fraction among subjects still observed;
//! - [`InformativeWeightedEstimator`]: the same, with rows weighted by the
//!   inverse survival implied by a hazard model of dropout.
//!
//! [`estimate_tir`] selects one from a [`TirConfig`], derives row features
//! and optionally bootstraps the estimate over subjects.
//!
//! # Example
//!
//! ```rust
//! use tir_core::{Panel, Record, TargetRange};
//! use tir_estimate::{estimate_tir, Method, TirConfig};
//!
//! let panel = Panel::from_records(
//!     Vec::new(),
//!     vec![
//!         Record::new("a", 0.0, 100.0),
//!         Record::new("a", 5.0, 120.0),
//!         Record::new("a", 10.0, 140.0),
//!         Record::new("b", 0.0, 220.0),
//!     ],
//! )?;
//!
//! let config = TirConfig::new().with_range(TargetRange::STANDARD_GLUCOSE);
//! let proposed = estimate_tir(&panel, &config)?;
//! let naive = estimate_tir(&panel, &config.with_method(Method::Naive))?;
//!
//! assert!((proposed.estimate - 2.5 / 3.0).abs() < 1e-12);
//! assert_eq!(naive.estimate, 0.5);
//! # Ok::<(), tir_core::Error>(())
//! ```

mod aggregate;
pub mod config;
pub mod dispatch;
pub mod naive;
pub mod noninformative;
pub mod result;
pub mod weighted;

pub use config::TirConfig;
pub use tir_confidence::ConfidenceLevel;
pub use dispatch::{
    estimate_tir, estimate_tir_with_model, Dispatcher, EstimatorKind, Method, Model,
};
pub use naive::NaiveEstimator;
pub use noninformative::NonInformativeEstimator;
pub use result::{round_to, TirResult, RESULT_LABEL};
pub use weighted::{inverse_survival_weights, InformativeWeightedEstimator, EXTREME_WEIGHT};
