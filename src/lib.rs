//! Time-in-range estimation for irregularly sampled longitudinal panels
//!
//! Facade over the workspace crates:
//!
//! - [`tir_core`]: panel data model, range indicator, row features, engines
//! - [`tir_hazard`]: hazard-model interface and the time-varying Cox fitter
//! - [`tir_confidence`]: cluster bootstrap and percentile intervals
//! - [`tir_estimate`]: the estimators, configuration and dispatcher
//! - `tir_polars` (feature `polars`): DataFrame ingestion and result frames

pub use tir_confidence;
pub use tir_core;
pub use tir_estimate;
pub use tir_hazard;
#[cfg(feature = "polars")]
pub use tir_polars;

pub use tir_core::{Error, Panel, Record, Result, TargetRange, TimeWindow};
pub use tir_estimate::{
    estimate_tir, estimate_tir_with_model, ConfidenceLevel, Dispatcher, EstimatorKind, Method,
    Model, TirConfig, TirResult,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use tir_core::prelude::*;
    pub use tir_estimate::{estimate_tir, ConfidenceLevel, Method, Model, TirConfig, TirResult};
    pub use tir_hazard::{CoxTimeVaryingFitter, Formula, HazardModel};
}
