//! Hazard models for inverse-survival weighting
//!
//! The weighted time-in-range estimator needs, per observation, a partial
//! hazard and the baseline cumulative hazard of a model fitted on the
//! panel's counting-process rows. [`HazardModel`] is that seam;
//! [`CoxTimeVaryingFitter`] is the bundled implementation.

pub mod baseline;
pub mod cox;
pub mod formula;
pub mod traits;

pub use baseline::{BaselineHazard, HazardIncrements};
pub use cox::{CoxFit, CoxTimeVaryingFitter};
pub use formula::Formula;
pub use traits::{FittedHazard, HazardModel};
