//! Core types for time-in-range estimation
//!
//! This crate provides the data model shared by every tir-stats crate:
//!
//! - [`Panel`], [`Subject`], [`Observation`] and the structured [`SubjectId`]
//! - [`TargetRange`] with the in-range indicator [`value_in_range`]
//! - [`TimeWindow`] restricting estimation
//! - [`derive_row_features`], which adds the in-range flag, the
//!   end-of-follow-up event flag and the interval stop time to every row
//! - the [`PanelEstimator`] strategy trait implemented by every estimator
//! - execution engines and a [`CancellationToken`] for batch work
//!
//! # Example
//!
//! ```rust
//! use tir_core::{derive_row_features, Panel, Record, TargetRange};
//!
//! let panel = Panel::from_records(
//!     Vec::new(),
//!     vec![
//!         Record::new("p1", 0.0, 95.0),
//!         Record::new("p1", 5.0, 210.0),
//!         Record::new("p2", 0.0, 150.0),
//!     ],
//! )?;
//! let panel = derive_row_features(&panel, TargetRange::STANDARD_GLUCOSE, 5.0)?;
//!
//! let last = panel.subjects()[0].observations().last().unwrap();
//! assert!(last.event && !last.in_range);
//! assert_eq!(last.interval_stop, 10.0);
//! # Ok::<(), tir_core::Error>(())
//! ```

pub mod cancel;
pub mod error;
pub mod execution;
pub mod features;
pub mod panel;
pub mod range;
pub mod traits;
pub mod utils;

// Re-export core types
pub use cancel::CancellationToken;
pub use error::{Error, Result};
pub use execution::{auto_engine, sequential, AutoEngine, ExecutionEngine, SequentialEngine};
#[cfg(feature = "parallel")]
pub use execution::{parallel, ParallelEngine};
pub use features::derive_row_features;
pub use panel::{FeatureSpec, Observation, Panel, Record, Subject, SubjectId};
pub use range::{value_in_range, TargetRange, TimeWindow};
pub use traits::{NumericWarning, PanelEstimator, PointEstimate};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        derive_row_features, CancellationToken, Error, ExecutionEngine, NumericWarning, Panel,
        PanelEstimator, PointEstimate, Record, Result, SubjectId, TargetRange, TimeWindow,
    };
}
