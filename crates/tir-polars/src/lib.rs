//! Polars integration for time-in-range estimation
//!
//! This crate reads long-format glucose-style DataFrames into panels and
//! runs the configured estimator through a single extension trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use polars::prelude::*;
//! use tir_core::TargetRange;
//! use tir_estimate::TirConfig;
//! use tir_polars::{ColumnNames, TirFrameExt};
//!
//! let df = df![
//!     "patient_id" => ["a", "a", "b"],
//!     "time" => [0.0, 5.0, 0.0],
//!     "glucose" => [110.0, 240.0, 150.0],
//! ]?;
//!
//! let config = TirConfig::new().with_range(TargetRange::STANDARD_GLUCOSE);
//! let summary = df.tir_summary(&ColumnNames::default(), &config, 3)?;
//! println!("{summary}");
//! ```

mod config;
mod error;
mod ingest;
mod result;
mod traits;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::{Error, Result};
pub use result::{result_frame, LABEL_COLUMN};
pub use traits::*;

// Re-export commonly used types from the estimation crates
pub use tir_estimate::{Method, Model, TirConfig, TirResult};
