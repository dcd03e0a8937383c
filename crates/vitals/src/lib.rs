//! Blood pressure aggregation.
//!
//! This crate computes the summary statistics shown next to a user's list of
//! blood pressure readings. It is pure: callers load the readings (already
//! scoped to one user) and pass them in as a slice.
//!
//! - [`range`] - minimum and maximum of each field
//! - [`average_and_median`] - rounded mean and median of each field
//! - [`summarize`] - both of the above in one record
//!
//! An empty slice yields `None` from every aggregate.
//!
//! # Example
//!
//! ```rust
//! use vitals::{range, Reading};
//!
//! let readings = [Reading::new(120, 80), Reading::new(110, 70)];
//! let range = range(&readings).unwrap();
//! assert_eq!(range.systolic_min, 110);
//! assert_eq!(range.diastolic_max, 80);
//!
//! assert!(vitals::range(&[]).is_none());
//! ```

mod aggregate;
mod reading;
pub mod stats;

pub use aggregate::{
    average_and_median, range, summarize, BloodPressureAverages, BloodPressureRange,
    BloodPressureSummary,
};
pub use reading::Reading;
