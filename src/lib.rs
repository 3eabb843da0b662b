//! `salreg` holds the shared building blocks of the salary regression demo:
//! samples and datasets, the seeded train/test split, the error taxonomy and
//! the regression metrics every model is scored with.
//!
//! The model itself lives in `salreg-linear`, the bundled data in
//! `salreg-datasets` and the JSON API in `salreg-server`.
//!

pub mod dataset;
pub mod error;
mod metrics_regression;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, Sample, Split, SplitPolicy};
pub use error::{Error, Result};

use ndarray::NdFloat;
use num_traits::FromPrimitive;

/// Floating point element the metrics can be computed over.
pub trait Float: NdFloat + FromPrimitive + Default {}

impl Float for f32 {}
impl Float for f64 {}

/// Common metrics functions for regression
pub mod metrics {
    pub use crate::metrics_regression::{Metrics, Regression};
}
