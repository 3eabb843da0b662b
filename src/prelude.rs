//! salreg prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

pub use crate::dataset::{Dataset, Sample, Split, SplitPolicy};
pub use crate::error::{Error, Result};
pub use crate::metrics::{Metrics, Regression};
pub use crate::traits::{Evaluate, Predict};
