//! Provide traits shared by the fitted models

use ndarray::{Array1, ArrayBase, Data, Ix1};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::metrics::Metrics;

/// Predict a target value from a single input.
pub trait Predict {
    fn predict(&self, x: f64) -> Result<f64>;

    fn predict_many<S: Data<Elem = f64>>(&self, x: &ArrayBase<S, Ix1>) -> Result<Array1<f64>> {
        x.iter()
            .map(|&v| self.predict(v))
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from)
    }
}

/// Score a model on a held-out dataset.
pub trait Evaluate: Predict {
    fn evaluate(&self, test: &Dataset) -> Result<Metrics> {
        if test.is_empty() {
            return Err(Error::InsufficientData(String::from(
                "cannot evaluate on an empty test set",
            )));
        }
        let predicted = self.predict_many(&test.x())?;
        Metrics::compute(&predicted, &test.y())
    }
}
