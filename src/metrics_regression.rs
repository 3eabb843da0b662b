//! Common metrics for regression
//!
//! This module implements common comparison metrics for continuous variables.

use ndarray::{Array1, ArrayBase, Data, Ix1};

use crate::error::{Error, Result};
use crate::Float;

/// Regression metrics trait
///
/// Implemented for one-dimensional arrays of predicted values; every method
/// compares `self` against the observed values in `compare_to`.
pub trait Regression<F: Float> {
    /// Maximal absolute residual
    fn max_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Mean of absolute residuals
    fn mean_absolute_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Mean of squared residuals
    fn mean_squared_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// R squared coefficient, the proportion of the variance in the observed
    /// values that is explained by the predictions.
    ///
    /// Constant observations have no variance to explain: the score is `1.0`
    /// when every prediction is exact and `0.0` otherwise.
    fn r2<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
}

fn residuals<F, D1, D2>(
    predicted: &ArrayBase<D1, Ix1>,
    observed: &ArrayBase<D2, Ix1>,
) -> Result<Array1<F>>
where
    F: Float,
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    if predicted.len() != observed.len() {
        return Err(Error::InvalidInput(format!(
            "{} predictions for {} observations",
            predicted.len(),
            observed.len()
        )));
    }
    if observed.is_empty() {
        return Err(Error::InsufficientData(String::from(
            "no observations to score against",
        )));
    }
    Ok(observed - predicted)
}

fn mean<F: Float>(values: &Array1<F>) -> Result<F> {
    values
        .mean()
        .ok_or_else(|| Error::InsufficientData(String::from("mean of an empty array")))
}

impl<F: Float, S: Data<Elem = F>> Regression<F> for ArrayBase<S, Ix1> {
    fn max_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let res = residuals(self, compare_to)?;
        Ok(res.iter().fold(F::zero(), |max, r| max.max(r.abs())))
    }

    fn mean_absolute_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let res = residuals(self, compare_to)?;
        mean(&res.mapv(|r| r.abs()))
    }

    fn mean_squared_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let res = residuals(self, compare_to)?;
        mean(&res.mapv(|r| r * r))
    }

    fn r2<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let res = residuals(self, compare_to)?;
        let observed_mean = mean(&compare_to.to_owned())?;

        let ss_res = res.iter().fold(F::zero(), |acc, &r| acc + r * r);
        let ss_tot = compare_to
            .iter()
            .fold(F::zero(), |acc, &y| acc + (y - observed_mean) * (y - observed_mean));

        if ss_tot == F::zero() {
            return Ok(if ss_res == F::zero() { F::one() } else { F::zero() });
        }
        Ok(F::one() - ss_res / ss_tot)
    }
}

/// Fit-quality figures of a model scored on a held-out set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
    pub max_error: f64,
    pub n_samples: usize,
}

impl Metrics {
    /// Score `predicted` against `observed`.
    pub fn compute<D1, D2>(predicted: &ArrayBase<D1, Ix1>, observed: &ArrayBase<D2, Ix1>) -> Result<Metrics>
    where
        D1: Data<Elem = f64>,
        D2: Data<Elem = f64>,
    {
        let mse = predicted.mean_squared_error(observed)?;
        Ok(Metrics {
            mae: predicted.mean_absolute_error(observed)?,
            mse,
            rmse: mse.sqrt(),
            r2: predicted.r2(observed)?,
            max_error: predicted.max_error(observed)?,
            n_samples: observed.len(),
        })
    }
}
