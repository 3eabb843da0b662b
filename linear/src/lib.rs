extern crate ndarray;

mod engine;

pub use engine::{Description, ModelSummary, RegressionEngine};

use salreg::traits::{Evaluate, Predict};
use salreg::{Dataset, Error, Result};

/// Intercept and slope of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub intercept: f64,
    pub coefficient: f64,
}

/// Closed-form ordinary least squares on a single feature.
///
/// Sums are taken around the means, which keeps the slope accurate when
/// the targets are large compared to their spread.
pub fn ols(train: &Dataset) -> Result<Params> {
    if train.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "at least 2 samples are needed to fit a line, got {}",
            train.len()
        )));
    }
    let x = train.x();
    let y = train.y();
    let x_mean = x
        .mean()
        .ok_or_else(|| Error::InsufficientData(String::from("empty feature column")))?;
    let y_mean = y
        .mean()
        .ok_or_else(|| Error::InsufficientData(String::from("empty target column")))?;

    let (sxy, sxx) = x
        .iter()
        .zip(y.iter())
        .fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
            let dx = xi - x_mean;
            (sxy + dx * (yi - y_mean), sxx + dx * dx)
        });
    if sxx == 0.0 {
        return Err(Error::InsufficientData(String::from(
            "at least 2 distinct x values are needed to fit a line",
        )));
    }

    let coefficient = sxy / sxx;
    let intercept = y_mean - coefficient * x_mean;
    if !coefficient.is_finite() || !intercept.is_finite() {
        return Err(Error::InsufficientData(String::from(
            "the training data does not determine a finite line",
        )));
    }
    Ok(Params {
        intercept,
        coefficient,
    })
}

pub struct Linear {
    params: Option<Params>,
}

impl Default for Linear {
    fn default() -> Self {
        Linear { params: None }
    }
}

/// Configure and fit a simple linear regression model
impl Linear {
    /// Create an unfitted model.
    pub fn new() -> Linear {
        Linear { params: None }
    }

    /// Fit the line to `train`. A failed fit keeps the previous parameters.
    pub fn fit(&mut self, train: &Dataset) -> Result<&Self> {
        self.params = Some(ols(train)?);
        Ok(self)
    }

    pub fn params(&self) -> Option<Params> {
        self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    pub fn equation(&self) -> Result<String> {
        let params = self.params.ok_or(Error::ModelNotFitted)?;
        Ok(format!(
            "Salario = {:.2} + {:.2} × Años",
            params.intercept, params.coefficient
        ))
    }
}

impl Predict for Linear {
    fn predict(&self, x: f64) -> Result<f64> {
        let params = self.params.ok_or(Error::ModelNotFitted)?;
        if !x.is_finite() {
            return Err(Error::InvalidInput(format!("{} is not a finite number", x)));
        }
        Ok(params.intercept + params.coefficient * x)
    }
}

impl Evaluate for Linear {}
