use ndarray::{Array1, ArrayView1};
use ndarray_stats::QuantileExt;

use salreg::metrics::Metrics;
use salreg::traits::{Evaluate, Predict};
use salreg::{Dataset, Error, Result, Split, SplitPolicy};

use crate::{Linear, Params};

/// Read-only view of the partition, for drawing the scatter chart.
#[derive(Debug, Clone, Copy)]
pub struct Description<'a> {
    pub train: &'a Dataset,
    pub test: &'a Dataset,
    pub all_x: ArrayView1<'a, f64>,
    pub all_y: ArrayView1<'a, f64>,
}

/// General information about the fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub kind: &'static str,
    pub feature: &'static str,
    pub target: &'static str,
    pub params: Params,
    pub r2: f64,
    pub n_total: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub x_min: f64,
    pub x_max: f64,
}

/// A dataset, its train/test split, and a line fitted to the training part.
///
/// Everything is computed in [`RegressionEngine::new`]; afterwards the
/// engine only answers queries through `&self`, so one instance can be
/// shared between threads behind an `Arc`.
pub struct RegressionEngine {
    dataset: Dataset,
    split: Split,
    model: Linear,
    params: Params,
    metrics: Metrics,
    summary: ModelSummary,
}

impl RegressionEngine {
    pub fn new(dataset: Dataset, policy: &SplitPolicy) -> Result<RegressionEngine> {
        let split = dataset.split(policy)?;

        let mut model = Linear::new();
        model.fit(&split.train)?;
        let params = model.params().ok_or(Error::ModelNotFitted)?;
        let metrics = model.evaluate(&split.test)?;

        let x = dataset.x();
        let x_min = *x
            .min()
            .map_err(|e| Error::InsufficientData(format!("no feature range: {}", e)))?;
        let x_max = *x
            .max()
            .map_err(|e| Error::InsufficientData(format!("no feature range: {}", e)))?;

        let summary = ModelSummary {
            kind: "Regresión Lineal Simple",
            feature: "Años de Experiencia",
            target: "Salario",
            params,
            r2: metrics.r2,
            n_total: dataset.len(),
            n_train: split.train.len(),
            n_test: split.test.len(),
            x_min,
            x_max,
        };

        Ok(RegressionEngine {
            dataset,
            split,
            model,
            params,
            metrics,
            summary,
        })
    }

    pub fn params(&self) -> Params {
        self.params
    }

    /// Scores of the fitted line on the test subset, computed once at start.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn summary(&self) -> &ModelSummary {
        &self.summary
    }

    pub fn equation(&self) -> Result<String> {
        self.model.equation()
    }

    pub fn describe(&self) -> Description {
        Description {
            train: &self.split.train,
            test: &self.split.test,
            all_x: self.dataset.x(),
            all_y: self.dataset.y(),
        }
    }

    /// `points` evenly spaced inputs from `min` to `max` and their predictions.
    /// The inputs descend when `min > max`.
    pub fn predict_range(&self, min: f64, max: f64, points: usize) -> Result<(Array1<f64>, Array1<f64>)> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidInput(String::from("range bounds must be finite")));
        }
        if points < 2 {
            return Err(Error::InvalidInput(format!(
                "a range needs at least 2 points, got {}",
                points
            )));
        }
        let x = Array1::linspace(min, max, points);
        let y = self.predict_many(&x)?;
        Ok((x, y))
    }
}

impl Predict for RegressionEngine {
    fn predict(&self, x: f64) -> Result<f64> {
        self.model.predict(x)
    }
}

impl Evaluate for RegressionEngine {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;
    use std::thread;

    fn engine() -> RegressionEngine {
        let dataset = salreg_datasets::salary().unwrap();
        RegressionEngine::new(dataset, &SplitPolicy::default()).unwrap()
    }

    fn noise_free(n: usize) -> Dataset {
        let x = Array1::linspace(1.0, n as f64, n);
        let y = x.mapv(|v| 10.0 * v);
        Dataset::new(x, y).unwrap()
    }

    #[test]
    fn new_works() {
        let engine = engine();
        let summary = engine.summary();

        assert_eq!(summary.n_total, 30);
        assert_eq!(summary.n_train, 24);
        assert_eq!(summary.n_test, 6);
        assert_eq!(engine.metrics().n_samples, 6);
        assert_abs_diff_eq!(summary.x_min, 1.1);
        assert_abs_diff_eq!(summary.x_max, 10.5);
        assert!(engine.metrics().r2 <= 1.0);
        assert!(engine.metrics().rmse > 0.0);
        assert!(engine.params().coefficient > 8000.0 && engine.params().coefficient < 11000.0);
    }

    #[test]
    fn new_recovers_a_noise_free_line() {
        let engine = RegressionEngine::new(noise_free(10), &SplitPolicy::default()).unwrap();
        let params = engine.params();

        assert_abs_diff_eq!(params.intercept, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(params.coefficient, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(engine.metrics().r2, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(engine.metrics().mae, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(engine.predict(4.0).unwrap(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn new_fails_without_enough_samples() {
        let dataset = noise_free(2);
        let res = RegressionEngine::new(dataset, &SplitPolicy::default());

        assert!(matches!(res, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn new_fails_when_training_x_values_are_identical() {
        let x = Array1::from(vec![3.0; 10]);
        let y = Array1::linspace(1.0, 10.0, 10);
        let res = RegressionEngine::new(Dataset::new(x, y).unwrap(), &SplitPolicy::default());

        assert!(matches!(res, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn metrics_match_a_fresh_evaluation() {
        let engine = engine();
        let description = engine.describe();

        assert_eq!(&engine.evaluate(description.test).unwrap(), engine.metrics());
    }

    #[test]
    fn describe_exposes_the_partition() {
        let engine = engine();
        let description = engine.describe();

        assert_eq!(description.train.len() + description.test.len(), description.all_x.len());
        assert_eq!(description.all_x.len(), description.all_y.len());
        for s in description.test.samples() {
            assert!(description
                .all_x
                .iter()
                .zip(description.all_y.iter())
                .any(|(&x, &y)| x == s.x && y == s.y));
        }
    }

    #[test]
    fn same_policy_gives_same_engine() {
        let a = engine();
        let b = engine();

        assert_eq!(a.params(), b.params());
        assert_eq!(a.metrics(), b.metrics());
    }

    #[test]
    fn predict_range_works() {
        let engine = RegressionEngine::new(noise_free(10), &SplitPolicy::default()).unwrap();
        let (x, y) = engine.predict_range(0.0, 20.0, 5).unwrap();

        assert_abs_diff_eq!(x, Array1::from(vec![0.0, 5.0, 10.0, 15.0, 20.0]), epsilon = 1e-12);
        assert_abs_diff_eq!(y, Array1::from(vec![0.0, 50.0, 100.0, 150.0, 200.0]), epsilon = 1e-8);
    }

    #[test]
    fn predict_range_descends_on_reversed_bounds() {
        let engine = RegressionEngine::new(noise_free(10), &SplitPolicy::default()).unwrap();
        let (x, y) = engine.predict_range(4.0, 1.0, 4).unwrap();

        assert_abs_diff_eq!(x, Array1::from(vec![4.0, 3.0, 2.0, 1.0]), epsilon = 1e-12);
        assert_abs_diff_eq!(y, Array1::from(vec![40.0, 30.0, 20.0, 10.0]), epsilon = 1e-8);
    }

    #[test]
    fn predict_range_rejects_bad_bounds() {
        let engine = engine();

        assert!(matches!(engine.predict_range(0.0, 1.0, 1), Err(Error::InvalidInput(_))));
        assert!(matches!(
            engine.predict_range(f64::NAN, 1.0, 10),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn engine_serves_concurrent_readers() {
        let engine = Arc::new(engine());
        let expected = engine.predict(5.0).unwrap();

        let handles = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || engine.predict(5.0).unwrap())
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
