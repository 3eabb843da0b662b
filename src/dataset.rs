use ndarray::{Array1, ArrayView1, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_isaac::Isaac64Rng;

use crate::error::{Error, Result};

/// One observation: years of experience and the salary earned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// Ordered pair of equally long `x` / `y` columns.
///
/// Every value is finite. An empty dataset is allowed so that callers get
/// `InsufficientData` from the operation that needs samples instead of a
/// construction error.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl Dataset {
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> Result<Dataset> {
        if x.len() != y.len() {
            return Err(Error::InvalidInput(format!(
                "x has {} values but y has {}",
                x.len(),
                y.len()
            )));
        }
        if let Some(i) = x
            .iter()
            .zip(y.iter())
            .position(|(a, b)| !a.is_finite() || !b.is_finite())
        {
            return Err(Error::InvalidInput(format!(
                "sample {} is not a finite number",
                i
            )));
        }
        Ok(Dataset { x, y })
    }

    pub fn from_samples(samples: &[Sample]) -> Result<Dataset> {
        let x = samples.iter().map(|s| s.x).collect::<Array1<f64>>();
        let y = samples.iter().map(|s| s.y).collect::<Array1<f64>>();
        Dataset::new(x, y)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> ArrayView1<f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<f64> {
        self.y.view()
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| Sample { x, y })
            .collect()
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }

    /// Partition into train and test subsets following `policy`.
    ///
    /// Sample indices are shuffled with an ISAAC-64 generator seeded from
    /// `policy.seed`; the first `ceil(n * test_size)` of them form the test
    /// subset, the rest the training subset.
    pub fn split(&self, policy: &SplitPolicy) -> Result<Split> {
        policy.validate()?;

        let n = self.len();
        let n_test = (n as f64 * policy.test_size).ceil() as usize;
        let n_train = n.saturating_sub(n_test);
        if n_test == 0 || n_train < 2 {
            return Err(Error::InsufficientData(format!(
                "cannot split {} samples into at least 2 training and 1 test sample",
                n
            )));
        }

        let mut indices = (0..n).collect::<Vec<usize>>();
        let mut rng = Isaac64Rng::seed_from_u64(policy.seed);
        indices.shuffle(&mut rng);

        let (test, train) = indices.split_at(n_test);
        Ok(Split {
            train: self.select(train),
            test: self.select(test),
        })
    }
}

/// How a dataset is divided into train and test subsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPolicy {
    pub test_size: f64,
    pub seed: u64,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        SplitPolicy {
            test_size: 0.2,
            seed: 42,
        }
    }
}

impl SplitPolicy {
    pub fn new(test_size: f64, seed: u64) -> SplitPolicy {
        SplitPolicy { test_size, seed }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(Error::InvalidInput(format!(
                "test size must lie strictly between 0 and 1, got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

/// Immutable train/test partition of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}
