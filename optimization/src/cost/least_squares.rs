use std::{num::NonZeroUsize, ops::Range};

use ndarray::{Array1, ArrayView1};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use rayon::prelude::*;

use super::{CostFunction, StochasticCostFunction};
use crate::dataset::Dataset;

/// The linear least squares cost `1/2n Σ (x_i · w - y_i)^2` over a dataset, sampled
/// in shuffled mini-batches.
///
/// The gradient of a mini-batch is accumulated over its rows in parallel.
#[derive(Debug)]
pub struct LeastSquaresCost {
    dataset: Dataset,
    variables: Vec<f64>,
    batch_size: NonZeroUsize,
    order: Vec<usize>,
    cursor: usize,
    batch: Option<Range<usize>>,
    rng: StdRng,
}

impl LeastSquaresCost {
    /// Creates a new `LeastSquaresCost` starting at the origin.
    ///
    /// # Arguments
    /// * `dataset` - The samples the cost is measured on.
    /// * `batch_size` - The amount of samples per gradient query.
    /// * `seed` - The seed for shuffling the samples at the start of each pass.
    pub fn new(dataset: Dataset, batch_size: NonZeroUsize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            variables: vec![0.; dataset.n_features()],
            order: (0..dataset.len()).collect(),
            dataset,
            batch_size,
            cursor: 0,
            batch: None,
            rng,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn batch_gradient(&self, rows: &[usize]) -> Vec<f64> {
        let x = self.dataset.x();
        let y = self.dataset.y();
        let w = ArrayView1::from(&self.variables[..]);
        let n_features = self.dataset.n_features();

        if rows.is_empty() {
            return vec![0.; n_features];
        }

        let sum = rows
            .par_iter()
            .map(|&i| {
                let row = x.row(i);
                let residual = row.dot(&w) - y[i];
                &row * residual
            })
            .reduce(|| Array1::zeros(n_features), |a, b| a + b);

        (sum / rows.len() as f64).to_vec()
    }
}

impl CostFunction for LeastSquaresCost {
    fn variables(&self) -> &[f64] {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut [f64] {
        &mut self.variables
    }

    fn cost(&self) -> f64 {
        if self.dataset.is_empty() {
            return 0.;
        }

        let w = ArrayView1::from(&self.variables[..]);
        let residual = &self.dataset.x().dot(&w) - &self.dataset.y();
        0.5 * residual.mapv(|r| r.powi(2)).mean().unwrap_or_default()
    }

    fn gradient(&mut self) -> Vec<f64> {
        match &self.batch {
            Some(range) => self.batch_gradient(&self.order[range.clone()]),
            None => self.batch_gradient(&self.order),
        }
    }

    fn is_true_minibatch(&self) -> bool {
        self.batch_size.get() < self.dataset.len()
    }
}

impl StochasticCostFunction for LeastSquaresCost {
    fn begin_sample(&mut self) {
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
        self.batch = None;
    }

    fn next_sample(&mut self) -> bool {
        let len = self.order.len();
        if self.cursor >= len {
            self.batch = None;
            return false;
        }

        let end = (self.cursor + self.batch_size.get()).min(len);
        self.batch = Some(self.cursor..end);
        self.cursor = end;
        true
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn line() -> Dataset {
        // y = 2x
        Dataset::new(array![[1.], [2.], [3.], [4.]], array![2., 4., 6., 8.]).unwrap()
    }

    #[test]
    fn full_gradient_outside_of_a_pass() {
        let mut cost = LeastSquaresCost::new(line(), NonZeroUsize::new(2).unwrap(), Some(0));

        // d/dw 1/2n Σ (w x - y)^2 at w = 0 is -1/n Σ x y = -(2 + 8 + 18 + 32) / 4
        assert_eq!(cost.gradient(), [-15.]);
        assert_eq!(cost.cost(), 0.5 * (4. + 16. + 36. + 64.) / 4.);
    }

    #[test]
    fn a_pass_visits_every_sample_once() {
        let mut cost = LeastSquaresCost::new(line(), NonZeroUsize::new(3).unwrap(), Some(1));
        assert!(cost.is_true_minibatch());

        cost.begin_sample();
        let mut batches = vec![];
        while cost.next_sample() {
            batches.push(cost.batch.clone().unwrap());
        }

        assert_eq!(batches, [0..3, 3..4]);

        let mut seen = cost.order.clone();
        seen.sort();
        assert_eq!(seen, [0, 1, 2, 3]);
    }

    #[test]
    fn gradient_vanishes_at_the_solution() {
        let mut cost = LeastSquaresCost::new(line(), NonZeroUsize::new(4).unwrap(), Some(2));
        cost.variables_mut()[0] = 2.;

        cost.begin_sample();
        while cost.next_sample() {
            assert_eq!(cost.gradient(), [0.]);
        }
        assert_eq!(cost.cost(), 0.);
        assert!(!cost.is_true_minibatch());
    }
}
