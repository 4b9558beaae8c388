use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::{RandomExt, rand_distr::Normal};
use rand::{Rng, distr::StandardUniform};

use crate::{
    OptErr, Result,
    error::{check_len, require},
};

/// Maps a sample of `[0, 1)` to `[-1, 1)`.
fn centered(u: f64) -> f64 {
    2. * u - 1.
}

/// An in-memory regression dataset, one sample per row of `x`.
#[derive(Debug, Clone)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `x` - The features, one row per sample.
    /// * `y` - The targets, one per sample.
    ///
    /// # Returns
    /// A new `Dataset`, or an error if the amount of rows and targets differ.
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        check_len("targets", "feature rows", y.len(), x.nrows())?;
        Ok(Self { x, y })
    }

    /// Generates a linear regression problem `y = x · w + noise`.
    ///
    /// Features and weights are drawn uniformly from `[-1, 1)`, the noise from a normal
    /// distribution centered at zero.
    ///
    /// # Arguments
    /// * `samples` - The amount of rows.
    /// * `features` - The amount of columns.
    /// * `noise_std` - The standard deviation of the noise.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// The dataset and the weights used to generate it.
    pub fn linear<R: Rng + ?Sized>(
        samples: usize,
        features: usize,
        noise_std: f64,
        rng: &mut R,
    ) -> Result<(Self, Array1<f64>)> {
        require(noise_std >= 0. && noise_std.is_finite(), "noise_std", noise_std)?;
        let normal = Normal::new(0., noise_std).map_err(|_| OptErr::InvalidHyperparameter {
            name: "noise_std",
            value: noise_std,
        })?;

        let x = Array2::random_using((samples, features), StandardUniform, rng).mapv(centered);
        let w = Array1::random_using(features, StandardUniform, rng).mapv(centered);
        let noise = Array1::random_using(samples, &normal, rng);
        let y = x.dot(&w) + noise;

        Ok((Self { x, y }, w))
    }

    /// The amount of samples.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// The amount of features per sample.
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn rows_and_targets_must_match() {
        let x = array![[1., 2.], [3., 4.]];
        assert!(Dataset::new(x.clone(), array![1.]).is_err());
        assert_eq!(Dataset::new(x, array![1., 2.]).unwrap().len(), 2);
    }

    #[test]
    fn noiseless_linear_data_is_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        let (dataset, w) = Dataset::linear(32, 3, 0., &mut rng).unwrap();

        assert_eq!(dataset.n_features(), 3);
        let residual = &dataset.x().dot(&w) - &dataset.y();
        assert!(residual.iter().all(|r| r.abs() < 1e-12));
    }

    #[test]
    fn negative_noise_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);

        for noise_std in [-1., f64::NAN, f64::INFINITY] {
            let err = Dataset::linear(4, 2, noise_std, &mut rng).unwrap_err();
            assert!(matches!(
                err,
                OptErr::InvalidHyperparameter {
                    name: "noise_std",
                    ..
                }
            ));
        }
    }

    #[test]
    fn features_and_weights_lie_in_the_unit_box() {
        let mut rng = StdRng::seed_from_u64(11);
        let (dataset, w) = Dataset::linear(64, 4, 0.1, &mut rng).unwrap();

        let in_box = |v: &f64| (-1. ..1.).contains(v);
        assert!(dataset.x().iter().all(in_box));
        assert!(w.iter().all(in_box));
    }
}
