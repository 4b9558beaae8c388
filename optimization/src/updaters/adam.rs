use super::{Accumulator, DescendUpdater, Update};
use crate::{Result, error::require, specs::UpdaterSpec};

/// Adaptive moment estimation.
///
/// Keeps exponential moving averages of the gradient and of its square, and corrects
/// their bias towards zero using the iteration counter handed in by the minimizer.
#[derive(Debug, Clone)]
pub struct Adam {
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    v: Accumulator,
    s: Accumulator,
}

impl Adam {
    /// Creates a new `Adam` updater.
    ///
    /// # Arguments
    /// * `beta1`, `beta2` - Decay of the first and second moment estimates, in `[0, 1)`.
    /// * `epsilon` - A small positive term that keeps the denominator away from zero.
    pub fn new(beta1: f64, beta2: f64, epsilon: f64) -> Result<Self> {
        require((0. ..1.).contains(&beta1), "beta1", beta1)?;
        require((0. ..1.).contains(&beta2), "beta2", beta2)?;
        require(epsilon > 0., "epsilon", epsilon)?;

        Ok(Self {
            beta1,
            beta2,
            epsilon,
            v: Accumulator::default(),
            s: Accumulator::default(),
        })
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            v: Accumulator::default(),
            s: Accumulator::default(),
        }
    }
}

impl DescendUpdater for Adam {
    fn compute_update(&mut self, grad: &[f64], lr: f64, iteration: u64) -> Result<Update> {
        let Self {
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            ..
        } = *self;

        self.s.check(grad.len())?;
        let v = self.v.get_mut(grad.len())?;
        let s = self.s.get_mut(grad.len())?;

        let t = (iteration + 1) as f64;
        let bc1 = 1. - b1.powf(t);
        let bc2 = 1. - b2.powf(t);
        let step_size = lr * (bc2.sqrt() / bc1);

        let delta = v
            .iter_mut()
            .zip(s.iter_mut())
            .zip(grad)
            .map(|((v, s), g)| {
                *v = b1 * *v + (1. - b1) * g;
                *s = b2 * *s + (1. - b2) * g.powi(2);
                step_size * *v / (s.sqrt() + eps)
            })
            .collect();

        Ok(Update::new(delta))
    }

    fn reset(&mut self) {
        self.v.clear();
        self.s.clear();
    }

    fn spec(&self) -> UpdaterSpec {
        UpdaterSpec::Adam {
            beta1: self.beta1,
            beta2: self.beta2,
            epsilon: self.epsilon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_has_magnitude_close_to_the_learning_rate() {
        let mut adam = Adam::default();

        for g in [1e-3, 1., 250.] {
            adam.reset();
            let update = adam.compute_update(&[g, -g], 0.01, 0).unwrap();
            assert!((update.delta()[0] - 0.01).abs() < 1e-5);
            assert!((update.delta()[1] + 0.01).abs() < 1e-5);
        }
    }

    #[test]
    fn bias_correction_follows_the_iteration_counter() {
        let mut early = Adam::default();
        let mut late = Adam::default();

        let early = early.compute_update(&[1.], 0.1, 0).unwrap();
        let late = late.compute_update(&[1.], 0.1, 10_000).unwrap();

        // Without the correction the fresh moments are read as warmed up.
        assert!((early.delta()[0] - 0.1).abs() < 1e-6);
        assert!(late.delta()[0] > 2. * early.delta()[0]);
    }

    #[test]
    fn mismatched_gradient_is_rejected() {
        let mut adam = Adam::default();
        adam.compute_update(&[1., 2.], 0.1, 0).unwrap();

        assert!(adam.compute_update(&[1.], 0.1, 1).is_err());
    }

    #[test]
    fn invalid_hyperparameters_are_rejected() {
        assert!(Adam::new(1., 0.999, 1e-8).is_err());
        assert!(Adam::new(0.9, 1.2, 1e-8).is_err());
        assert!(Adam::new(0.9, 0.999, -1.).is_err());
    }
}
