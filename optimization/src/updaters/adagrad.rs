use super::{Accumulator, DescendUpdater, Update};
use crate::{Result, error::require, specs::UpdaterSpec};

/// Scales every parameter's step by the inverse root of its accumulated squared gradients.
#[derive(Debug, Clone)]
pub struct AdaGrad {
    epsilon: f64,
    sum_sq: Accumulator,
}

impl AdaGrad {
    /// Creates a new `AdaGrad` updater.
    ///
    /// # Arguments
    /// * `epsilon` - A small positive term that keeps the denominator away from zero.
    pub fn new(epsilon: f64) -> Result<Self> {
        require(epsilon > 0., "epsilon", epsilon)?;

        Ok(Self {
            epsilon,
            sum_sq: Accumulator::default(),
        })
    }
}

impl DescendUpdater for AdaGrad {
    fn compute_update(&mut self, grad: &[f64], lr: f64, _iteration: u64) -> Result<Update> {
        let eps = self.epsilon;
        let sum_sq = self.sum_sq.get_mut(grad.len())?;

        let delta = sum_sq
            .iter_mut()
            .zip(grad)
            .map(|(s, g)| {
                *s += g.powi(2);
                lr * g / (s.sqrt() + eps)
            })
            .collect();

        Ok(Update::new(delta))
    }

    fn reset(&mut self) {
        self.sum_sq.clear();
    }

    fn spec(&self) -> UpdaterSpec {
        UpdaterSpec::AdaGrad {
            epsilon: self.epsilon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_is_normalized() {
        let mut updater = AdaGrad::new(1e-12).unwrap();
        let update = updater.compute_update(&[4., -0.25], 0.1, 0).unwrap();

        assert!((update.delta()[0] - 0.1).abs() < 1e-9);
        assert!((update.delta()[1] + 0.1).abs() < 1e-9);
    }

    #[test]
    fn steps_shrink_for_a_constant_gradient() {
        let mut updater = AdaGrad::new(1e-8).unwrap();
        let first = updater.compute_update(&[1.], 1., 0).unwrap();
        let second = updater.compute_update(&[1.], 1., 1).unwrap();

        assert!(second.delta()[0] < first.delta()[0]);
    }
}
