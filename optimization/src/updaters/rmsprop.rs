use super::{Accumulator, DescendUpdater, Update};
use crate::{Result, error::require, specs::UpdaterSpec};

/// Scales every parameter's step by the root of an exponential moving average of its
/// squared gradients.
#[derive(Debug, Clone)]
pub struct RmsProp {
    decay: f64,
    epsilon: f64,
    mean_sq: Accumulator,
}

impl RmsProp {
    /// Creates a new `RmsProp` updater.
    ///
    /// # Arguments
    /// * `decay` - The discount of the moving average, in `[0, 1)`.
    /// * `epsilon` - A small positive term that keeps the denominator away from zero.
    pub fn new(decay: f64, epsilon: f64) -> Result<Self> {
        require((0. ..1.).contains(&decay), "decay", decay)?;
        require(epsilon > 0., "epsilon", epsilon)?;

        Ok(Self {
            decay,
            epsilon,
            mean_sq: Accumulator::default(),
        })
    }
}

impl DescendUpdater for RmsProp {
    fn compute_update(&mut self, grad: &[f64], lr: f64, _iteration: u64) -> Result<Update> {
        let Self {
            decay: rho,
            epsilon: eps,
            ..
        } = *self;

        let mean_sq = self.mean_sq.get_mut(grad.len())?;

        let delta = mean_sq
            .iter_mut()
            .zip(grad)
            .map(|(m, g)| {
                *m = rho * *m + (1. - rho) * g.powi(2);
                lr * g / (m.sqrt() + eps)
            })
            .collect();

        Ok(Update::new(delta))
    }

    fn reset(&mut self) {
        self.mean_sq.clear();
    }

    fn spec(&self) -> UpdaterSpec {
        UpdaterSpec::RmsProp {
            decay: self.decay,
            epsilon: self.epsilon,
        }
    }
}
