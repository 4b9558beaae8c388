use super::{Accumulator, DescendUpdater, Update};
use crate::{Result, error::require, specs::UpdaterSpec};

/// Adapts the step per parameter from moving averages of both the squared gradients
/// and the squared past updates, so the units of the update match the parameter's.
#[derive(Debug, Clone)]
pub struct AdaDelta {
    decay: f64,
    epsilon: f64,
    mean_sq_grad: Accumulator,
    mean_sq_delta: Accumulator,
}

impl AdaDelta {
    /// Creates a new `AdaDelta` updater.
    ///
    /// # Arguments
    /// * `decay` - The discount of both moving averages, in `[0, 1)`.
    /// * `epsilon` - A small positive term added under both roots.
    pub fn new(decay: f64, epsilon: f64) -> Result<Self> {
        require((0. ..1.).contains(&decay), "decay", decay)?;
        require(epsilon > 0., "epsilon", epsilon)?;

        Ok(Self {
            decay,
            epsilon,
            mean_sq_grad: Accumulator::default(),
            mean_sq_delta: Accumulator::default(),
        })
    }
}

impl DescendUpdater for AdaDelta {
    fn compute_update(&mut self, grad: &[f64], lr: f64, _iteration: u64) -> Result<Update> {
        let Self {
            decay: rho,
            epsilon: eps,
            ..
        } = *self;

        self.mean_sq_delta.check(grad.len())?;
        let mean_sq_grad = self.mean_sq_grad.get_mut(grad.len())?;
        let mean_sq_delta = self.mean_sq_delta.get_mut(grad.len())?;

        let delta = mean_sq_grad
            .iter_mut()
            .zip(mean_sq_delta.iter_mut())
            .zip(grad)
            .map(|((eg, edx), g)| {
                *eg = rho * *eg + (1. - rho) * g.powi(2);
                let dx = (*edx + eps).sqrt() / (*eg + eps).sqrt() * g;
                *edx = rho * *edx + (1. - rho) * dx.powi(2);
                lr * dx
            })
            .collect();

        Ok(Update::new(delta))
    }

    fn reset(&mut self) {
        self.mean_sq_grad.clear();
        self.mean_sq_delta.clear();
    }

    fn spec(&self) -> UpdaterSpec {
        UpdaterSpec::AdaDelta {
            decay: self.decay,
            epsilon: self.epsilon,
        }
    }
}
