use super::{Accumulator, DescendUpdater, Update};
use crate::{Result, error::require, specs::UpdaterSpec};

/// Gradient descent with momentum.
///
/// Keeps a velocity `v = mu * v + lr * g` per parameter and moves along it. With the
/// Nesterov correction the update looks ahead, `mu * v + lr * g`.
#[derive(Debug, Clone)]
pub struct Momentum {
    momentum: f64,
    nesterov: bool,
    velocity: Accumulator,
}

impl Momentum {
    /// Creates a new `Momentum` updater.
    ///
    /// # Arguments
    /// * `momentum` - The decay of the velocity, in `[0, 1)`.
    pub fn new(momentum: f64) -> Result<Self> {
        require((0. ..1.).contains(&momentum), "momentum", momentum)?;

        Ok(Self {
            momentum,
            nesterov: false,
            velocity: Accumulator::default(),
        })
    }

    /// Creates a new `Momentum` updater using the Nesterov correction.
    pub fn nesterov(momentum: f64) -> Result<Self> {
        let mut updater = Self::new(momentum)?;
        updater.nesterov = true;
        Ok(updater)
    }
}

impl DescendUpdater for Momentum {
    fn compute_update(&mut self, grad: &[f64], lr: f64, _iteration: u64) -> Result<Update> {
        let mu = self.momentum;
        let nesterov = self.nesterov;
        let velocity = self.velocity.get_mut(grad.len())?;

        let delta = velocity
            .iter_mut()
            .zip(grad)
            .map(|(v, g)| {
                *v = mu * *v + lr * g;
                if nesterov { mu * *v + lr * g } else { *v }
            })
            .collect();

        Ok(Update::new(delta))
    }

    fn reset(&mut self) {
        self.velocity.clear();
    }

    fn spec(&self) -> UpdaterSpec {
        UpdaterSpec::Momentum {
            momentum: self.momentum,
            nesterov: self.nesterov,
        }
    }
}
