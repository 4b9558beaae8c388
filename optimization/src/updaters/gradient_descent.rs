use super::{DescendUpdater, Update};
use crate::{Result, specs::UpdaterSpec};

/// Plain gradient descent, the update is the gradient scaled by the learning rate.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradientDescent;

impl GradientDescent {
    /// Creates a new `GradientDescent` updater.
    pub fn new() -> Self {
        Self
    }
}

impl DescendUpdater for GradientDescent {
    fn compute_update(&mut self, grad: &[f64], lr: f64, _iteration: u64) -> Result<Update> {
        let delta = grad.iter().map(|g| lr * g).collect();
        Ok(Update::new(delta))
    }

    fn spec(&self) -> UpdaterSpec {
        UpdaterSpec::GradientDescent
    }
}
