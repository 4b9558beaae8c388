use std::num::NonZeroU64;

use super::LearningRate;
use crate::{Result, error::require, specs::LearningRateSpec};

/// Multiplies the learning rate by `gamma` every `step_size` iterations.
#[derive(Debug, Clone, Copy)]
pub struct StepDecayLearningRate {
    initial: f64,
    step_size: NonZeroU64,
    gamma: f64,
}

impl StepDecayLearningRate {
    /// Creates a new `StepDecayLearningRate`.
    ///
    /// # Arguments
    /// * `initial` - The learning rate of the first `step_size` iterations.
    /// * `step_size` - The amount of iterations between decays.
    /// * `gamma` - The decay factor, in `(0, 1]`.
    pub fn new(initial: f64, step_size: NonZeroU64, gamma: f64) -> Result<Self> {
        require(initial > 0., "initial", initial)?;
        require(gamma > 0. && gamma <= 1., "gamma", gamma)?;

        Ok(Self {
            initial,
            step_size,
            gamma,
        })
    }
}

impl LearningRate for StepDecayLearningRate {
    fn learning_rate(&self, iteration: u64) -> f64 {
        let decays = iteration / self.step_size.get();
        self.initial * self.gamma.powf(decays as f64)
    }

    fn spec(&self) -> LearningRateSpec {
        LearningRateSpec::StepDecay {
            initial: self.initial,
            step_size: self.step_size,
            gamma: self.gamma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_once_per_window() {
        let lr = StepDecayLearningRate::new(0.1, NonZeroU64::new(3).unwrap(), 0.5).unwrap();

        assert_eq!(lr.learning_rate(0), 0.1);
        assert_eq!(lr.learning_rate(2), 0.1);
        assert_eq!(lr.learning_rate(3), 0.05);
        assert_eq!(lr.learning_rate(6), 0.025);
    }

    #[test]
    fn gamma_outside_the_unit_interval_is_rejected() {
        let step = NonZeroU64::new(1).unwrap();
        assert!(StepDecayLearningRate::new(0.1, step, 0.).is_err());
        assert!(StepDecayLearningRate::new(0.1, step, 1.5).is_err());
    }
}
