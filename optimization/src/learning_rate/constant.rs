use super::LearningRate;
use crate::{Result, error::require, specs::LearningRateSpec};

/// A learning rate that doesn't change over time.
#[derive(Debug, Clone, Copy)]
pub struct ConstLearningRate {
    learning_rate: f64,
}

impl ConstLearningRate {
    /// Creates a new `ConstLearningRate`.
    ///
    /// # Arguments
    /// * `learning_rate` - The positive value returned for every iteration.
    ///
    /// # Returns
    /// A new `ConstLearningRate` or an error if `learning_rate` is not positive.
    pub fn new(learning_rate: f64) -> Result<Self> {
        require(learning_rate > 0., "learning_rate", learning_rate)?;
        Ok(Self { learning_rate })
    }
}

impl LearningRate for ConstLearningRate {
    fn learning_rate(&self, _iteration: u64) -> f64 {
        self.learning_rate
    }

    fn spec(&self) -> LearningRateSpec {
        LearningRateSpec::Constant {
            learning_rate: self.learning_rate,
        }
    }
}
