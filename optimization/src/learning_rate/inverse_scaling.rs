use super::LearningRate;
use crate::{Result, error::require, specs::LearningRateSpec};

/// A learning rate that decays polynomially with the iteration counter:
///
/// `initial / (intercept + slope * t) ^ exponent`
#[derive(Debug, Clone, Copy)]
pub struct InverseScalingLearningRate {
    initial: f64,
    intercept: f64,
    slope: f64,
    exponent: f64,
}

impl InverseScalingLearningRate {
    /// Creates a new `InverseScalingLearningRate`.
    ///
    /// # Arguments
    /// * `initial` - The numerator of the schedule, must be positive.
    /// * `intercept` - The base of the denominator at iteration zero, must be positive.
    /// * `slope` - How fast the denominator grows per iteration, must not be negative.
    /// * `exponent` - The power applied to the denominator, must not be negative.
    pub fn new(initial: f64, intercept: f64, slope: f64, exponent: f64) -> Result<Self> {
        require(initial > 0., "initial", initial)?;
        require(intercept > 0., "intercept", intercept)?;
        require(slope >= 0., "slope", slope)?;
        require(exponent >= 0., "exponent", exponent)?;

        Ok(Self {
            initial,
            intercept,
            slope,
            exponent,
        })
    }

    /// The inverse time decay `initial / (1 + decay * t)`.
    pub fn inverse_time(initial: f64, decay: f64) -> Result<Self> {
        Self::new(initial, 1., decay, 1.)
    }

    /// The inverse square root decay `initial / sqrt(1 + decay * t)`.
    pub fn inverse_sqrt(initial: f64, decay: f64) -> Result<Self> {
        Self::new(initial, 1., decay, 0.5)
    }
}

impl LearningRate for InverseScalingLearningRate {
    fn learning_rate(&self, iteration: u64) -> f64 {
        let base = self.intercept + self.slope * iteration as f64;
        self.initial / base.powf(self.exponent)
    }

    fn spec(&self) -> LearningRateSpec {
        LearningRateSpec::InverseScaling {
            initial: self.initial,
            intercept: self.intercept,
            slope: self.slope,
            exponent: self.exponent,
        }
    }
}
