use std::fmt::Debug;

use crate::specs::LearningRateSpec;

/// Maps the iteration counter of a minimizer to a step size multiplier.
///
/// Implementations are pure functions of the counter and of the configuration
/// they were constructed with, so a single schedule can be shared by several
/// minimizers.
pub trait LearningRate: Debug + Send + Sync {
    /// Returns the learning rate for the given iteration.
    ///
    /// # Arguments
    /// * `iteration` - The amount of completed update steps.
    fn learning_rate(&self, iteration: u64) -> f64;

    /// Returns the serializable description of this schedule.
    fn spec(&self) -> LearningRateSpec;
}
