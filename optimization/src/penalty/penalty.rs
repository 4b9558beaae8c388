use std::fmt::Debug;

use crate::specs::PenaltySpec;

/// A regularization term added to the cost of the minimized function.
///
/// Penalties expose their capabilities through `as_proximal` and `is_sparse`, which the
/// minimizers query once, when they are configured.
pub trait Penalty: Debug + Send + Sync {
    /// The unweighted penalty of a single variable.
    fn penalty(&self, variable: f64) -> f64;

    /// The unweighted contribution of this penalty to the gradient of a single variable.
    ///
    /// # Arguments
    /// * `variable` - The current value of the variable.
    /// * `gradient` - The gradient of the cost function with respect to the variable.
    fn penalty_gradient(&self, variable: f64, gradient: f64) -> f64;

    /// Returns this penalty as a proximal one, if it applies a correction after each step.
    fn as_proximal(&self) -> Option<&dyn ProximalPenalty> {
        None
    }

    /// Whether the proximal correction drives variables exactly to zero. The weight of
    /// such corrections has to be scaled by the learning rate of the step.
    fn is_sparse(&self) -> bool {
        false
    }

    /// Returns the serializable description of this penalty.
    fn spec(&self) -> PenaltySpec;
}

/// A penalty applied through its proximal operator after every gradient step.
pub trait ProximalPenalty: Penalty {
    /// Moves `variables` to the proximal point of the penalty.
    ///
    /// # Arguments
    /// * `variables` - The variables right after the gradient step.
    /// * `weight` - The effective weight of the penalty. A zero weight leaves `variables`
    ///   untouched.
    fn update_variable_for_proximity(&self, variables: &mut [f64], weight: f64);
}

/// Shrinks `x` towards zero by `threshold`, clipping to zero when `|x| <= threshold`.
#[inline]
pub fn soft_threshold(x: f64, threshold: f64) -> f64 {
    if x > threshold {
        x - threshold
    } else if x < -threshold {
        x + threshold
    } else {
        0.
    }
}
