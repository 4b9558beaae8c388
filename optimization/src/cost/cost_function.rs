/// A differentiable function to be minimized, which owns the variables it's evaluated at.
///
/// Minimizers treat gradient computation as a black box: a gradient query is a blocking
/// call that returns a complete gradient, however it's computed internally.
pub trait CostFunction: Send {
    /// The current variables.
    fn variables(&self) -> &[f64];

    /// The current variables, to be updated in place.
    fn variables_mut(&mut self) -> &mut [f64];

    /// The cost at the current variables.
    fn cost(&self) -> f64;

    /// The gradient at the current variables, with the same length as `variables`.
    fn gradient(&mut self) -> Vec<f64>;

    /// Whether gradients come from sub-sampled mini-batches, in which case repeated
    /// queries at the same variables may yield different gradients.
    fn is_true_minibatch(&self) -> bool {
        false
    }
}

/// A cost function whose gradient is evaluated over a sequence of samples (or
/// mini-batches) making up a pass through the data.
pub trait StochasticCostFunction: CostFunction {
    /// Starts a new pass through the data.
    fn begin_sample(&mut self);

    /// Moves to the next sample of the current pass.
    ///
    /// # Returns
    /// `false` if the pass is over.
    fn next_sample(&mut self) -> bool;
}
