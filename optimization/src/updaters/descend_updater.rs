use std::{fmt::Debug, sync::Arc};

use parking_lot::Mutex;

use crate::{Result, error::check_len, specs::UpdaterSpec};

/// Defines the strategy for turning a gradient into a parameter update.
///
/// Stateful implementations size their accumulators after the first gradient they
/// see, every following gradient must have exactly that length until `reset` is called.
pub trait DescendUpdater: Debug + Send {
    /// Computes the update for the current step.
    ///
    /// # Arguments
    /// * `grad` - The gradient of the cost function at the current variables.
    /// * `learning_rate` - The step size for this iteration.
    /// * `iteration` - The amount of steps completed before this one.
    ///
    /// # Returns
    /// The update to apply, or an error if `grad` doesn't match the size of the inner state.
    /// No inner state is modified when an error is returned.
    fn compute_update(&mut self, grad: &[f64], learning_rate: f64, iteration: u64)
    -> Result<Update>;

    /// Drops every accumulator so the next run starts from scratch.
    fn reset(&mut self) {}

    /// Returns the serializable description of this updater.
    fn spec(&self) -> UpdaterSpec;
}

/// An updater shared between minimizers. Only one of them may drive it at a time.
pub type SharedUpdater = Arc<Mutex<dyn DescendUpdater>>;

/// Wraps `updater` so it can be handed to one or more minimizers.
pub fn shared<U: DescendUpdater + 'static>(updater: U) -> SharedUpdater {
    Arc::new(Mutex::new(updater))
}

/// A computed parameter delta, to be subtracted from the variables.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Update {
    delta: Box<[f64]>,
}

impl Update {
    pub(crate) fn new(delta: Box<[f64]>) -> Self {
        Self { delta }
    }

    /// The values that will be subtracted from the variables.
    pub fn delta(&self) -> &[f64] {
        &self.delta
    }

    /// Applies this update, i.e. `variables[i] -= delta[i]`.
    ///
    /// # Returns
    /// An error if there's a size mismatch, in which case `variables` is left untouched.
    pub fn apply(self, variables: &mut [f64]) -> Result<()> {
        check_len("update", "variables", self.delta.len(), variables.len())?;

        for (x, d) in variables.iter_mut().zip(self.delta.iter()) {
            *x -= d;
        }

        Ok(())
    }
}

/// Per-parameter state of a stateful updater, allocated on first use.
#[derive(Debug, Default, Clone)]
pub(crate) struct Accumulator {
    values: Option<Box<[f64]>>,
}

impl Accumulator {
    /// Checks that this accumulator can hold `len` values without touching it.
    pub fn check(&self, len: usize) -> Result<()> {
        match &self.values {
            Some(values) => check_len("gradient", "updater state", len, values.len()),
            None => Ok(()),
        }
    }

    /// Returns the accumulated values, zero-initializing them on first use.
    pub fn get_mut(&mut self, len: usize) -> Result<&mut [f64]> {
        self.check(len)?;

        let values = self
            .values
            .get_or_insert_with(|| vec![0.; len].into_boxed_slice());

        Ok(&mut values[..])
    }

    pub fn clear(&mut self) {
        self.values = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_subtracts_the_delta() {
        let update = Update::new(vec![1., -2., 0.5].into_boxed_slice());
        let mut variables = [1., 1., 1.];

        update.apply(&mut variables).unwrap();

        assert_eq!(variables, [0., 3., 0.5]);
    }

    #[test]
    fn apply_with_wrong_size_leaves_variables_untouched() {
        let update = Update::new(vec![1., 1.].into_boxed_slice());
        let mut variables = [5., 5., 5.];

        assert!(update.apply(&mut variables).is_err());
        assert_eq!(variables, [5., 5., 5.]);
    }

    #[test]
    fn accumulator_is_sized_lazily_and_then_fixed() {
        let mut acc = Accumulator::default();
        assert!(acc.check(7).is_ok());

        assert_eq!(acc.get_mut(3).unwrap(), [0., 0., 0.]);
        assert!(acc.get_mut(4).is_err());

        acc.clear();
        assert_eq!(acc.get_mut(4).unwrap().len(), 4);
    }
}
