mod base;
mod context;
mod gradient_descent;
mod state;
mod stochastic;

pub use base::{FirstOrderMinimizer, MinimizerBase};
pub use context::MinimizerContext;
pub use gradient_descent::GradientDescentMinimizer;
pub use state::MinimizerState;
pub use stochastic::FirstOrderStochasticMinimizer;

use crate::{
    OptErr, Result,
    updaters::{SharedUpdater, Update},
};

/// Asks `updater` for the update of a single step.
///
/// Fails with `UpdaterInUse` if another stepping sequence is holding the updater.
pub(crate) fn compute_update(
    updater: &SharedUpdater,
    grad: &[f64],
    learning_rate: f64,
    iteration: u64,
) -> Result<Update> {
    let mut updater = updater.try_lock().ok_or(OptErr::UpdaterInUse)?;
    updater.compute_update(grad, learning_rate, iteration)
}
