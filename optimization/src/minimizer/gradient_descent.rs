use std::{num::NonZeroUsize, sync::Arc};

use log::{debug, info};

use super::{FirstOrderMinimizer, MinimizerBase, MinimizerState, compute_update};
use crate::{
    OptErr, Result,
    cost::CostFunction,
    error::require,
    learning_rate::LearningRate,
    penalty::Penalty,
    updaters::SharedUpdater,
};

/// Minimizes a deterministic cost function using its full gradient at every step.
///
/// The run converges once the norm of the penalized gradient is within the tolerance,
/// and stops after `max_iterations` steps otherwise.
#[derive(Debug)]
pub struct GradientDescentMinimizer {
    base: MinimizerBase<dyn CostFunction>,
    gradient_updater: Option<SharedUpdater>,
    learning_rate: Option<Arc<dyn LearningRate>>,
    step_size: f64,
    max_iterations: NonZeroUsize,
    iter_counter: u64,
}

impl GradientDescentMinimizer {
    /// Creates a new `GradientDescentMinimizer`.
    ///
    /// # Arguments
    /// * `max_iterations` - The maximum amount of steps of a run.
    pub fn new(max_iterations: NonZeroUsize) -> Self {
        Self {
            base: MinimizerBase::new(),
            gradient_updater: None,
            learning_rate: None,
            step_size: 1.,
            max_iterations,
            iter_counter: 0,
        }
    }

    pub fn set_cost_function(&mut self, fun: Box<dyn CostFunction>) {
        self.base.set_cost_function(fun);
    }

    pub fn take_cost_function(&mut self) -> Option<Box<dyn CostFunction>> {
        self.base.take_cost_function()
    }

    pub fn set_gradient_updater(&mut self, updater: SharedUpdater) {
        self.gradient_updater = Some(updater);
    }

    pub fn set_learning_rate(&mut self, learning_rate: Arc<dyn LearningRate>) {
        self.learning_rate = Some(learning_rate);
    }

    pub fn set_step_size(&mut self, step_size: f64) -> Result<()> {
        require(step_size > 0. && step_size.is_finite(), "step_size", step_size)?;
        self.step_size = step_size;
        Ok(())
    }

    pub fn set_penalty_weight(&mut self, weight: f64) -> Result<()> {
        self.base.set_penalty_weight(weight)
    }

    pub fn set_penalty_type(&mut self, penalty: Arc<dyn Penalty>) {
        self.base.set_penalty_type(penalty);
    }

    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        self.base.set_tolerance(tolerance)
    }

    pub fn iteration(&self) -> u64 {
        self.iter_counter
    }

    pub fn variables(&self) -> Option<&[f64]> {
        self.base.cost_function().map(|f| f.variables())
    }

    /// Takes a single step along the full gradient.
    ///
    /// # Returns
    /// The state of the minimizer after the step. No update is applied when the
    /// gradient is already within the tolerance.
    pub fn step(&mut self) -> Result<MinimizerState> {
        self.base.ensure_can_step()?;

        let iteration = self.iter_counter;
        let learning_rate = match &self.learning_rate {
            Some(lr) => self.step_size * lr.learning_rate(iteration),
            None => self.step_size,
        };
        let proximal_weight = self.base.proximal_weight(learning_rate);

        let updater = self
            .gradient_updater
            .as_ref()
            .ok_or(OptErr::MissingUpdater)?;

        let grad = self.base.penalized_gradient()?;
        if self.base.gradient_converged(&grad) {
            debug!("gradient within tolerance at iteration {iteration}");
            self.base.set_state(MinimizerState::Converged);
            return Ok(MinimizerState::Converged);
        }

        let update = compute_update(updater, &grad, learning_rate, iteration)?;
        self.base.descend(update, proximal_weight)?;
        self.iter_counter += 1;

        let state = if self.iter_counter >= self.max_iterations.get() as u64 {
            MinimizerState::PassLimitReached
        } else {
            MinimizerState::Running
        };

        self.base.set_state(state);
        Ok(state)
    }
}

impl FirstOrderMinimizer for GradientDescentMinimizer {
    fn init_minimization(&mut self) -> Result<()> {
        if self.base.cost_function().is_none() {
            return Err(OptErr::MissingCostFunction);
        }

        let updater = self
            .gradient_updater
            .as_ref()
            .ok_or(OptErr::MissingUpdater)?;

        if self.base.requires_learning_rate() && self.learning_rate.is_none() {
            return Err(OptErr::MissingLearningRate);
        }

        updater.try_lock().ok_or(OptErr::UpdaterInUse)?.reset();
        self.base.init()?;
        self.iter_counter = 0;

        Ok(())
    }

    fn minimize(&mut self) -> Result<f64> {
        self.init_minimization()?;

        while !self.base.state().is_terminal() {
            self.step()?;
        }

        let cost = self.base.penalized_cost()?;
        info!(
            "minimization finished: state={:?} iterations={} cost={cost}",
            self.base.state(),
            self.iter_counter
        );

        Ok(cost)
    }

    fn state(&self) -> MinimizerState {
        self.base.state()
    }
}
