use std::{num::NonZeroUsize, sync::Arc};

use log::{debug, info, trace};

use super::{FirstOrderMinimizer, MinimizerBase, MinimizerContext, MinimizerState, compute_update};
use crate::{
    OptErr, Result,
    cost::{CostFunction, StochasticCostFunction},
    error::require,
    learning_rate::LearningRate,
    penalty::Penalty,
    specs::MinimizerBuilder,
    updaters::SharedUpdater,
};

/// Minimizes a stochastic cost function by taking one update step per sample,
/// for a fixed budget of passes through the data.
///
/// The effective learning rate of every step is `step_size * learning_rate(iteration)`,
/// or just `step_size` if no schedule is set.
#[derive(Debug)]
pub struct FirstOrderStochasticMinimizer {
    base: MinimizerBase<dyn StochasticCostFunction>,
    gradient_updater: Option<SharedUpdater>,
    learning_rate: Option<Arc<dyn LearningRate>>,
    step_size: f64,
    num_passes: Option<NonZeroUsize>,
    cur_passes: usize,
    iter_counter: u64,
}

impl FirstOrderStochasticMinimizer {
    /// Creates a new unconfigured `FirstOrderStochasticMinimizer`.
    pub fn new() -> Self {
        Self {
            base: MinimizerBase::new(),
            gradient_updater: None,
            learning_rate: None,
            step_size: 1.,
            num_passes: None,
            cur_passes: 0,
            iter_counter: 0,
        }
    }

    /// Sets the function to minimize, starting from its current variables.
    pub fn set_cost_function(&mut self, fun: Box<dyn StochasticCostFunction>) {
        self.base.set_cost_function(fun);
    }

    /// Takes the cost function back, e.g. to read its final variables.
    pub fn take_cost_function(&mut self) -> Option<Box<dyn StochasticCostFunction>> {
        self.base.take_cost_function()
    }

    /// Sets the strategy turning gradients into updates.
    ///
    /// The updater may be shared with other minimizers as long as they don't step
    /// concurrently.
    pub fn set_gradient_updater(&mut self, updater: SharedUpdater) {
        self.gradient_updater = Some(updater);
    }

    /// Sets the schedule scaling the step size at every iteration.
    pub fn set_learning_rate(&mut self, learning_rate: Arc<dyn LearningRate>) {
        self.learning_rate = Some(learning_rate);
    }

    /// Sets the amount of passes through the data.
    ///
    /// # Arguments
    /// * `num_passes` - The budget of passes, must be positive.
    ///
    /// # Returns
    /// `NonPositivePasses` if the budget isn't positive, in which case the previous
    /// budget is kept.
    pub fn set_number_passes(&mut self, num_passes: i64) -> Result<()> {
        let passes = usize::try_from(num_passes)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(OptErr::NonPositivePasses { got: num_passes })?;

        self.num_passes = Some(passes);
        Ok(())
    }

    pub fn set_penalty_weight(&mut self, weight: f64) -> Result<()> {
        self.base.set_penalty_weight(weight)
    }

    pub fn set_penalty_type(&mut self, penalty: Arc<dyn Penalty>) {
        self.base.set_penalty_type(penalty);
    }

    /// Sets the positive multiplier of the learning rate schedule.
    pub fn set_step_size(&mut self, step_size: f64) -> Result<()> {
        require(step_size > 0. && step_size.is_finite(), "step_size", step_size)?;
        self.step_size = step_size;
        Ok(())
    }

    /// Enables early stopping once a whole pass changes the penalized cost by at most
    /// `tolerance`.
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        self.base.set_tolerance(tolerance)
    }

    pub fn num_passes(&self) -> Option<usize> {
        self.num_passes.map(NonZeroUsize::get)
    }

    /// The amount of passes completed in the current run.
    pub fn cur_passes(&self) -> usize {
        self.cur_passes
    }

    /// The amount of steps taken in the current run.
    pub fn iteration(&self) -> u64 {
        self.iter_counter
    }

    /// The current variables of the cost function, if one is set.
    pub fn variables(&self) -> Option<&[f64]> {
        self.base.cost_function().map(|f| f.variables())
    }

    /// The penalized cost at the current variables.
    pub fn cost(&self) -> Result<f64> {
        self.base.penalized_cost()
    }

    /// The learning rate the next step will use.
    pub fn current_learning_rate(&self) -> f64 {
        match &self.learning_rate {
            Some(lr) => self.step_size * lr.learning_rate(self.iter_counter),
            None => self.step_size,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.base.cost_function().is_none() {
            return Err(OptErr::MissingCostFunction);
        }

        if self.gradient_updater.is_none() {
            return Err(OptErr::MissingUpdater);
        }

        if self.num_passes.is_none() {
            return Err(OptErr::MissingNumberPasses);
        }

        if self.base.requires_learning_rate() && self.learning_rate.is_none() {
            return Err(OptErr::MissingLearningRate);
        }

        Ok(())
    }

    fn reset_updater(&self) -> Result<()> {
        if let Some(updater) = &self.gradient_updater {
            updater.try_lock().ok_or(OptErr::UpdaterInUse)?.reset();
        }

        Ok(())
    }

    /// Takes a single update step on the current sample of the cost function.
    ///
    /// # Returns
    /// An error if the minimizer isn't initialized, already finished, if the gradient
    /// doesn't match the variables or if the updater is in use. The variables are left
    /// untouched when an error is returned.
    pub fn step(&mut self) -> Result<()> {
        self.base.ensure_can_step()?;

        let iteration = self.iter_counter;
        let learning_rate = self.current_learning_rate();
        let proximal_weight = self.base.proximal_weight(learning_rate);

        let updater = self
            .gradient_updater
            .as_ref()
            .ok_or(OptErr::MissingUpdater)?;

        let grad = self.base.penalized_gradient()?;
        let update = compute_update(updater, &grad, learning_rate, iteration)?;
        self.base.descend(update, proximal_weight)?;

        self.iter_counter += 1;
        self.base.set_state(MinimizerState::Running);
        trace!("step completed: iteration={iteration} learning_rate={learning_rate}");

        Ok(())
    }

    /// Marks the end of a pass through the data, checking the stopping criteria.
    ///
    /// Convergence is checked before the pass budget, so a run that converges on its
    /// last pass reports `Converged`.
    ///
    /// # Returns
    /// The state of the minimizer after the pass.
    pub fn complete_pass(&mut self) -> Result<MinimizerState> {
        self.base.ensure_can_step()?;
        let num_passes = self.num_passes.ok_or(OptErr::MissingNumberPasses)?;

        self.cur_passes += 1;
        let cost = self.base.penalized_cost()?;
        debug!(pass = self.cur_passes, cost = cost; "pass completed");

        let state = if self.base.has_converged(cost) {
            MinimizerState::Converged
        } else if self.cur_passes >= num_passes.get() {
            MinimizerState::PassLimitReached
        } else {
            MinimizerState::Running
        };

        if state.is_terminal() {
            info!(
                "minimization finished: state={state:?} passes={} iterations={} cost={cost}",
                self.cur_passes, self.iter_counter
            );
        }

        self.base.set_state(state);
        Ok(state)
    }

    /// Steps over every sample of the cost function once, then completes the pass.
    pub fn run_pass(&mut self) -> Result<MinimizerState> {
        self.base.ensure_can_step()?;
        self.base.cost_function_mut()?.begin_sample();

        while self.base.cost_function_mut()?.next_sample() {
            self.step()?;
        }

        self.complete_pass()
    }

    /// Keeps running passes until a terminal state is reached, without resetting
    /// the counters first.
    ///
    /// # Returns
    /// The penalized cost at the final variables.
    pub fn run(&mut self) -> Result<f64> {
        while !self.base.state().is_terminal() {
            self.run_pass()?;
        }

        self.base.penalized_cost()
    }

    /// Snapshots the configuration and progress of this minimizer.
    pub fn context(&self) -> MinimizerContext {
        MinimizerContext {
            gradient_updater: self.gradient_updater.as_ref().map(|u| u.lock().spec()),
            learning_rate: self.learning_rate.as_ref().map(|lr| lr.spec()),
            penalty_type: self.base.penalty_type().map(|p| p.spec()),
            penalty_weight: self.base.penalty_weight(),
            step_size: self.step_size,
            tolerance: self.base.tolerance(),
            num_passes: self.num_passes,
            cur_passes: self.cur_passes,
            iter_counter: self.iter_counter,
        }
    }

    /// Restores a snapshot taken with `context`.
    ///
    /// Every strategy is rebuilt before anything is replaced, so an invalid context
    /// leaves this minimizer as it was. The minimizer is left unconfigured until
    /// `resume_minimization` is called.
    pub fn load_context(&mut self, context: &MinimizerContext) -> Result<()> {
        let builder = MinimizerBuilder::new();

        let updater = context
            .gradient_updater
            .as_ref()
            .map(|spec| builder.resolve_updater(spec))
            .transpose()?;

        let learning_rate = context
            .learning_rate
            .as_ref()
            .map(|spec| builder.resolve_learning_rate(spec))
            .transpose()?;

        let penalty = context
            .penalty_type
            .as_ref()
            .map(|spec| builder.resolve_penalty(spec))
            .transpose()?;

        let w = context.penalty_weight;
        require(w >= 0. && w.is_finite(), "penalty_weight", w)?;
        let s = context.step_size;
        require(s > 0. && s.is_finite(), "step_size", s)?;
        if let Some(tol) = context.tolerance {
            require(tol > 0., "tolerance", tol)?;
        }

        self.base.set_penalty_weight(w)?;
        match context.tolerance {
            Some(tol) => self.base.set_tolerance(tol)?,
            None => self.base.clear_tolerance(),
        }
        match penalty {
            Some(penalty) => self.base.set_penalty_type(penalty),
            None => self.base.clear_penalty_type(),
        }

        self.gradient_updater = updater;
        self.learning_rate = learning_rate;
        self.step_size = s;
        self.num_passes = context.num_passes;
        self.cur_passes = context.cur_passes;
        self.iter_counter = context.iter_counter;
        self.base.set_state(MinimizerState::Unconfigured);

        Ok(())
    }

    /// Like `init_minimization` but keeps the pass and iteration counters, so a run
    /// restored with `load_context` picks up where it was left.
    pub fn resume_minimization(&mut self) -> Result<()> {
        self.validate()?;
        self.reset_updater()?;
        self.base.init()?;

        if self.num_passes.is_some_and(|n| self.cur_passes >= n.get()) {
            self.base.set_state(MinimizerState::PassLimitReached);
        }

        info!(
            "minimization resumed: passes={} iterations={}",
            self.cur_passes, self.iter_counter
        );

        Ok(())
    }
}

impl Default for FirstOrderStochasticMinimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FirstOrderMinimizer for FirstOrderStochasticMinimizer {
    fn init_minimization(&mut self) -> Result<()> {
        self.validate()?;
        self.reset_updater()?;
        self.base.init()?;

        self.cur_passes = 0;
        self.iter_counter = 0;

        let minibatch = self
            .base
            .cost_function()
            .is_some_and(|f| f.is_true_minibatch());

        info!(
            "minimization initialized: variables={} passes={} minibatch={minibatch}",
            self.variables().map_or(0, <[f64]>::len),
            self.num_passes().unwrap_or_default()
        );

        Ok(())
    }

    fn minimize(&mut self) -> Result<f64> {
        self.init_minimization()?;
        self.run()
    }

    fn state(&self) -> MinimizerState {
        self.base.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cost::{CostFunction, QuadraticCost},
        learning_rate::ConstLearningRate,
        penalty::{L1Penalty, L2Penalty},
        updaters::{GradientDescent, shared},
    };

    fn minimizer(x0: Vec<f64>, samples_per_pass: usize) -> FirstOrderStochasticMinimizer {
        let mut minimizer = FirstOrderStochasticMinimizer::new();
        minimizer.set_cost_function(Box::new(QuadraticCost::new(x0, samples_per_pass)));
        minimizer.set_gradient_updater(shared(GradientDescent::new()));
        minimizer.set_learning_rate(Arc::new(ConstLearningRate::new(0.1).unwrap()));
        minimizer.set_number_passes(3).unwrap();
        minimizer
    }

    #[test]
    fn init_requires_every_collaborator_in_order() {
        let mut minimizer = FirstOrderStochasticMinimizer::new();
        assert_eq!(
            minimizer.init_minimization(),
            Err(OptErr::MissingCostFunction)
        );

        minimizer.set_cost_function(Box::new(QuadraticCost::new(vec![1.], 1)));
        assert_eq!(minimizer.init_minimization(), Err(OptErr::MissingUpdater));

        minimizer.set_gradient_updater(shared(GradientDescent::new()));
        assert_eq!(
            minimizer.init_minimization(),
            Err(OptErr::MissingNumberPasses)
        );

        minimizer.set_number_passes(1).unwrap();
        assert!(minimizer.init_minimization().is_ok());
        assert_eq!(minimizer.state(), MinimizerState::Initialized);
    }

    #[test]
    fn stepping_before_init_fails() {
        let mut minimizer = minimizer(vec![1.], 1);
        assert_eq!(minimizer.step(), Err(OptErr::NotInitialized));
        assert_eq!(minimizer.variables(), Some(&[1.][..]));
    }

    #[test]
    fn step_uses_the_scheduled_learning_rate() {
        let mut minimizer = minimizer(vec![10.], 1);
        minimizer.set_step_size(0.5).unwrap();
        minimizer.init_minimization().unwrap();

        minimizer.step().unwrap();

        // 10 - 0.5 * 0.1 * 20
        assert_eq!(minimizer.variables(), Some(&[9.][..]));
        assert_eq!(minimizer.iteration(), 1);
        assert_eq!(minimizer.state(), MinimizerState::Running);
    }

    #[test]
    fn step_size_alone_is_the_learning_rate() {
        let mut minimizer = FirstOrderStochasticMinimizer::new();
        minimizer.set_cost_function(Box::new(QuadraticCost::new(vec![4.], 1)));
        minimizer.set_gradient_updater(shared(GradientDescent::new()));
        minimizer.set_number_passes(1).unwrap();
        minimizer.set_step_size(0.25).unwrap();
        minimizer.init_minimization().unwrap();

        minimizer.step().unwrap();

        assert_eq!(minimizer.variables(), Some(&[2.][..]));
    }

    #[test]
    fn pass_budget_ends_the_run() {
        let mut minimizer = minimizer(vec![1.], 2);
        minimizer.init_minimization().unwrap();

        assert_eq!(minimizer.run_pass(), Ok(MinimizerState::Running));
        assert_eq!(minimizer.run_pass(), Ok(MinimizerState::Running));
        assert_eq!(minimizer.run_pass(), Ok(MinimizerState::PassLimitReached));

        assert_eq!(minimizer.cur_passes(), 3);
        assert_eq!(minimizer.iteration(), 6);
        assert!(matches!(
            minimizer.step(),
            Err(OptErr::Terminated {
                state: MinimizerState::PassLimitReached
            })
        ));
    }

    #[test]
    fn tolerance_stops_the_run_early() {
        let mut minimizer = minimizer(vec![1.], 10);
        minimizer.set_number_passes(1000).unwrap();
        minimizer.set_tolerance(1e-6).unwrap();

        let cost = minimizer.minimize().unwrap();

        assert_eq!(minimizer.state(), MinimizerState::Converged);
        assert!(minimizer.cur_passes() < 1000);
        assert!(cost < 1e-5);
    }

    #[test]
    fn init_resets_the_counters() {
        let mut minimizer = minimizer(vec![1.], 2);
        minimizer.minimize().unwrap();
        assert_eq!(minimizer.cur_passes(), 3);

        minimizer.init_minimization().unwrap();
        assert_eq!(minimizer.cur_passes(), 0);
        assert_eq!(minimizer.iteration(), 0);
    }

    #[test]
    fn sparse_penalty_requires_a_learning_rate() {
        let mut minimizer = FirstOrderStochasticMinimizer::new();
        minimizer.set_cost_function(Box::new(QuadraticCost::new(vec![1.], 1)));
        minimizer.set_gradient_updater(shared(GradientDescent::new()));
        minimizer.set_number_passes(1).unwrap();
        minimizer.set_penalty_type(Arc::new(L1Penalty));
        minimizer.set_penalty_weight(0.1).unwrap();

        let err = minimizer.init_minimization().unwrap_err();
        assert_eq!(err, OptErr::MissingLearningRate);
        assert!(err.is_config());

        minimizer.set_penalty_type(Arc::new(L2Penalty));
        assert!(minimizer.init_minimization().is_ok());
    }

    #[test]
    fn invalid_setters_keep_the_previous_value() {
        let mut minimizer = minimizer(vec![1.], 1);

        assert_eq!(
            minimizer.set_number_passes(0),
            Err(OptErr::NonPositivePasses { got: 0 })
        );
        assert_eq!(
            minimizer.set_number_passes(-1),
            Err(OptErr::NonPositivePasses { got: -1 })
        );
        assert_eq!(minimizer.num_passes(), Some(3));

        assert!(minimizer.set_step_size(0.).is_err());
        assert!(minimizer.set_penalty_weight(-0.5).is_err());
        assert_eq!(minimizer.context().step_size, 1.);
        assert_eq!(minimizer.context().penalty_weight, 0.);
    }

    #[test]
    fn busy_updater_fails_the_step_without_side_effects() {
        let updater = shared(GradientDescent::new());
        let mut minimizer = minimizer(vec![1.], 1);
        minimizer.set_gradient_updater(updater.clone());
        minimizer.init_minimization().unwrap();

        let guard = updater.lock();
        assert_eq!(minimizer.step(), Err(OptErr::UpdaterInUse));
        drop(guard);

        assert_eq!(minimizer.variables(), Some(&[1.][..]));
        assert_eq!(minimizer.iteration(), 0);
        assert!(minimizer.step().is_ok());
    }

    #[test]
    fn restored_context_resumes_the_counters() {
        let mut minimizer = minimizer(vec![1.], 2);
        minimizer.init_minimization().unwrap();
        minimizer.run_pass().unwrap();
        let context = minimizer.context();

        let mut restored = FirstOrderStochasticMinimizer::new();
        let fun = minimizer.take_cost_function().unwrap();
        restored.set_cost_function(fun);
        restored.load_context(&context).unwrap();
        restored.resume_minimization().unwrap();

        assert_eq!(restored.cur_passes(), 1);
        assert_eq!(restored.iteration(), 2);
        assert_eq!(restored.context(), context);

        restored.run().unwrap();
        assert_eq!(restored.cur_passes(), 3);
        assert_eq!(restored.state(), MinimizerState::PassLimitReached);
    }

    #[test]
    fn loading_a_context_replaces_every_field() {
        let source = minimizer(vec![1.], 1);
        let context = source.context();
        assert_eq!(context.penalty_type, None);
        assert_eq!(context.tolerance, None);

        let mut target = minimizer(vec![1.], 1);
        target.set_penalty_type(Arc::new(L2Penalty));
        target.set_penalty_weight(0.5).unwrap();
        target.set_tolerance(1e-3).unwrap();
        target.set_step_size(2.).unwrap();

        target.load_context(&context).unwrap();

        assert_eq!(target.context(), context);
    }

    #[test]
    fn invalid_context_is_rejected_as_a_whole() {
        let mut minimizer = minimizer(vec![1.], 1);
        let mut context = minimizer.context();
        context.step_size = -1.;
        context.cur_passes = 7;

        assert!(minimizer.load_context(&context).is_err());
        assert_eq!(minimizer.cur_passes(), 0);
        assert_eq!(minimizer.context().step_size, 1.);
    }

    #[test]
    fn taken_cost_function_keeps_the_result() {
        let mut minimizer = minimizer(vec![10.], 1);
        minimizer.minimize().unwrap();

        let fun = minimizer.take_cost_function().unwrap();
        // three steps of x -= 0.2x
        assert!((fun.variables()[0] - 5.12).abs() < 1e-12);
        assert_eq!(minimizer.state(), MinimizerState::Unconfigured);
    }
}
