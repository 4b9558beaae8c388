use std::{fmt, sync::Arc};

use super::MinimizerState;
use crate::{
    OptErr, Result,
    cost::CostFunction,
    error::{check_len, require},
    penalty::Penalty,
    updaters::Update,
};

/// A minimizer of differentiable cost functions that only uses first order information.
pub trait FirstOrderMinimizer {
    /// Validates the configuration and resets the counters of the run.
    ///
    /// # Returns
    /// A configuration error if any of the required collaborators is missing.
    fn init_minimization(&mut self) -> Result<()>;

    /// Initializes and runs the minimization until a terminal state is reached.
    ///
    /// # Returns
    /// The penalized cost at the final variables.
    fn minimize(&mut self) -> Result<f64>;

    /// The current state of the run.
    fn state(&self) -> MinimizerState;

    fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }
}

/// State shared by every first order minimizer: the cost function, the penalty, the
/// convergence criterion and the lifecycle of the run.
pub struct MinimizerBase<F: CostFunction + ?Sized> {
    fun: Option<Box<F>>,
    penalty_weight: f64,
    penalty_type: Option<Arc<dyn Penalty>>,
    tolerance: Option<f64>,
    state: MinimizerState,
    num_variables: usize,
    last_cost: Option<f64>,
}

impl<F: CostFunction + ?Sized> MinimizerBase<F> {
    /// Creates a new unconfigured `MinimizerBase`.
    pub fn new() -> Self {
        Self {
            fun: None,
            penalty_weight: 0.,
            penalty_type: None,
            tolerance: None,
            state: MinimizerState::Unconfigured,
            num_variables: 0,
            last_cost: None,
        }
    }

    pub fn set_cost_function(&mut self, fun: Box<F>) {
        self.fun = Some(fun);
        self.state = MinimizerState::Unconfigured;
    }

    pub fn cost_function(&self) -> Option<&F> {
        self.fun.as_deref()
    }

    pub fn cost_function_mut(&mut self) -> Result<&mut F> {
        self.fun.as_deref_mut().ok_or(OptErr::MissingCostFunction)
    }

    /// Takes the cost function back, leaving the minimizer unconfigured.
    pub fn take_cost_function(&mut self) -> Option<Box<F>> {
        self.state = MinimizerState::Unconfigured;
        self.fun.take()
    }

    /// Sets the non-negative weight of the penalty.
    pub fn set_penalty_weight(&mut self, weight: f64) -> Result<()> {
        require(weight >= 0. && weight.is_finite(), "penalty_weight", weight)?;
        self.penalty_weight = weight;
        Ok(())
    }

    pub fn penalty_weight(&self) -> f64 {
        self.penalty_weight
    }

    pub fn set_penalty_type(&mut self, penalty: Arc<dyn Penalty>) {
        self.penalty_type = Some(penalty);
    }

    pub fn clear_penalty_type(&mut self) {
        self.penalty_type = None;
    }

    pub fn penalty_type(&self) -> Option<&Arc<dyn Penalty>> {
        self.penalty_type.as_ref()
    }

    /// Sets the positive tolerance of the convergence criterion.
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        require(tolerance > 0., "tolerance", tolerance)?;
        self.tolerance = Some(tolerance);
        Ok(())
    }

    /// Disables the convergence criterion.
    pub fn clear_tolerance(&mut self) {
        self.tolerance = None;
    }

    pub fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    pub fn state(&self) -> MinimizerState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: MinimizerState) {
        self.state = state;
    }

    /// Fails unless a step may be taken in the current state.
    pub fn ensure_can_step(&self) -> Result<()> {
        match self.state {
            s if s.can_step() => Ok(()),
            s if s.is_terminal() => Err(OptErr::Terminated { state: s }),
            _ => Err(OptErr::NotInitialized),
        }
    }

    /// Whether the configured penalty needs the learning rate to scale its proximal step.
    pub fn requires_learning_rate(&self) -> bool {
        self.penalty_type
            .as_ref()
            .is_some_and(|p| p.as_proximal().is_some() && p.is_sparse())
    }

    /// Starts a new run at the current variables of the cost function.
    pub(crate) fn init(&mut self) -> Result<()> {
        let fun = self.fun.as_deref().ok_or(OptErr::MissingCostFunction)?;
        self.num_variables = fun.variables().len();
        self.last_cost = None;
        self.state = MinimizerState::Initialized;
        Ok(())
    }

    /// The weighted penalty of `variables`.
    pub fn penalty(&self, variables: &[f64]) -> f64 {
        match &self.penalty_type {
            Some(p) => self.penalty_weight * variables.iter().map(|x| p.penalty(*x)).sum::<f64>(),
            None => 0.,
        }
    }

    /// Adds the weighted gradient of the penalty to `grad`.
    pub fn update_gradient(&self, grad: &mut [f64], variables: &[f64]) {
        let Some(p) = &self.penalty_type else {
            return;
        };

        let w = self.penalty_weight;
        for (g, x) in grad.iter_mut().zip(variables) {
            *g += w * p.penalty_gradient(*x, *g);
        }
    }

    /// The cost of the function at its current variables, including the penalty.
    pub fn penalized_cost(&self) -> Result<f64> {
        let fun = self.fun.as_deref().ok_or(OptErr::MissingCostFunction)?;
        Ok(fun.cost() + self.penalty(fun.variables()))
    }

    /// Queries the gradient of the cost function and adds the penalty's to it.
    ///
    /// # Returns
    /// An error if the variables changed their length since the run started, or if the
    /// gradient doesn't match them.
    pub(crate) fn penalized_gradient(&mut self) -> Result<Vec<f64>> {
        let expected = self.num_variables;
        let fun = self.fun.as_deref_mut().ok_or(OptErr::MissingCostFunction)?;
        check_len("variables", "initial variables", fun.variables().len(), expected)?;

        let mut grad = fun.gradient();
        check_len("gradient", "variables", grad.len(), expected)?;

        let fun = self.fun.as_deref().ok_or(OptErr::MissingCostFunction)?;
        self.update_gradient(&mut grad, fun.variables());
        Ok(grad)
    }

    /// The weight of the proximal step that follows a gradient step of `learning_rate`.
    pub(crate) fn proximal_weight(&self, learning_rate: f64) -> f64 {
        if self.requires_learning_rate() {
            self.penalty_weight * learning_rate
        } else {
            self.penalty_weight
        }
    }

    /// Applies `update` to the variables, followed by the proximal step of the penalty.
    pub(crate) fn descend(&mut self, update: Update, proximal_weight: f64) -> Result<()> {
        let penalty = self.penalty_type.clone();
        let variables = self.cost_function_mut()?.variables_mut();
        update.apply(variables)?;

        if let Some(proximal) = penalty.as_deref().and_then(|p| p.as_proximal()) {
            proximal.update_variable_for_proximity(variables, proximal_weight);
        }

        Ok(())
    }

    /// Whether the cost changed less than the tolerance since the last check. The first
    /// check of a run only records the cost.
    pub(crate) fn has_converged(&mut self, cost: f64) -> bool {
        let last = self.last_cost.replace(cost);

        match (self.tolerance, last) {
            (Some(tol), Some(last)) => (last - cost).abs() <= tol,
            _ => false,
        }
    }

    /// Whether the norm of `grad` is within the tolerance.
    pub(crate) fn gradient_converged(&self, grad: &[f64]) -> bool {
        let Some(tol) = self.tolerance else {
            return false;
        };

        grad.iter().map(|g| g.powi(2)).sum::<f64>().sqrt() <= tol
    }
}

impl<F: CostFunction + ?Sized> Default for MinimizerBase<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: CostFunction + ?Sized> fmt::Debug for MinimizerBase<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinimizerBase")
            .field("has_cost_function", &self.fun.is_some())
            .field("penalty_weight", &self.penalty_weight)
            .field("penalty_type", &self.penalty_type)
            .field("tolerance", &self.tolerance)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
