use std::sync::Arc;

use log::debug;

use super::{LearningRateSpec, MinimizerSpec, PenaltySpec, UpdaterSpec};
use crate::{
    OptErr, Result,
    learning_rate::{
        ConstLearningRate, InverseScalingLearningRate, LearningRate, StepDecayLearningRate,
    },
    minimizer::FirstOrderStochasticMinimizer,
    penalty::{ElasticNetPenalty, L1Penalty, L2Penalty, Penalty, ProximalL2Penalty},
    updaters::{
        AdaDelta, AdaGrad, Adam, GradientDescent, Momentum, RmsProp, SharedUpdater, shared,
    },
};

/// Builds minimizers and their strategies given a specification.
#[derive(Debug, Default)]
pub struct MinimizerBuilder;

impl MinimizerBuilder {
    /// Creates a new `MinimizerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `FirstOrderStochasticMinimizer` following a spec.
    ///
    /// The returned minimizer has no cost function yet, it has to be set before
    /// initializing the minimization.
    ///
    /// # Arguments
    /// * `spec` - The specification for the minimizer.
    ///
    /// # Returns
    /// The configured minimizer, or an error if any of the hyperparameters is invalid.
    pub fn build(&self, spec: &MinimizerSpec) -> Result<FirstOrderStochasticMinimizer> {
        debug!("building minimizer from {spec:?}");

        let mut minimizer = FirstOrderStochasticMinimizer::new();
        minimizer.set_gradient_updater(self.resolve_updater(&spec.updater)?);

        if let Some(lr) = &spec.learning_rate {
            minimizer.set_learning_rate(self.resolve_learning_rate(lr)?);
        }

        if let Some(penalty) = &spec.penalty {
            minimizer.set_penalty_type(self.resolve_penalty(penalty)?);
        }

        minimizer.set_penalty_weight(spec.penalty_weight)?;
        minimizer.set_step_size(spec.step_size)?;
        let num_passes = spec.num_passes.get();
        let num_passes = i64::try_from(num_passes).map_err(|_| OptErr::InvalidHyperparameter {
            name: "num_passes",
            value: num_passes as f64,
        })?;
        minimizer.set_number_passes(num_passes)?;

        if let Some(tolerance) = spec.tolerance {
            minimizer.set_tolerance(tolerance)?;
        }

        Ok(minimizer)
    }

    /// Builds a shared updater following a spec.
    pub fn resolve_updater(&self, spec: &UpdaterSpec) -> Result<SharedUpdater> {
        let updater = match *spec {
            UpdaterSpec::GradientDescent => shared(GradientDescent::new()),
            UpdaterSpec::Momentum {
                momentum,
                nesterov: false,
            } => shared(Momentum::new(momentum)?),
            UpdaterSpec::Momentum {
                momentum,
                nesterov: true,
            } => shared(Momentum::nesterov(momentum)?),
            UpdaterSpec::AdaGrad { epsilon } => shared(AdaGrad::new(epsilon)?),
            UpdaterSpec::RmsProp { decay, epsilon } => shared(RmsProp::new(decay, epsilon)?),
            UpdaterSpec::AdaDelta { decay, epsilon } => shared(AdaDelta::new(decay, epsilon)?),
            UpdaterSpec::Adam {
                beta1,
                beta2,
                epsilon,
            } => shared(Adam::new(beta1, beta2, epsilon)?),
        };

        Ok(updater)
    }

    /// Builds a learning rate schedule following a spec.
    pub fn resolve_learning_rate(&self, spec: &LearningRateSpec) -> Result<Arc<dyn LearningRate>> {
        let lr: Arc<dyn LearningRate> = match *spec {
            LearningRateSpec::Constant { learning_rate } => {
                Arc::new(ConstLearningRate::new(learning_rate)?)
            }
            LearningRateSpec::InverseScaling {
                initial,
                intercept,
                slope,
                exponent,
            } => Arc::new(InverseScalingLearningRate::new(
                initial, intercept, slope, exponent,
            )?),
            LearningRateSpec::StepDecay {
                initial,
                step_size,
                gamma,
            } => Arc::new(StepDecayLearningRate::new(initial, step_size, gamma)?),
        };

        Ok(lr)
    }

    /// Builds a penalty following a spec.
    pub fn resolve_penalty(&self, spec: &PenaltySpec) -> Result<Arc<dyn Penalty>> {
        let penalty: Arc<dyn Penalty> = match *spec {
            PenaltySpec::L1 => Arc::new(L1Penalty::new()),
            PenaltySpec::L2 => Arc::new(L2Penalty::new()),
            PenaltySpec::ProximalL2 => Arc::new(ProximalL2Penalty::new()),
            PenaltySpec::ElasticNet { l1_ratio } => Arc::new(ElasticNetPenalty::new(l1_ratio)?),
        };

        Ok(penalty)
    }
}
