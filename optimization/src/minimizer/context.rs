use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::specs::{LearningRateSpec, PenaltySpec, UpdaterSpec};

/// A snapshot of the configuration and progress of a `FirstOrderStochasticMinimizer`.
///
/// The accumulators of stateful updaters are not part of the snapshot, a restored
/// minimizer starts them over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizerContext {
    pub gradient_updater: Option<UpdaterSpec>,
    pub learning_rate: Option<LearningRateSpec>,
    pub penalty_type: Option<PenaltySpec>,
    pub penalty_weight: f64,
    pub step_size: f64,
    pub tolerance: Option<f64>,
    pub num_passes: Option<NonZeroUsize>,
    /// Completed passes through the data.
    pub cur_passes: usize,
    /// Completed update steps.
    pub iter_counter: u64,
}
