mod builder;

use serde::{Deserialize, Serialize};
use std::num::{NonZeroU64, NonZeroUsize};

pub use builder::MinimizerBuilder;

/// The specification for the `DescendUpdater` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdaterSpec {
    GradientDescent,
    Momentum {
        momentum: f64,
        #[serde(default)]
        nesterov: bool,
    },
    AdaGrad {
        epsilon: f64,
    },
    RmsProp {
        decay: f64,
        epsilon: f64,
    },
    AdaDelta {
        decay: f64,
        epsilon: f64,
    },
    Adam {
        beta1: f64,
        beta2: f64,
        epsilon: f64,
    },
}

/// The specification for the `LearningRate` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningRateSpec {
    Constant {
        learning_rate: f64,
    },
    InverseScaling {
        initial: f64,
        intercept: f64,
        slope: f64,
        exponent: f64,
    },
    StepDecay {
        initial: f64,
        step_size: NonZeroU64,
        gamma: f64,
    },
}

/// The specification for the `Penalty` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltySpec {
    L1,
    L2,
    ProximalL2,
    ElasticNet { l1_ratio: f64 },
}

/// The specification for the `FirstOrderStochasticMinimizer` struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizerSpec {
    pub updater: UpdaterSpec,
    #[serde(default)]
    pub learning_rate: Option<LearningRateSpec>,
    #[serde(default)]
    pub penalty: Option<PenaltySpec>,
    #[serde(default)]
    pub penalty_weight: f64,
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    pub num_passes: NonZeroUsize,
    #[serde(default)]
    pub tolerance: Option<f64>,
}

fn default_step_size() -> f64 {
    1.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizer_spec_from_json_fills_defaults() {
        let json = r#"{
            "updater": { "momentum": { "momentum": 0.9 } },
            "learning_rate": { "constant": { "learning_rate": 0.05 } },
            "penalty": "l1",
            "penalty_weight": 0.01,
            "num_passes": 3
        }"#;

        let spec: MinimizerSpec = serde_json::from_str(json).unwrap();

        assert_eq!(
            spec.updater,
            UpdaterSpec::Momentum {
                momentum: 0.9,
                nesterov: false
            }
        );
        assert_eq!(spec.penalty, Some(PenaltySpec::L1));
        assert_eq!(spec.step_size, 1.);
        assert_eq!(spec.num_passes.get(), 3);
        assert_eq!(spec.tolerance, None);
    }

    #[test]
    fn zero_passes_do_not_deserialize() {
        let json = r#"{ "updater": "gradient_descent", "num_passes": 0 }"#;
        assert!(serde_json::from_str::<MinimizerSpec>(json).is_err());
    }
}
