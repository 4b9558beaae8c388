use std::{fs, num::NonZeroUsize, path::Path};

use anyhow::{Context, Result};
use optimization::specs::{LearningRateSpec, MinimizerSpec, UpdaterSpec};
use serde::{Deserialize, Serialize};

/// The problem a run minimizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemSpec {
    /// The bowl `Σ x_i^2` starting at `x0`.
    Quadratic {
        x0: Vec<f64>,
        samples_per_pass: usize,
    },
    /// A synthetic linear regression.
    LeastSquares {
        samples: usize,
        features: usize,
        #[serde(default)]
        noise_std: f64,
        batch_size: NonZeroUsize,
        #[serde(default)]
        seed: Option<u64>,
    },
}

/// The configuration of a single minimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub minimizer: MinimizerSpec,
    pub problem: ProblemSpec,
}

impl RunConfig {
    /// Loads a `RunConfig` from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;

        serde_json::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            minimizer: MinimizerSpec {
                updater: UpdaterSpec::Adam {
                    beta1: 0.9,
                    beta2: 0.999,
                    epsilon: 1e-8,
                },
                learning_rate: Some(LearningRateSpec::Constant {
                    learning_rate: 0.01,
                }),
                penalty: None,
                penalty_weight: 0.,
                step_size: 1.,
                num_passes: NonZeroUsize::new(100).unwrap_or(NonZeroUsize::MIN),
                tolerance: Some(1e-9),
            },
            problem: ProblemSpec::LeastSquares {
                samples: 1000,
                features: 8,
                noise_std: 0.05,
                batch_size: NonZeroUsize::new(32).unwrap_or(NonZeroUsize::MIN),
                seed: Some(42),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_quadratic_run() {
        let json = r#"{
            "minimizer": {
                "updater": "gradient_descent",
                "learning_rate": { "constant": { "learning_rate": 0.1 } },
                "num_passes": 1
            },
            "problem": { "quadratic": { "x0": [10.0], "samples_per_pass": 50 } }
        }"#;

        let config: RunConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.problem,
            ProblemSpec::Quadratic {
                x0: vec![10.],
                samples_per_pass: 50
            }
        );
        assert_eq!(config.minimizer.updater, UpdaterSpec::GradientDescent);
        assert_eq!(config.minimizer.step_size, 1.);
    }

    #[test]
    fn default_run_is_a_regression() {
        let config = RunConfig::default();
        assert_eq!(config.minimizer.num_passes.get(), 100);
        assert!(matches!(
            config.problem,
            ProblemSpec::LeastSquares { batch_size, .. } if batch_size.get() == 32
        ));
    }

    #[test]
    fn bundled_configs_load() {
        for name in ["quadratic.json", "sparse_regression.json"] {
            let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs").join(name);
            RunConfig::load(&path).unwrap();
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let err = RunConfig::load("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
