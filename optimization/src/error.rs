use std::{
    error::Error,
    fmt::{self, Display},
};

use crate::minimizer::MinimizerState;

/// The result type used in the entire optimization module.
pub type Result<T> = std::result::Result<T, OptErr>;

/// The optimization module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum OptErr {
    MissingCostFunction,
    MissingUpdater,
    MissingNumberPasses,
    NonPositivePasses {
        got: i64,
    },
    MissingLearningRate,
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
    },
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    NotInitialized,
    Terminated {
        state: MinimizerState,
    },
    UpdaterInUse,
}

impl OptErr {
    /// Whether this error was caused by a missing or invalid configuration value,
    /// as opposed to a failure while stepping.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            OptErr::MissingCostFunction
                | OptErr::MissingUpdater
                | OptErr::MissingNumberPasses
                | OptErr::NonPositivePasses { .. }
                | OptErr::MissingLearningRate
                | OptErr::InvalidHyperparameter { .. }
        )
    }
}

impl Display for OptErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptErr::MissingCostFunction => "Cost function must be set".to_string(),
            OptErr::MissingUpdater => "Descend updater must be set".to_string(),
            OptErr::MissingNumberPasses => {
                "The number of passes through the data must be set".to_string()
            }
            OptErr::NonPositivePasses { got } => {
                format!("The number ({got}) of passes through the data must be positive")
            }
            OptErr::MissingLearningRate => {
                "Learning rate must be set when a sparse penalty (eg, L1) is used".to_string()
            }
            OptErr::InvalidHyperparameter { name, value } => {
                format!("Invalid value {value} for hyperparameter {name}")
            }
            OptErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => format!(
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            OptErr::NotInitialized => {
                "The minimizer must be initialized before stepping".to_string()
            }
            OptErr::Terminated { state } => {
                format!("The minimizer already reached a terminal state: {state:?}")
            }
            OptErr::UpdaterInUse => {
                "The descend updater is being driven by another minimizer".to_string()
            }
        };

        write!(f, "{s}")
    }
}

impl Error for OptErr {}

/// Fails with `SizeMismatch` unless `got == expected`.
pub(crate) fn check_len(a: &'static str, b: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(OptErr::SizeMismatch {
            a,
            b,
            got,
            expected,
        });
    }

    Ok(())
}

/// Fails with `InvalidHyperparameter` unless `ok` holds.
pub(crate) fn require(ok: bool, name: &'static str, value: f64) -> Result<()> {
    if !ok {
        return Err(OptErr::InvalidHyperparameter { name, value });
    }

    Ok(())
}
