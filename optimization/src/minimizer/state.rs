use serde::{Deserialize, Serialize};

/// The lifecycle of a minimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimizerState {
    #[default]
    Unconfigured,
    Initialized,
    Running,
    Converged,
    PassLimitReached,
}

impl MinimizerState {
    /// Whether no more steps may be taken in this run.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged | Self::PassLimitReached)
    }

    /// Whether a step may be taken in this state.
    pub fn can_step(self) -> bool {
        matches!(self, Self::Initialized | Self::Running)
    }
}
