use super::{Penalty, ProximalPenalty};
use crate::specs::PenaltySpec;

/// The squared L2 norm, `x^2 / 2`, added to the gradient at every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct L2Penalty;

impl L2Penalty {
    pub fn new() -> Self {
        Self
    }
}

impl Penalty for L2Penalty {
    fn penalty(&self, variable: f64) -> f64 {
        0.5 * variable.powi(2)
    }

    fn penalty_gradient(&self, variable: f64, _gradient: f64) -> f64 {
        variable
    }

    fn spec(&self) -> PenaltySpec {
        PenaltySpec::L2
    }
}

/// The squared L2 norm applied through its proximal operator, `x / (1 + w)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProximalL2Penalty;

impl ProximalL2Penalty {
    pub fn new() -> Self {
        Self
    }
}

impl Penalty for ProximalL2Penalty {
    fn penalty(&self, variable: f64) -> f64 {
        0.5 * variable.powi(2)
    }

    fn penalty_gradient(&self, _variable: f64, _gradient: f64) -> f64 {
        0.
    }

    fn as_proximal(&self) -> Option<&dyn ProximalPenalty> {
        Some(self)
    }

    fn spec(&self) -> PenaltySpec {
        PenaltySpec::ProximalL2
    }
}

impl ProximalPenalty for ProximalL2Penalty {
    fn update_variable_for_proximity(&self, variables: &mut [f64], weight: f64) {
        if weight == 0. {
            return;
        }

        let denom = 1. + weight;
        for x in variables.iter_mut() {
            *x /= denom;
        }
    }
}
