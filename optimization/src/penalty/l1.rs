use super::{Penalty, ProximalPenalty, soft_threshold};
use crate::specs::PenaltySpec;

/// The L1 norm, `|x|`, applied through soft thresholding.
#[derive(Debug, Default, Clone, Copy)]
pub struct L1Penalty;

impl L1Penalty {
    pub fn new() -> Self {
        Self
    }
}

impl Penalty for L1Penalty {
    fn penalty(&self, variable: f64) -> f64 {
        variable.abs()
    }

    // Handled entirely by the proximal step.
    fn penalty_gradient(&self, _variable: f64, _gradient: f64) -> f64 {
        0.
    }

    fn as_proximal(&self) -> Option<&dyn ProximalPenalty> {
        Some(self)
    }

    fn is_sparse(&self) -> bool {
        true
    }

    fn spec(&self) -> PenaltySpec {
        PenaltySpec::L1
    }
}

impl ProximalPenalty for L1Penalty {
    fn update_variable_for_proximity(&self, variables: &mut [f64], weight: f64) {
        if weight == 0. {
            return;
        }

        for x in variables.iter_mut() {
            *x = soft_threshold(*x, weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proximity_soft_thresholds_every_variable() {
        let mut variables = [2., -0.5, 0.125, -0.25];
        L1Penalty.update_variable_for_proximity(&mut variables, 0.25);

        assert_eq!(variables, [1.75, -0.25, 0., 0.]);
    }

    #[test]
    fn zero_weight_is_a_no_op() {
        let original = [1.5, -0.0, 0.0, -2e-300, f64::MIN_POSITIVE];
        let mut variables = original;

        L1Penalty.update_variable_for_proximity(&mut variables, 0.);

        for (a, b) in variables.iter().zip(&original) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
