use super::{Penalty, ProximalPenalty, soft_threshold};
use crate::{Result, error::require, specs::PenaltySpec};

/// A convex mix of the L1 and squared L2 norms:
///
/// `l1_ratio * |x| + (1 - l1_ratio) * x^2 / 2`
///
/// The smooth part goes through the gradient, the L1 part through soft thresholding.
#[derive(Debug, Clone, Copy)]
pub struct ElasticNetPenalty {
    l1_ratio: f64,
}

impl ElasticNetPenalty {
    /// Creates a new `ElasticNetPenalty`.
    ///
    /// # Arguments
    /// * `l1_ratio` - The share of the L1 norm in the mix, in `[0, 1]`.
    pub fn new(l1_ratio: f64) -> Result<Self> {
        require((0. ..=1.).contains(&l1_ratio), "l1_ratio", l1_ratio)?;
        Ok(Self { l1_ratio })
    }
}

impl Penalty for ElasticNetPenalty {
    fn penalty(&self, variable: f64) -> f64 {
        let r = self.l1_ratio;
        r * variable.abs() + (1. - r) * 0.5 * variable.powi(2)
    }

    fn penalty_gradient(&self, variable: f64, _gradient: f64) -> f64 {
        (1. - self.l1_ratio) * variable
    }

    fn as_proximal(&self) -> Option<&dyn ProximalPenalty> {
        Some(self)
    }

    fn is_sparse(&self) -> bool {
        true
    }

    fn spec(&self) -> PenaltySpec {
        PenaltySpec::ElasticNet {
            l1_ratio: self.l1_ratio,
        }
    }
}

impl ProximalPenalty for ElasticNetPenalty {
    fn update_variable_for_proximity(&self, variables: &mut [f64], weight: f64) {
        let threshold = self.l1_ratio * weight;
        if threshold == 0. {
            return;
        }

        for x in variables.iter_mut() {
            *x = soft_threshold(*x, threshold);
        }
    }
}
