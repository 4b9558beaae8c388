use super::{CostFunction, StochasticCostFunction};

/// The quadratic bowl `f(x) = Σ x_i^2`, with gradient `2x`.
///
/// Every pass is made of `samples_per_pass` identical samples, so it can drive the
/// stochastic minimizers deterministically.
#[derive(Debug, Clone)]
pub struct QuadraticCost {
    variables: Vec<f64>,
    samples_per_pass: usize,
    sample: usize,
}

impl QuadraticCost {
    /// Creates a new `QuadraticCost`.
    ///
    /// # Arguments
    /// * `x0` - The starting variables.
    /// * `samples_per_pass` - The amount of steps taken per pass through the data.
    pub fn new(x0: Vec<f64>, samples_per_pass: usize) -> Self {
        Self {
            variables: x0,
            samples_per_pass,
            sample: 0,
        }
    }
}

impl CostFunction for QuadraticCost {
    fn variables(&self) -> &[f64] {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut [f64] {
        &mut self.variables
    }

    fn cost(&self) -> f64 {
        self.variables.iter().map(|x| x.powi(2)).sum()
    }

    fn gradient(&mut self) -> Vec<f64> {
        self.variables.iter().map(|x| 2. * x).collect()
    }
}

impl StochasticCostFunction for QuadraticCost {
    fn begin_sample(&mut self) {
        self.sample = 0;
    }

    fn next_sample(&mut self) -> bool {
        if self.sample == self.samples_per_pass {
            return false;
        }

        self.sample += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_the_configured_samples_per_pass() {
        let mut cost = QuadraticCost::new(vec![1.], 3);

        for _ in 0..2 {
            cost.begin_sample();
            let samples = std::iter::from_fn(|| cost.next_sample().then_some(())).count();
            assert_eq!(samples, 3);
        }
    }

    #[test]
    fn gradient_is_twice_the_variables() {
        let mut cost = QuadraticCost::new(vec![1.5, -2.], 1);
        assert_eq!(cost.gradient(), [3., -4.]);
        assert_eq!(cost.cost(), 6.25);
    }
}
