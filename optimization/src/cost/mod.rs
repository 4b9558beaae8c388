mod cost_function;
mod least_squares;
mod quadratic;

pub use cost_function::{CostFunction, StochasticCostFunction};
pub use least_squares::LeastSquaresCost;
pub use quadratic::QuadraticCost;
