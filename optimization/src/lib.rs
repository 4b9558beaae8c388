pub mod cost;
pub mod dataset;
pub mod error;
pub mod learning_rate;
pub mod minimizer;
pub mod penalty;
pub mod specs;
pub mod updaters;

pub use error::{OptErr, Result};
