mod adadelta;
mod adagrad;
mod adam;
mod descend_updater;
mod gradient_descent;
mod momentum;
mod rmsprop;

pub use adadelta::AdaDelta;
pub use adagrad::AdaGrad;
pub use adam::Adam;
pub use descend_updater::{DescendUpdater, SharedUpdater, Update, shared};
pub use gradient_descent::GradientDescent;
pub use momentum::Momentum;
pub use rmsprop::RmsProp;

pub(crate) use descend_updater::Accumulator;
