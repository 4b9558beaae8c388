mod constant;
mod inverse_scaling;
mod schedule;
mod step_decay;

pub use constant::ConstLearningRate;
pub use inverse_scaling::InverseScalingLearningRate;
pub use schedule::LearningRate;
pub use step_decay::StepDecayLearningRate;
