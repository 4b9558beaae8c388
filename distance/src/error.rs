use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire distance module.
pub type Result<T> = std::result::Result<T, DistanceErr>;

/// The distance module's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistanceErr {
    SizeMismatch { got: usize, expected: usize },
    IndexOutOfBounds { side: &'static str, idx: usize, len: usize },
}

impl Display for DistanceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceErr::SizeMismatch { got, expected } => write!(
                f,
                "Vectors must have the same amount of features, got {got} and expected {expected}"
            ),
            DistanceErr::IndexOutOfBounds { side, idx, len } => {
                write!(f, "Index {idx} is out of bounds for the {side} features of length {len}")
            }
        }
    }
}

impl Error for DistanceErr {}
