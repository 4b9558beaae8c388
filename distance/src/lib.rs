mod bray_curtis;
mod dense;
mod distance;
pub mod error;

pub use bray_curtis::BrayCurtis;
pub use dense::DenseDistance;
pub use distance::Distance;
pub use error::{DistanceErr, Result};
