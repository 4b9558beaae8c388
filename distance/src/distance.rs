use std::fmt::Debug;

use ndarray::ArrayView1;

use crate::{DistanceErr, Result};

/// A dissimilarity measure between two feature vectors.
pub trait Distance: Debug + Send + Sync {
    /// Computes the distance between `a` and `b`, which must be of the same length.
    fn distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Result<f64> {
        if a.len() != b.len() {
            return Err(DistanceErr::SizeMismatch {
                got: b.len(),
                expected: a.len(),
            });
        }

        Ok(self.distance_unchecked(a, b))
    }

    /// Computes the distance assuming both vectors have the same length.
    fn distance_unchecked(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64;
}
