use log::debug;
use ndarray::{Array2, ArrayView1, Zip};

use crate::{Distance, DistanceErr, Result};

/// Measures distances between the rows of two dense feature matrices.
#[derive(Debug, Clone)]
pub struct DenseDistance<D: Distance> {
    lhs: Array2<f64>,
    rhs: Array2<f64>,
    metric: D,
}

impl<D: Distance> DenseDistance<D> {
    /// Creates a new `DenseDistance`.
    ///
    /// # Arguments
    /// * `lhs` - The left hand side features, one vector per row.
    /// * `rhs` - The right hand side features, one vector per row.
    /// * `metric` - The distance to compute between rows.
    ///
    /// # Returns
    /// A new `DenseDistance`, or an error if the rows of both sides differ in length.
    pub fn new(lhs: Array2<f64>, rhs: Array2<f64>, metric: D) -> Result<Self> {
        if lhs.ncols() != rhs.ncols() {
            return Err(DistanceErr::SizeMismatch {
                got: rhs.ncols(),
                expected: lhs.ncols(),
            });
        }

        Ok(Self { lhs, rhs, metric })
    }

    /// The amount of vectors on each side.
    pub fn shape(&self) -> (usize, usize) {
        (self.lhs.nrows(), self.rhs.nrows())
    }

    fn row<'a>(
        side: &'static str,
        features: &'a Array2<f64>,
        idx: usize,
    ) -> Result<ArrayView1<'a, f64>> {
        if idx >= features.nrows() {
            return Err(DistanceErr::IndexOutOfBounds {
                side,
                idx,
                len: features.nrows(),
            });
        }

        Ok(features.row(idx))
    }

    /// Computes the distance between the `idx_a`th vector of the left hand side and
    /// the `idx_b`th vector of the right hand side.
    pub fn compute(&self, idx_a: usize, idx_b: usize) -> Result<f64> {
        let a = Self::row("lhs", &self.lhs, idx_a)?;
        let b = Self::row("rhs", &self.rhs, idx_b)?;
        Ok(self.metric.distance_unchecked(a, b))
    }

    /// Computes the distance between every pair of vectors, rows in parallel.
    ///
    /// # Returns
    /// A matrix with one row per left hand side vector and one column per right hand
    /// side vector.
    pub fn distance_matrix(&self) -> Array2<f64> {
        let (n, m) = self.shape();
        debug!("computing {n}x{m} distance matrix");

        let mut matrix = Array2::zeros((n, m));
        Zip::from(matrix.rows_mut())
            .and(self.lhs.rows())
            .par_for_each(|mut out, a| {
                for (d, b) in out.iter_mut().zip(self.rhs.rows()) {
                    *d = self.metric.distance_unchecked(a, b);
                }
            });

        matrix
    }
}
