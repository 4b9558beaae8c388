use ndarray::{ArrayView1, Zip};

use super::Distance;

/// The Bray-Curtis dissimilarity, `Σ|a_i - b_i| / Σ|a_i + b_i|`.
///
/// When the denominator is zero the distance is defined as zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrayCurtis;

impl Distance for BrayCurtis {
    fn distance_unchecked(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        let (diff, sum) = Zip::from(&a)
            .and(&b)
            .fold((0., 0.), |(diff, sum), x, y| {
                (diff + (x - y).abs(), sum + (x + y).abs())
            });

        if sum == 0. {
            return 0.;
        }

        diff / sum
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::DistanceErr;

    #[test]
    fn equal_vectors_are_at_zero() {
        let a = array![1., 2.5, 0., 4.];
        assert_eq!(BrayCurtis.distance(a.view(), a.view()), Ok(0.));
    }

    #[test]
    fn opposite_vectors_are_at_zero_not_nan() {
        let a = array![1., -2., 3.];
        let b = -&a;

        let d = BrayCurtis.distance(a.view(), b.view()).unwrap();
        assert_eq!(d, 0.);
    }

    #[test]
    fn zero_vectors_are_at_zero() {
        let a = array![0., 0.];
        assert_eq!(BrayCurtis.distance(a.view(), a.view()), Ok(0.));
    }

    #[test]
    fn disjoint_supports_are_at_one() {
        let a = array![1., 0.];
        let b = array![0., 3.];
        assert_eq!(BrayCurtis.distance(a.view(), b.view()), Ok(1.));
    }

    #[test]
    fn known_value() {
        let a = array![6., 7., 4.];
        let b = array![10., 0., 6.];
        // (4 + 7 + 2) / (16 + 7 + 10)
        assert_eq!(BrayCurtis.distance(a.view(), b.view()), Ok(13. / 33.));
    }

    #[test]
    fn lengths_must_match() {
        let a = array![1., 2.];
        let b = array![1.];
        assert_eq!(
            BrayCurtis.distance(a.view(), b.view()),
            Err(DistanceErr::SizeMismatch {
                got: 1,
                expected: 2
            })
        );
    }
}
