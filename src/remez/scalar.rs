use super::Precision;
use num_bigfloat::BigFloat;
use num_traits::{Float, FloatConst};

/// Floating point type of the Remez exchange.
///
/// The exchange runs in `f64` and, when that is not accurate enough, in
/// [`BigFloat`]. Conversions from and to `f64` are allowed to be lossy. They
/// are used for the constants of the algorithm, for the eigenvalue backend,
/// which only works with `f64`, and for the final taps.
pub trait Scalar: Float + FloatConst + std::fmt::Debug {
    /// Precision of the arithmetic of this type.
    const PRECISION: Precision;

    /// Converts an `f64` to `Self`, possibly in a lossy way.
    fn from_f64_lossy(x: f64) -> Self;

    /// Converts self to an `f64`, possibly in a lossy way.
    fn to_f64_lossy(self) -> f64;

    /// Converts a count to `Self`.
    fn from_count(n: usize) -> Self {
        Self::from_f64_lossy(n as f64)
    }
}

impl Scalar for f64 {
    const PRECISION: Precision = Precision::Double;

    fn from_f64_lossy(x: f64) -> f64 {
        x
    }

    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl Scalar for BigFloat {
    const PRECISION: Precision = Precision::Extended;

    fn from_f64_lossy(x: f64) -> BigFloat {
        BigFloat::from(x)
    }

    fn to_f64_lossy(self) -> f64 {
        self.to_f64()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bigfloat_conversions() {
        let x = BigFloat::from_f64_lossy(0.375);
        assert_eq!(x.to_f64_lossy(), 0.375);
        assert_eq!(BigFloat::from_count(129).to_f64_lossy(), 129.0);
        // more digits than f64 survive arithmetic
        let one = BigFloat::from_count(1);
        let third = one / BigFloat::from_count(3);
        let residual = third * BigFloat::from_count(3) - one;
        assert!(residual.abs().to_f64_lossy() < 1e-30);
    }
}
