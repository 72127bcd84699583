use super::{extrema::ExtremaCandidate, scalar::Scalar};

// Barycentric weights
//
// w_k = 1 / prod_{j != k} (x_j - x_k).
//
// Two tweaks keep the products representable:
//
// a) (x_j - x_k) * 2 is multiplied instead of (x_j - x_k). The Lagrange
// interpolation formula is homogeneous on the barycentric weights, so this
// does not change the interpolant.
//
// b) The factors are visited with a stride, which mixes large and small
// factors.
pub fn compute_barycentric_weights<T: Scalar>(x: &[T]) -> impl Iterator<Item = T> + '_ {
    let stride = x.len().saturating_sub(2) / 15 + 1;
    let two = T::from_count(2);
    x.iter().enumerate().map(move |(k, &xk)| {
        let mut prod = T::one();
        for a in 0..stride {
            for j in (a..x.len()).step_by(stride) {
                if j != k {
                    prod = prod * ((xk - x[j]) * two);
                }
            }
        }
        prod.recip()
    })
}

// delta = sum_k w_k D(f_k) / sum_k (-1)^k w_k/W(f_k),
//
// where f_k are the extremal frequencies and D and W are the desired response
// and weight.
pub fn compute_delta<T: Scalar>(wk: &[T], desired: &[T], weights: &[T]) -> T {
    let mut numer = T::zero();
    let mut denom = T::zero();
    for (k, ((&w, &des), &wei)) in wk.iter().zip(desired).zip(weights).enumerate() {
        numer = numer + w * des;
        let z = w / wei;
        denom = if k % 2 != 0 { denom - z } else { denom + z };
    }
    numer / denom
}

// Ordinates for Lagrange interpolation
//
// y_k = D(f_k) - (-1)^k delta / W(f_k)
pub fn compute_lagrange_ordinates<'a, T: Scalar>(
    delta: T,
    desired: &'a [T],
    weights: &'a [T],
) -> impl Iterator<Item = T> + 'a {
    desired
        .iter()
        .zip(weights)
        .enumerate()
        .map(move |(k, (&des, &wei))| {
            let z = delta / wei;
            if k % 2 != 0 { des + z } else { des - z }
        })
}

// H(arccos(x0)) by barycentric interpolation
pub fn compute_freq_response<T: Scalar>(x0: T, x: &[T], wk: &[T], yk: &[T]) -> T {
    let mut numer = T::zero();
    let mut denom = T::zero();
    for ((&xk, &w), &y) in x.iter().zip(wk).zip(yk) {
        if x0 == xk {
            return y;
        }
        let z = w / (x0 - xk);
        numer = numer + z * y;
        denom = denom + z;
    }
    numer / denom
}

/// Interpolant state of one Remez iteration: nodes x_k = cos(f_k),
/// barycentric weights and ordinates.
pub struct Interpolant<'a, T> {
    pub x: &'a [T],
    pub wk: &'a [T],
    pub yk: &'a [T],
}

impl<T: Scalar> Interpolant<'_, T> {
    // E(f) = W(f) * (D(f) - H(f)), where cos(f) = x0
    pub fn error(&self, x0: T, desired: impl Fn(T) -> T, weights: impl Fn(T) -> T) -> T {
        self.candidate(x0, desired, weights).error
    }

    pub fn candidate(
        &self,
        x0: T,
        desired: impl Fn(T) -> T,
        weights: impl Fn(T) -> T,
    ) -> ExtremaCandidate<T> {
        let h = compute_freq_response(x0, self.x, self.wk, self.yk);
        let f = x0.acos();
        ExtremaCandidate {
            x: x0,
            error: weights(f) * (desired(f) - h),
        }
    }
}
