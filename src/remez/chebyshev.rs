use super::scalar::Scalar;

// Compute Chebychev coefficients a_k of
//
// p(x) = \sum_{0 <= k <= n} a_k T_k(x),
//
// where T_k(x) = cos(k*arccos(x)), given the values of p at the Chebyshev
// nodes of the second kind, that is, p(cos(k*pi/n)), 0 <= k <= n.
//
// Put b_0 = 2*a_0, b_1 = a_1, ..., b_{n-1} = a_{n-1}, b_n = 2*a_n.
// Then {c_k = p(cos(k*pi/n))} is the DCT-I of {b_k}. Put
// d_0 = c_0 / 2, d_1 = c_1, ..., d_{n-1} = c_{n-1}, d_n = c_n / 2.
// Then,
//   b_k = 2/n sum_{0 <= j <= n} d_j cos(jk pi/n) =
//       = 2/n sum_{0 <= j <= n} d_j T_j(cos(k pi/n)),
// so the b_k can be evaluated with Clenshaw's algorithm.
//
// Note: p_values is overwritten with the d_k.
pub fn compute_cheby_coefficients<T: Scalar>(p_values: &mut [T]) -> Vec<T> {
    halve_first_and_last(p_values);
    let n = p_values.len() - 1;
    let scale = T::from_count(2) / T::from_count(n);
    let mut bk: Vec<T> = chebyshev_nodes(n)
        .map(|x| clenshaw(p_values, x) * scale)
        .collect();
    halve_first_and_last(&mut bk);
    bk
}

// Clenshaw's algorithm for Chebyshev polynomials of the first kind T_k.
// Evaluates \sum a_k T_k(x).
fn clenshaw<T: Scalar>(a: &[T], x: T) -> T {
    debug_assert!(a.len() >= 2);
    let mut b2 = T::zero();
    let mut b1 = a[a.len() - 1];
    let two_x = T::from_count(2) * x;
    for &ak in a[1..a.len() - 1].iter().rev() {
        let tmp = two_x * b1 - b2 + ak;
        b2 = b1;
        b1 = tmp;
    }
    x * b1 - b2 + a[0]
}

fn halve_first_and_last<T: Scalar>(a: &mut [T]) {
    debug_assert!(a.len() >= 2);
    let half = T::from_f64_lossy(0.5);
    let last = a.len() - 1;
    a[0] = a[0] * half;
    a[last] = a[last] * half;
}

// Chebyshev nodes of the second kind in [-1, 1], in decreasing order (this
// returns n + 1 nodes)
pub fn chebyshev_nodes<T: Scalar>(n: usize) -> impl Iterator<Item = T> {
    let scale = T::PI() / T::from_count(n);
    (0..=n).map(move |j| (T::from_count(j) * scale).cos())
}

#[cfg(test)]
mod test {
    use super::*;
    use num_bigfloat::BigFloat;
    use num_traits::Float;

    #[test]
    fn nodes() {
        let nodes: Vec<f64> = chebyshev_nodes(4).collect();
        assert_eq!(nodes.len(), 5);
        assert!((nodes[0] - 1.0).abs() < 1e-15);
        assert!(nodes[2].abs() < 1e-15);
        assert!((nodes[4] + 1.0).abs() < 1e-15);
    }

    #[test]
    fn coefficients_of_polynomial() {
        // p(x) = 1 + 2 T_1(x) - 3 T_3(x) = 1 + 2x - 3(4x^3 - 3x)
        let p = |x: f64| 1.0 + 2.0 * x - 3.0 * (4.0 * x.powi(3) - 3.0 * x);
        let n = 6;
        let mut values: Vec<f64> = chebyshev_nodes(n).map(p).collect();
        let ak = compute_cheby_coefficients(&mut values);
        let expected = [1.0, 2.0, 0.0, -3.0, 0.0, 0.0, 0.0];
        for (a, e) in ak.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-12, "{ak:?}");
        }
    }

    #[test]
    fn bigfloat_coefficients() {
        // p(x) = T_2(x) = 2x^2 - 1
        let mut values: Vec<BigFloat> = chebyshev_nodes::<BigFloat>(4)
            .map(|x| BigFloat::from_count(2) * x * x - BigFloat::from_count(1))
            .collect();
        let ak = compute_cheby_coefficients(&mut values);
        for (k, a) in ak.iter().enumerate() {
            let expected = BigFloat::from_count(usize::from(k == 2));
            assert!((*a - expected).abs().to_f64_lossy() < 1e-25);
        }
    }
}
