use super::barycentric::Interpolant;
use super::chebyshev::compute_cheby_coefficients;
use super::eigenvalues::EigenvalueBackend;
use super::scalar::Scalar;
use crate::error::{Error, Result};
use ndarray::Array2;
use std::cmp::Ordering;

// Closed interval, used for bands in rad/sample and for subintervals of
// [-1, 1].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interval<T> {
    pub begin: T,
    pub end: T,
}

impl<T: Scalar> Interval<T> {
    pub fn len(&self) -> T {
        self.end - self.begin
    }

    // Zero inside the interval
    pub fn distance(&self, x: T) -> T {
        if x < self.begin {
            self.begin - x
        } else if x > self.end {
            x - self.end
        } else {
            T::zero()
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExtremaCandidate<T> {
    pub x: T,
    pub error: T,
}

// Initial guess for extremal frequencies: evenly spaced over the bands
pub fn initial_extremal_freqs<T: Scalar>(bands: &[Interval<T>], num_functions: usize) -> Vec<T> {
    let total_band_length = bands.iter().fold(T::zero(), |acc, b| acc + b.len());
    let spacing = total_band_length / T::from_count(num_functions);
    let last_band = bands.len() - 1;
    let mut consumed_length = T::zero();
    let mut current = 0;
    (0..=num_functions)
        .map(|j| {
            let s = T::from_count(j) * spacing;
            let mut u = s - consumed_length;
            // the second condition avoids going past the last band due to
            // rounding
            while u > bands[current].len() && current != last_band {
                consumed_length = consumed_length + bands[current].len();
                current += 1;
                u = s - consumed_length;
            }
            (bands[current].begin + u).min(bands[current].end)
        })
        .collect()
}

// Subintervals delimited by the extremal points and the band edges (in the
// [-1, 1] domain).
pub fn subdivide<T: Scalar>(x: &[T], bands_x: &[Interval<T>]) -> Vec<Interval<T>> {
    let mut subintervals = Vec::with_capacity(x.len() + bands_x.len());
    let mut xs = x.iter().rev().peekable();
    for band in bands_x {
        let mut begin = band.begin;
        loop {
            let Some(&&a) = xs.peek() else {
                // no more points: end interval at the band end
                subintervals.push(Interval {
                    begin,
                    end: band.end,
                });
                break;
            };
            match a.partial_cmp(&band.end) {
                Some(Ordering::Greater) | None => {
                    // point to the right of the band: end interval at the
                    // band end, keep the point
                    subintervals.push(Interval {
                        begin,
                        end: band.end,
                    });
                    break;
                }
                Some(Ordering::Equal) => {
                    // point exactly at the band end: end interval at the
                    // band end, consume the point
                    subintervals.push(Interval {
                        begin,
                        end: band.end,
                    });
                    xs.next();
                    break;
                }
                Some(Ordering::Less) => {
                    // point inside the band: it ends this interval and
                    // begins the next one
                    if begin != a {
                        subintervals.push(Interval { begin, end: a });
                        begin = a;
                    }
                    xs.next();
                }
            }
        }
    }
    debug_assert!(xs.next().is_none());
    subintervals
}

// Local extrema of the weighted error in a subinterval, found with a
// Chebyshev proxy: the error is interpolated at Chebyshev nodes, and the real
// roots of the derivative of the interpolant are the candidates.
//
// The roots are computed in f64, which is what the eigenvalue backend works
// with. Only the locations of the candidates lose precision this way: their
// errors are evaluated in T.
pub fn find_extrema_in_subinterval<T: Scalar, B: EigenvalueBackend>(
    interval: &Interval<T>,
    cheby_nodes: &[T],
    interpolant: &Interpolant<'_, T>,
    desired: impl Fn(T) -> T,
    weights: impl Fn(T) -> T,
    eigenvalue_backend: &B,
) -> Result<Vec<ExtremaCandidate<T>>> {
    let scale = T::from_f64_lossy(0.5) * interval.len();
    let mut errors: Vec<T> = cheby_nodes
        .iter()
        .map(|&x0| {
            interpolant.error(
                (x0 + T::one()) * scale + interval.begin,
                &desired,
                &weights,
            )
        })
        .collect();
    let ak = compute_cheby_coefficients(&mut errors);

    // Chebyshev coefficients of the derivative, as a series in second-kind
    // polynomials.
    let mut ck: Vec<f64> = ak
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, &a)| (T::from_count(k) * a).to_f64_lossy())
        .collect();

    // The colleague matrix needs a nonzero leading coefficient.
    while ck.last() == Some(&0.0) {
        ck.pop();
    }
    if ck.is_empty() {
        return Err(Error::ProxyDerivativeZero);
    }
    if ck.len() == 1 {
        // constant derivative, no roots
        return Ok(Vec::new());
    }

    // Colleague matrix of ck. Its eigenvalues are the zeros of the derivative
    // of the proxy.
    let s = ck.len() - 1;
    let mut colleague = Array2::<f64>::zeros((s, s));
    for j in 0..s - 1 {
        colleague[(j, j + 1)] = 0.5;
    }
    for j in 2..s {
        colleague[(j, j - 1)] = 0.5;
    }
    let lead = -0.5 / ck[s];
    for j in 0..s {
        let c = ck[s - 1 - j] * lead;
        colleague[(j, 0)] = if j == 1 { c + 0.5 } else { c };
    }
    balance_matrix(&mut colleague);

    let eig = eigenvalue_backend.eigenvalues(colleague)?;

    // Keep the real roots inside [-1, 1], mapped back to the interval.
    let threshold = 1e-20;
    Ok(eig
        .into_iter()
        .filter(|z| z.im.abs() < threshold && (-1.0..=1.0).contains(&z.re))
        .map(|z| {
            let y = (T::from_f64_lossy(z.re) + T::one()) * scale + interval.begin;
            interpolant.candidate(y, &desired, &weights)
        })
        .collect())
}

// Prune sorted extrema candidates to leave only n of them.
pub fn prune_extrema_candidates<T: Scalar>(
    candidates: &[ExtremaCandidate<T>],
    n: usize,
) -> Result<Vec<ExtremaCandidate<T>>> {
    let Some((&first, rest)) = candidates.split_first() else {
        return Err(Error::NotEnoughExtrema);
    };
    let mut pruned = Vec::with_capacity(candidates.len());

    // From groups of adjacent extrema with the same sign, leave only the
    // largest.
    let mut b = first;
    for &a in rest {
        let same_sign = (a.error < T::zero()) == (b.error < T::zero());
        if !same_sign {
            pruned.push(b);
        }
        if !same_sign || a.error.abs() > b.error.abs() {
            b = a;
        }
    }
    pruned.push(b);

    match pruned.len().cmp(&n) {
        Ordering::Less => return Err(Error::NotEnoughExtrema),
        Ordering::Equal => return Ok(pruned),
        Ordering::Greater => (),
    }

    if (pruned.len() - n) % 2 == 1 {
        // Reduce to an even number of extrema to remove by dropping the first
        // or the last one, whichever has the smaller error.
        if pruned[0].error.abs() >= pruned[pruned.len() - 1].error.abs() {
            pruned.pop();
        } else {
            pruned.remove(0);
        }
    }
    while pruned.len() > n {
        // Remove the adjacent pair whose smaller absolute error is the
        // smallest. Removing pairs keeps the signs alternating.
        let idx = pruned
            .windows(2)
            .enumerate()
            .map(|(k, w)| (k, w[0].error.abs().min(w[1].error.abs())))
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .map(|(k, _)| k)
            .ok_or(Error::NotEnoughExtrema)?;
        pruned.drain(idx..=idx + 1);
    }
    Ok(pruned)
}

// Balance a matrix for the eigenvalue calculation, following Parlett and
// Reinsch, "Balancing a matrix for calculation of eigenvalues and
// eigenvectors", Numer. Math. 13 (1969).
//
// The preliminary step that isolates eigenvalues is skipped, since a colleague
// matrix has no rows or columns that are zero off the diagonal.
fn balance_matrix(a: &mut Array2<f64>) {
    let gamma = 0.95;
    let n = a.nrows();
    let mut converged = false;
    while !converged {
        converged = true;
        for j in 0..n {
            // off-diagonal norms
            let mut row_norm = 0.0;
            let mut col_norm = 0.0;
            for k in (0..n).filter(|&k| k != j) {
                row_norm += a[(j, k)].abs();
                col_norm += a[(k, j)].abs();
            }
            if row_norm == 0.0 || col_norm == 0.0 {
                continue;
            }
            let norm_sum = row_norm + col_norm;
            // Find the power of two f = 2^sigma with
            // 2^{2*sigma - 1} < row_norm / col_norm <= 2^{2*sigma + 1}.
            // col_norm ends up holding col_norm * f^2. The is_normal() checks
            // stop the loops on numerical trouble.
            let mut f = 1.0;
            while col_norm.is_normal() && col_norm <= 0.5 * row_norm {
                f *= 2.0;
                col_norm *= 4.0;
            }
            while col_norm.is_normal() && col_norm > 2.0 * row_norm {
                f /= 2.0;
                col_norm /= 4.0;
            }
            if !col_norm.is_normal() {
                return;
            }
            // col_norm * f + row_norm / f < gamma * norm_sum, multiplied by f
            if row_norm + col_norm < gamma * norm_sum * f {
                converged = false;
                let f_recip = f.recip();
                for k in (0..n).filter(|&k| k != j) {
                    a[(j, k)] *= f_recip;
                    a[(k, j)] *= f;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn candidate(x: f64, error: f64) -> ExtremaCandidate<f64> {
        ExtremaCandidate { x, error }
    }

    #[test]
    fn initial_freqs_cover_bands() {
        let bands = [
            Interval {
                begin: 0.0,
                end: 0.2,
            },
            Interval {
                begin: 0.3,
                end: 0.5,
            },
        ];
        let freqs = initial_extremal_freqs(&bands, 4);
        assert_eq!(freqs.len(), 5);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[4] - 0.5).abs() < 1e-12);
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
        assert!(
            freqs
                .iter()
                .all(|&f| bands.iter().any(|b| b.distance(f) == 0.0))
        );
    }

    #[test]
    fn subdivide_band() {
        let bands = [Interval {
            begin: -1.0,
            end: 1.0,
        }];
        // points come in decreasing order, as cos(f) for increasing f
        let x = [0.5, 0.0, -0.5];
        let intervals = subdivide(&x, &bands);
        let ends: Vec<f64> = intervals.iter().map(|i| i.end).collect();
        assert_eq!(ends, [-0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn prune_keeps_alternation() {
        let candidates = [
            candidate(-0.9, 1.0),
            candidate(-0.8, 2.0),
            candidate(-0.5, -1.5),
            candidate(0.0, 0.1),
            candidate(0.2, -0.1),
            candidate(0.6, 1.2),
            candidate(0.9, -1.1),
        ];
        let pruned = prune_extrema_candidates(&candidates, 4).unwrap();
        assert_eq!(pruned.len(), 4);
        assert!(
            pruned
                .windows(2)
                .all(|w| (w[0].error < 0.0) != (w[1].error < 0.0))
        );
        assert_eq!(pruned[0].error, 2.0);
    }

    #[test]
    fn prune_too_few() {
        let candidates = [candidate(0.0, 1.0), candidate(0.5, 2.0)];
        assert!(matches!(
            prune_extrema_candidates(&candidates, 2),
            Err(Error::NotEnoughExtrema)
        ));
        assert!(matches!(
            prune_extrema_candidates::<f64>(&[], 2),
            Err(Error::NotEnoughExtrema)
        ));
    }
}
