//! Parks-McClellan Remez exchange.
//!
//! This module designs linear phase FIR filters with even symmetry that
//! minimize the maximum weighted error between a piecewise constant desired
//! response and the frequency response of the filter, over a list of bands.
//! The even length case (type II) is reduced to the odd length case (type I)
//! as in \[3\].
//!
//! The implementation draws ideas from \[2\] to make the algorithm robust
//! against numerical errors. The extremal frequencies are tracked through
//! barycentric Lagrange interpolation, and the local extrema of the weighted
//! error in each subinterval are found as the roots of the derivative of a
//! Chebyshev proxy, which are the eigenvalues of a colleague matrix.
//!
//! Filters with many taps and wide transitions have tiny errors, and the
//! exchange then runs out of `f64` precision. Such designs are repeated in
//! [`BigFloat`] arithmetic (see [`Precision`]).
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), fir_designer::error::Error> {
//! use fir_designer::{
//!     remez::{remez, RemezParameters},
//!     Band, BandResponse,
//! };
//! let bands = vec![
//!     BandResponse { band: Band::new(0.0, 0.2)?, gain: 1.0, weight: 1.0 },
//!     BandResponse { band: Band::new(0.3, 0.5)?, gain: 0.0, weight: 10.0 },
//! ];
//! let parameters = RemezParameters::new(35, bands)?;
//! let design = remez(&parameters)?;
//! assert_eq!(design.taps.len(), 35);
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! \[1\] M. Ahsan and T. Saramaki, "Two Novel Implementations of the Remez
//! Multiple Exchange Algorithm for Optimum FIR Filter Design", MATLAB - A
//! Fundamental Tool for Scientific Computing and Engineering Applications -
//! Volume 2. InTech, Sep. 26, 2012.
//!
//! \[2\] S.I. Filip. "A Robust and Scalable Implementation of the
//! Parks-McClellan Algorithm for Designing FIR Filters," in ACM
//! Trans. Math. Softw. 43, 1, Article 7, March 2017.
//!
//! \[3\] J. McClellan, T. Parks and L. Rabiner, "A computer program for designing
//! optimum FIR linear phase digital filters," in IEEE Transactions on Audio and
//! Electroacoustics, vol. 21, no. 6, pp. 506-526, December 1973
//!
//! \[4\] B.N. Parlett and C. Reinsch, "Balancing a matrix for calculation of
//! eigenvalues and eigenvectors". Numer. Math. 13, 293–304 (1969).

use crate::{
    bands::{check_bands, sort_bands},
    error::{Error, Result},
    tables::BandResponse,
};
use itertools::{Itertools, MinMaxResult};
use num_bigfloat::BigFloat;
use std::cmp::Ordering;

mod barycentric;
use barycentric::*;
mod chebyshev;
use chebyshev::{chebyshev_nodes, compute_cheby_coefficients};
mod eigenvalues;
pub use eigenvalues::{EigenvalueBackend, EigenvaluesError, FaerBackend};
mod extrema;
use extrema::*;
mod scalar;
use scalar::Scalar;
mod symmetry;
use symmetry::*;

/// Arithmetic of the Remez exchange.
///
/// Filters with many taps and wide transition bands reach errors of the order
/// of the `f64` round-off, and the exchange stops finding the alternation of
/// the error. Those designs need more precision, which is provided by
/// [`BigFloat`] (40 decimal digits) at a much higher cost.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// `f64` arithmetic.
    Double,
    /// [`BigFloat`] arithmetic.
    Extended,
    /// `f64` arithmetic, repeating the design with [`BigFloat`] arithmetic if
    /// it fails numerically.
    #[default]
    Auto,
}

/// Parameters of the Remez exchange.
///
/// The parameters are created with [`RemezParameters::new`], which gives
/// reasonable defaults to the numerical settings. The defaults can be changed
/// with the chained setters.
#[derive(Debug, Clone)]
pub struct RemezParameters {
    num_taps: usize,
    bands: Vec<BandResponse>,
    chebyshev_proxy_degree: usize,
    max_iterations: usize,
    flatness_threshold: f64,
    precision: Precision,
}

impl RemezParameters {
    /// Creates new parameters.
    ///
    /// The bands are given in cycles/sample, with the desired gain and the
    /// weight of each band. They must not overlap. Outside the bands, the
    /// desired gain and the weight are those of the closest band.
    ///
    /// The Chebyshev proxy degree defaults to 8, the maximum number of
    /// iterations to 100, the flatness threshold to 1e-3 and the precision to
    /// [`Precision::Auto`].
    pub fn new(num_taps: usize, bands: Vec<BandResponse>) -> Result<RemezParameters> {
        if num_taps < 3 {
            return Err(Error::TooFewTaps(num_taps));
        }
        check_bands(&bands.iter().map(|b| b.band).collect::<Vec<_>>())?;
        Ok(RemezParameters {
            num_taps,
            bands,
            chebyshev_proxy_degree: 8,
            max_iterations: 100,
            flatness_threshold: 1e-3,
            precision: Precision::Auto,
        })
    }

    /// Returns the number of taps.
    pub fn num_taps(&self) -> usize {
        self.num_taps
    }

    /// Returns the bands with their gains and weights.
    pub fn bands(&self) -> &[BandResponse] {
        &self.bands
    }

    /// Returns the degree of the Chebyshev proxy used to find extrema.
    pub fn chebyshev_proxy_degree(&self) -> usize {
        self.chebyshev_proxy_degree
    }

    /// Returns the maximum number of iterations.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the flatness threshold.
    pub fn flatness_threshold(&self) -> f64 {
        self.flatness_threshold
    }

    /// Returns the arithmetic precision.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Sets the degree of the Chebyshev proxy used to find extrema.
    ///
    /// The weighted error in each subinterval between extremal frequencies is
    /// interpolated by a polynomial of this degree. Higher degrees find
    /// extrema more accurately at a higher cost. Degrees below 2 are raised
    /// to 2.
    pub fn set_chebyshev_proxy_degree(&mut self, degree: usize) -> &mut Self {
        self.chebyshev_proxy_degree = degree.max(2);
        self
    }

    /// Sets the maximum number of iterations.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the flatness threshold.
    pub fn set_flatness_threshold(&mut self, flatness_threshold: f64) -> &mut Self {
        self.flatness_threshold = flatness_threshold;
        self
    }

    /// Sets the arithmetic precision.
    pub fn set_precision(&mut self, precision: Precision) -> &mut Self {
        self.precision = precision;
        self
    }
}

/// Filter designed by the Remez exchange.
#[derive(Debug, Clone)]
pub struct RemezDesign {
    /// Filter taps.
    pub taps: Vec<f64>,
    /// Maximum weighted error achieved by the filter.
    pub weighted_error: f64,
    /// Extremal frequencies of the last iteration, in cycles/sample.
    pub extremal_freqs: Vec<f64>,
    /// Number of iterations performed.
    pub num_iterations: usize,
    /// Flatness of the solution.
    ///
    /// This is the difference between the maximum and the minimum absolute
    /// weighted error over the extremal frequencies, divided by the maximum.
    pub flatness: f64,
    /// Arithmetic the design was obtained with, either
    /// [`Precision::Double`] or [`Precision::Extended`].
    pub precision: Precision,
}

/// Parks-McClellan Remez exchange algorithm.
///
/// Uses the [`FaerBackend`] to compute eigenvalues. See
/// [`remez_with_backend`] to use another backend.
///
/// An error is returned if the design cannot be completed, including the case
/// where the exchange does not reach the flatness threshold within the
/// maximum number of iterations.
pub fn remez(parameters: &RemezParameters) -> Result<RemezDesign> {
    remez_with_backend(parameters, &FaerBackend::default())
}

/// Parks-McClellan Remez exchange algorithm with eigenvalue backend.
///
/// With [`Precision::Auto`], a design that fails in `f64` with an error of
/// the exchange ([`Error::NotEnoughExtrema`], [`Error::ProxyDerivativeZero`],
/// [`Error::EigenvaluesError`] or [`Error::NoConvergence`]) is repeated in
/// extended precision, and the result of the second attempt is returned.
pub fn remez_with_backend<B: EigenvalueBackend>(
    parameters: &RemezParameters,
    eigenvalue_backend: &B,
) -> Result<RemezDesign> {
    let result = match parameters.precision {
        Precision::Double => exchange::<f64, B>(parameters, eigenvalue_backend),
        Precision::Extended => exchange::<BigFloat, B>(parameters, eigenvalue_backend),
        Precision::Auto => match exchange::<f64, B>(parameters, eigenvalue_backend) {
            Err(err) if is_exchange_failure(&err) => {
                tracing::debug!(
                    num_taps = parameters.num_taps,
                    %err,
                    "retrying remez exchange in extended precision"
                );
                exchange::<BigFloat, B>(parameters, eigenvalue_backend)
            }
            result => result,
        },
    };
    if let Err(err @ Error::NoConvergence { .. }) = &result {
        tracing::warn!(
            num_taps = parameters.num_taps,
            threshold = parameters.flatness_threshold,
            %err,
            "remez exchange did not converge"
        );
    }
    result
}

fn is_exchange_failure(err: &Error) -> bool {
    matches!(
        err,
        Error::NotEnoughExtrema
            | Error::ProxyDerivativeZero
            | Error::EigenvaluesError(_)
            | Error::NoConvergence { .. }
    )
}

// Band in rad/sample with its (unadjusted) desired gain and weight
struct BandTarget<T> {
    interval: Interval<T>,
    gain: T,
    weight: T,
}

fn exchange<T: Scalar, B: EigenvalueBackend>(
    parameters: &RemezParameters,
    eigenvalue_backend: &B,
) -> Result<RemezDesign> {
    let num_taps = parameters.num_taps;
    let odd_length = num_taps % 2 != 0;
    let mut bands = sort_bands(&parameters.bands, |b| b.band);
    // Check that the response is realizable by the FIR type.
    check_response(&bands, odd_length)?;
    // Adjust bands to avoid singularities.
    adjust_bands(&mut bands, odd_length)?;
    if bands.is_empty() {
        return Err(Error::BandsEmpty);
    }
    // From here on, frequencies are in radians/sample. The min() keeps
    // rounding from sending the edges beyond pi.
    let to_radians = |f: f64| (T::from_f64_lossy(f) * T::TAU()).min(T::PI());
    let bands: Vec<BandTarget<T>> = bands
        .iter()
        .map(|b| BandTarget {
            interval: Interval {
                begin: to_radians(b.band.begin()),
                end: to_radians(b.band.end()),
            },
            gain: T::from_f64_lossy(b.gain),
            weight: T::from_f64_lossy(b.weight),
        })
        .collect();
    let radian_bands: Vec<Interval<T>> = bands.iter().map(|b| b.interval).collect();

    let closest = |f: T| {
        bands
            .iter()
            .min_by(|a, b| {
                a.interval
                    .distance(f)
                    .partial_cmp(&b.interval.distance(f))
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(&bands[0])
    };
    let desired = |f: T| adjust_desired(closest(f).gain, f, odd_length);
    let weights = |f: T| adjust_weight(closest(f).weight, f, odd_length);

    // Number of cosine functions in the approximation (n in [3]).
    let num_functions = if odd_length {
        num_taps / 2 + 1
    } else {
        num_taps / 2
    };

    let mut extremal_freqs = initial_extremal_freqs(&radian_bands, num_functions);
    // x = cos(f), where f are the extremal freqs
    let mut x: Vec<T> = extremal_freqs.iter().map(|f| f.cos()).collect();
    let mut wk: Vec<T> = compute_barycentric_weights(&x).collect();
    let mut desired_x: Vec<T> = extremal_freqs.iter().map(|&f| desired(f)).collect();
    let mut weights_x: Vec<T> = extremal_freqs.iter().map(|&f| weights(f)).collect();
    let mut delta = compute_delta(&wk, &desired_x, &weights_x);
    let mut yk: Vec<T> = compute_lagrange_ordinates(delta, &desired_x, &weights_x).collect();
    let mut num_iterations = 0;
    let mut flatness = T::infinity();
    let flatness_threshold = T::from_f64_lossy(parameters.flatness_threshold);
    let proxy_degree = parameters.chebyshev_proxy_degree;
    let cheby_nodes: Vec<T> = chebyshev_nodes(proxy_degree).collect();

    // Band edges in the x = cos(f) domain. cos() is decreasing, so the order
    // is reversed and begin and end are swapped.
    let bands_x: Vec<Interval<T>> = radian_bands
        .iter()
        .rev()
        .map(|b| Interval {
            begin: b.end.cos(),
            end: b.begin.cos(),
        })
        .collect();

    for num_iter in 1..=parameters.max_iterations {
        num_iterations = num_iter;
        let interpolant = Interpolant {
            x: &x,
            wk: &wk,
            yk: &yk,
        };
        let subintervals = subdivide(&x, &bands_x);
        // Each subinterval gives its 2 endpoints and at most proxy_degree - 1
        // roots of the derivative of the proxy.
        let mut candidates: Vec<ExtremaCandidate<T>> =
            Vec::with_capacity(subintervals.len() * (proxy_degree + 1));
        candidates.extend(subintervals.iter().flat_map(|interval| {
            [
                interpolant.candidate(interval.begin, desired, weights),
                interpolant.candidate(interval.end, desired, weights),
            ]
        }));
        for interval in &subintervals {
            candidates.extend(find_extrema_in_subinterval(
                interval,
                &cheby_nodes,
                &interpolant,
                desired,
                weights,
                eigenvalue_backend,
            )?);
        }
        candidates.sort_unstable_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

        let candidates = prune_extrema_candidates(&candidates, num_functions + 1)?;

        let MinMaxResult::MinMax(min_error, max_error) = candidates
            .iter()
            .map(|a| a.error.abs())
            .minmax_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        else {
            return Err(Error::NotEnoughExtrema);
        };
        flatness = (max_error - min_error) / max_error;

        // New extremal frequencies. rev() is used because acos() is
        // decreasing.
        for ((f, x0), candidate) in extremal_freqs
            .iter_mut()
            .zip(x.iter_mut())
            .zip(candidates.iter().rev())
        {
            *x0 = candidate.x;
            *f = candidate.x.acos();
        }
        for (dst, src) in wk.iter_mut().zip(compute_barycentric_weights(&x)) {
            *dst = src;
        }
        for ((des, wei), &f) in desired_x
            .iter_mut()
            .zip(weights_x.iter_mut())
            .zip(extremal_freqs.iter())
        {
            *des = desired(f);
            *wei = weights(f);
        }
        delta = compute_delta(&wk, &desired_x, &weights_x);
        for (dst, src) in yk
            .iter_mut()
            .zip(compute_lagrange_ordinates(delta, &desired_x, &weights_x))
        {
            *dst = src;
        }

        tracing::trace!(
            iteration = num_iter,
            flatness = flatness.to_f64_lossy(),
            delta = delta.to_f64_lossy(),
            "remez exchange"
        );
        if flatness <= flatness_threshold {
            break;
        }
    }

    let precision = T::PRECISION;
    let flatness = flatness.to_f64_lossy();
    if flatness.is_nan() || flatness > parameters.flatness_threshold {
        tracing::debug!(
            ?precision,
            iterations = num_iterations,
            flatness,
            "remez exchange stopped above the flatness threshold"
        );
        return Err(Error::NoConvergence {
            iterations: num_iterations,
            flatness,
        });
    }
    tracing::debug!(
        num_taps,
        ?precision,
        iterations = num_iterations,
        flatness,
        weighted_error = delta.abs().to_f64_lossy(),
        "remez exchange converged"
    );

    // Time-domain coefficients. H is evaluated at the Chebyshev nodes of the
    // second kind, and the a_k of H(f) = sum_k a_k cos(k f) are the
    // coefficients of the expansion of H(cos(x)) in Chebyshev polynomials of
    // the first kind.
    let mut ck: Vec<T> = chebyshev_nodes(num_functions - 1)
        .map(|x0| compute_freq_response(x0, &x, &wk, &yk))
        .collect();
    let ak = compute_cheby_coefficients(&mut ck);

    Ok(RemezDesign {
        taps: h_from_ak(&ak, num_taps)
            .into_iter()
            .map(T::to_f64_lossy)
            .collect(),
        weighted_error: delta.abs().to_f64_lossy(),
        extremal_freqs: extremal_freqs
            .iter()
            .map(|&f| (f / T::TAU()).to_f64_lossy())
            .collect(),
        num_iterations,
        flatness,
        precision,
    })
}
