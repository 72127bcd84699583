//! Error types used by `fir_designer`.

use crate::filter::FilterType;
use thiserror::Error;

/// `fir_designer` `Result` type.
pub type Result<T> = core::result::Result<T, Error>;

/// `fir_designer` error.
///
/// Every variant means that the requested filter cannot be designed. The
/// caller is expected to discard the attempted result and report the message
/// to the user. Variants for which [`Error::is_numerical`] returns `true` come
/// from the numerical solvers (the input was well formed, but the design is
/// infeasible for the requested order); the rest are malformed input.
#[derive(Error, Debug)]
pub enum Error {
    /// The filter order (number of taps) is zero or out of range.
    #[error("invalid filter order {0}")]
    InvalidOrder(usize),
    /// The number of band edges does not match the filter type.
    #[error("{filter_type} filter needs {expected} band edges, got {found}")]
    EdgeCount {
        /// Filter type being designed.
        filter_type: FilterType,
        /// Number of edges required by the filter type.
        expected: usize,
        /// Number of edges given.
        found: usize,
    },
    /// The number of band weights does not match the filter type.
    #[error("{filter_type} filter needs {expected} band weights, got {found}")]
    WeightCount {
        /// Filter type being designed.
        filter_type: FilterType,
        /// Number of weights required by the filter type.
        expected: usize,
        /// Number of weights given.
        found: usize,
    },
    /// The band edges are not strictly increasing.
    #[error("band edges must be strictly increasing")]
    EdgesNotIncreasing,
    /// A band edge is not inside the open interval (0, fs/2).
    #[error("band edge {edge} is outside (0, {nyquist})")]
    EdgeOutOfRange {
        /// Offending band edge.
        edge: f64,
        /// Nyquist frequency for the requested sampling rate.
        nyquist: f64,
    },
    /// The sampling rate is not a positive finite number.
    #[error("invalid sampling rate {0}")]
    InvalidSamplingRate(f64),
    /// A band weight is not a positive finite number.
    #[error("invalid band weight {0}")]
    InvalidWeight(f64),
    /// The grid density factor is out of range.
    #[error("invalid density factor {0}")]
    InvalidDensity(usize),
    /// Least-squares designs need an odd number of taps.
    #[error("least-squares design needs an odd number of taps, got {0}")]
    EvenLengthLeastSquares(usize),
    /// A ripple or attenuation requirement is not a positive finite number.
    #[error("invalid ripple or attenuation requirement {0} dB")]
    InvalidRequirement(f64),
    /// Too few taps for an equiripple design.
    #[error("equiripple design needs at least 3 taps, got {0}")]
    TooFewTaps(usize),
    /// The list of bands is empty.
    #[error("the list of bands is empty")]
    BandsEmpty,
    /// The begin of the band is greater than the end of the band.
    #[error("band begin is greater than band end")]
    BandLimitsWrongOrder,
    /// The band limits are out of bounds.
    #[error("band limits out of bounds")]
    BandLimitsOutOfBounds,
    /// The bands overlap.
    #[error("bands overlap")]
    BandsOverlap,
    /// The derivative of the Chebyshev proxy polynomial is zero.
    ///
    /// This error can happen due to numerical errors, and it prevents the Remez
    /// exchange algorithm from continuing.
    #[error("derivative of Chebyshev proxy is zero")]
    ProxyDerivativeZero,
    /// An error happened during the computation of eigenvalues.
    ///
    /// Eigenvalues are computed to find the roots of the derivative of the
    /// Chebyshev proxy.
    #[error("unable to compute eigenvalues: {0}")]
    EigenvaluesError(String),
    /// The desired response cannot be realized with the requested number of
    /// taps.
    #[error("invalid desired response: {0}")]
    InvalidResponse(InvalidResponse),
    /// Not enough alternating extrema were found for Remez exchange.
    ///
    /// This typically happens when the band edges are too close together
    /// for the requested order.
    #[error("not enough alternating error extrema found")]
    NotEnoughExtrema,
    /// The Remez exchange did not reach the flatness threshold.
    #[error("remez exchange did not converge after {iterations} iterations (flatness {flatness})")]
    NoConvergence {
        /// Number of iterations performed.
        iterations: usize,
        /// Flatness reached in the last iteration.
        flatness: f64,
    },
    /// The least-squares normal equations could not be solved.
    #[error("least-squares system is singular")]
    SingularSystem,
}

impl Error {
    /// Returns `true` if the error was raised by one of the numerical solvers
    /// rather than by input validation.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            Error::ProxyDerivativeZero
                | Error::EigenvaluesError(_)
                | Error::InvalidResponse(_)
                | Error::NotEnoughExtrema
                | Error::NoConvergence { .. }
                | Error::SingularSystem
        )
    }
}

/// Invalid desired response error.
///
/// An even symmetric filter with an even number of taps (type II) always has a
/// zero at the Nyquist frequency.
#[derive(Error, Debug)]
pub enum InvalidResponse {
    /// An even symmetric even length filter must have zero response at the Nyquist frequency
    #[error(
        "an even symmetric even length filter must have zero response at the Nyquist frequency"
    )]
    EvenLengthNyquist,
}

impl From<InvalidResponse> for Error {
    fn from(value: InvalidResponse) -> Error {
        Error::InvalidResponse(value)
    }
}
