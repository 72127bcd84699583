//! Filter design entry points.

use crate::{
    error::Result,
    filter::{DesignMethod, FilterSpec, TapResult},
    firls::firls,
    options::DesignOptions,
    remez::{RemezParameters, remez},
    tables::{least_squares_table, remez_table},
};

// Lowest Chebyshev proxy degree used for the extremum search
const MIN_PROXY_DEGREE: usize = 4;

/// Designs a FIR filter with the default [`DesignOptions`].
///
/// See [`design_with_options`].
pub fn design(spec: &FilterSpec) -> Result<TapResult> {
    design_with_options(spec, &DesignOptions::default())
}

/// Designs a FIR filter.
///
/// The specification is validated, turned into the table of its design
/// method ([`remez_table`] or [`least_squares_table`]) and handed to the
/// numerical solver. On success the result holds `spec.order` taps and the
/// sampling rate of the specification.
///
/// The density factor of the specification sets the degree of the Chebyshev
/// proxy used by the equiripple method to locate the error extrema. Values
/// below 4 are raised to 4. With the default options, equiripple designs that
/// exhaust the `f64` precision are repeated in extended precision, which is
/// much slower.
///
/// # Errors
///
/// An error is returned if the specification is malformed or if the solver
/// fails, typically because the transition bands are too narrow for the
/// requested order. No partial result is produced.
pub fn design_with_options(spec: &FilterSpec, options: &DesignOptions) -> Result<TapResult> {
    tracing::debug!(
        filter_type = %spec.filter_type,
        method = %spec.method,
        order = spec.order,
        sampling_rate = spec.sampling_rate,
        "design request"
    );
    let taps = match spec.method {
        DesignMethod::EquiRipple => {
            let bands = remez_table(spec)?.bands()?;
            let mut parameters = RemezParameters::new(spec.order, bands)?;
            parameters
                .set_chebyshev_proxy_degree(spec.density_factor.max(MIN_PROXY_DEGREE))
                .set_max_iterations(options.max_iterations())
                .set_flatness_threshold(options.flatness_threshold())
                .set_precision(options.precision());
            remez(&parameters)?.taps
        }
        DesignMethod::LeastSquares => firls(spec.order, &least_squares_table(spec)?)?,
    };
    Ok(TapResult::new(taps, spec.sampling_rate))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::Error, filter::FilterType};

    #[test]
    fn default_spec() {
        let result = design(&FilterSpec::default()).unwrap();
        assert_eq!(result.taps().len(), 129);
        assert_eq!(result.sampling_rate(), 1000.0);
    }

    #[test]
    fn malformed_spec() {
        let mut spec = FilterSpec::default();
        spec.order = 0;
        assert!(matches!(design(&spec), Err(Error::InvalidOrder(0))));
        let mut spec = FilterSpec::new(FilterType::Bandpass, DesignMethod::LeastSquares);
        spec.band_edges.pop();
        assert!(matches!(design(&spec), Err(Error::EdgeCount { .. })));
    }

    #[test]
    fn short_equiripple() {
        let mut spec = FilterSpec::default();
        spec.order = 2;
        assert!(matches!(design(&spec), Err(Error::TooFewTaps(2))));
    }
}
