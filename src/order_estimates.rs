//! FIR filter order estimates.
//!
//! This module contains functions to estimate the required order of an FIR
//! filter according to some design requirements.

use crate::{
    error::{Error, Result},
    filter::{BandKind, DesignMethod, FilterSpec},
};
use std::f64::consts::PI;

/// Estimates the required Parks-McClellan FIR length using the estimate from a
/// paper by Ichige etl.
///
/// This function uses the estimate presented in the following paper:
///
/// K. Ichige, M. Iwaki and R. Ishii, "Accurate estimation of minimum filter
/// length for optimum FIR digital filters," in IEEE Transactions on Circuits and
/// Systems II: Analog and Digital Signal Processing, vol. 47, no. 10,
/// pp. 1008-1016, Oct. 2000.
///
/// The parameters of this function are defined as follows: `fp` denotes the
/// passband edge frequency (normalized to a sample rate of 1), `delta_f`
/// denotes the transition bandwidth, which is defined as the difference between
/// the stopband edge and passband edge frequencies (both normalized to a sample
/// rate of 1), `delta_p` denotes the passband ripple, and `delta_s` denotes the
/// stopband ripple.
pub fn ichige(fp: f64, delta_f: f64, delta_p: f64, delta_s: f64) -> usize {
    let nc = (1.101 * (-(2.0 * delta_p).log10()).powf(1.1) / delta_f + 1.0).ceil();
    let v = 2.325 * (-(delta_p.log10())).powf(-0.445) * delta_f.powf(-1.39);
    let g = |x: f64| 2.0 / PI * (v * (x.recip() - (0.5 - delta_f).recip())).atan();
    let n3 = (nc * (g(fp) + g(0.5 - delta_f - fp) + 1.0) / 3.0).ceil();
    let nm = 0.52 * (delta_p / delta_s).log10() / delta_f * (-(delta_p.log10())).powf(0.17);
    let h =
        |x: f64, c: f64| 2.0 / PI * (c / delta_f * (x.recip() - (0.5 - delta_f).recip())).atan();
    let dn = (nm * (h(fp, 1.1) - (h(0.5 - delta_f - fp, 0.29) - 1.0) / 2.0)).ceil();
    (n3 + dn) as usize
}

/// Estimates the number of taps of an equiripple design.
///
/// The passband ripple is given as peak-to-peak dB and the stopband
/// attenuation as positive dB. Each transition band of `spec` is estimated as
/// a lowpass filter with [`ichige`] (rising transitions are mirrored around
/// `fs/4`), and the largest estimate is returned. Filter types whose last band
/// is a pass band get an odd estimate, since they cannot be designed with an
/// even number of taps.
///
/// The order, weights and density factor of `spec` are ignored.
pub fn estimate_order(
    spec: &FilterSpec,
    passband_ripple_db: f64,
    stopband_attenuation_db: f64,
) -> Result<usize> {
    // only the band edges and the sampling rate matter here
    let mut probe = spec.clone();
    probe.order = 1;
    probe.method = DesignMethod::LeastSquares;
    probe.validate()?;
    if !(passband_ripple_db.is_finite() && passband_ripple_db > 0.0) {
        return Err(Error::InvalidRequirement(passband_ripple_db));
    }
    if !(stopband_attenuation_db.is_finite() && stopband_attenuation_db > 0.0) {
        return Err(Error::InvalidRequirement(stopband_attenuation_db));
    }
    let linear = 10f64.powf(passband_ripple_db / 20.0);
    let delta_p = (linear - 1.0) / (linear + 1.0);
    let delta_s = 10f64.powf(-stopband_attenuation_db / 20.0);

    let layout = spec.filter_type.layout();
    let fs = spec.sampling_rate;
    let estimate = spec
        .band_edges
        .chunks_exact(2)
        .zip(layout.kinds)
        .map(|(edges, kind)| {
            let delta_f = (edges[1] - edges[0]) / fs;
            let fp = match kind {
                BandKind::Pass => edges[0] / fs,
                BandKind::Stop => 0.5 - edges[1] / fs,
            };
            ichige(fp, delta_f, delta_p, delta_s)
        })
        .max()
        .unwrap_or(0);
    let estimate = if spec.filter_type.passes_nyquist() {
        estimate | 1
    } else {
        estimate
    };
    tracing::debug!(filter_type = %spec.filter_type, estimate, "order estimate");
    Ok(estimate)
}

#[cfg(test)]
mod test {
    use crate::filter::{DesignMethod, FilterSpec, FilterType};

    fn spec(filter_type: FilterType, edges: &[f64]) -> FilterSpec {
        let mut spec = FilterSpec::new(filter_type, DesignMethod::EquiRipple);
        spec.sampling_rate = 1.0;
        spec.band_edges = edges.to_vec();
        spec
    }

    #[test]
    fn lowpass_estimate() {
        // ripples of 0.01 and 0.001
        let rp = 20.0 * (1.01f64 / 0.99).log10();
        let spec = spec(FilterType::Lowpass, &[0.1, 0.15]);
        assert_eq!(super::estimate_order(&spec, rp, 60.0).unwrap(), 54);
    }

    #[test]
    fn mirrored_estimate() {
        let rp = 20.0 * (1.01f64 / 0.99).log10();
        let highpass = spec(FilterType::Highpass, &[0.35, 0.4]);
        // mirror of the lowpass above, made odd
        assert_eq!(super::estimate_order(&highpass, rp, 60.0).unwrap(), 55);
        let bandpass = spec(FilterType::Bandpass, &[0.1, 0.15, 0.3, 0.35]);
        // the upper transition dominates
        let lowpass = spec(FilterType::Lowpass, &[0.3, 0.35]);
        assert_eq!(
            super::estimate_order(&bandpass, rp, 60.0).unwrap(),
            super::estimate_order(&lowpass, rp, 60.0).unwrap()
        );
    }

    #[test]
    fn invalid_requirements() {
        let spec = spec(FilterType::Lowpass, &[0.1, 0.15]);
        assert!(matches!(
            super::estimate_order(&spec, 0.0, 60.0),
            Err(crate::error::Error::InvalidRequirement(_))
        ));
        let mut bad = spec.clone();
        bad.band_edges = vec![0.15, 0.1];
        assert!(super::estimate_order(&bad, 0.1, 60.0).is_err());
    }

    #[test]
    fn ichige() {
        assert_eq!(super::ichige(0.1, 0.05, 0.01, 0.001), 54);
        assert_eq!(super::ichige(0.05, 0.05, 0.01, 0.001), 55);
        assert_eq!(super::ichige(0.025, 0.05, 0.01, 0.001), 57);
        assert_eq!(super::ichige(0.1, 0.1, 0.01, 0.001), 28);
        assert_eq!(super::ichige(0.01, 0.01, 0.01, 0.001), 271);
    }
}
