//! Design tables.
//!
//! Both design methods are driven by a table built from the
//! [`FilterSpec`](crate::FilterSpec) and the [`BandLayout`](crate::BandLayout)
//! of its filter type. The bands always cover the whole `[0, fs/2]` range:
//! the user-given edges are completed with DC and Nyquist.
//!
//! - The equiripple method uses a [`RemezTable`]: one edge pair, one gain and
//!   one weight per band.
//! - The least-squares method uses a [`BreakpointTable`]: the desired gain is
//!   given at each band edge, so a flat band is a pair of breakpoints with the
//!   same gain.

use crate::{
    bands::Band,
    error::{Error, Result},
    filter::FilterSpec,
};

/// Band with its desired gain and weight.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BandResponse {
    /// Band, in cycles/sample.
    pub band: Band,
    /// Desired gain in the band.
    pub gain: f64,
    /// Weight of the approximation error in the band.
    pub weight: f64,
}

/// Band/gain/weight table for the equiripple method.
#[derive(Debug, Clone, PartialEq)]
pub struct RemezTable {
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Band edges in Hz, two per band.
    pub edges: Vec<f64>,
    /// Desired gain of each band.
    pub gains: Vec<f64>,
    /// Weight of each band.
    pub weights: Vec<f64>,
}

impl RemezTable {
    /// Returns the bands normalized to cycles/sample, with their gains and
    /// weights.
    pub fn bands(&self) -> Result<Vec<BandResponse>> {
        if self.edges.len() != 2 * self.gains.len() || self.gains.len() != self.weights.len() {
            return Err(Error::BandsEmpty);
        }
        self.edges
            .chunks_exact(2)
            .zip(self.gains.iter().zip(self.weights.iter()))
            .map(|(edges, (&gain, &weight))| {
                let band = Band::new(
                    normalize(edges[0], self.sampling_rate),
                    normalize(edges[1], self.sampling_rate),
                )?;
                Ok(BandResponse { band, gain, weight })
            })
            .collect()
    }
}

/// Piecewise-linear desired gain table for the least-squares method.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointTable {
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Band edges in Hz, two per band.
    pub freqs: Vec<f64>,
    /// Desired gain at each band edge.
    pub gains: Vec<f64>,
    /// Weight of each band.
    pub weights: Vec<f64>,
}

impl BreakpointTable {
    /// Returns the `(frequency, gain)` breakpoints.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.freqs.iter().copied().zip(self.gains.iter().copied())
    }
}

/// Builds the equiripple table of a filter specification.
///
/// The specification is validated first.
pub fn remez_table(spec: &FilterSpec) -> Result<RemezTable> {
    spec.validate()?;
    let layout = spec.filter_type.layout();
    Ok(RemezTable {
        sampling_rate: spec.sampling_rate,
        edges: full_edges(spec),
        gains: layout.gains().collect(),
        weights: spec.band_weights.clone(),
    })
}

/// Builds the least-squares breakpoint table of a filter specification.
///
/// The specification is validated first.
pub fn least_squares_table(spec: &FilterSpec) -> Result<BreakpointTable> {
    spec.validate()?;
    let layout = spec.filter_type.layout();
    Ok(BreakpointTable {
        sampling_rate: spec.sampling_rate,
        freqs: full_edges(spec),
        gains: layout.gains().flat_map(|g| [g, g]).collect(),
        weights: spec.band_weights.clone(),
    })
}

// User edges completed with DC and Nyquist
fn full_edges(spec: &FilterSpec) -> Vec<f64> {
    let mut edges = Vec::with_capacity(spec.band_edges.len() + 2);
    edges.push(0.0);
    edges.extend_from_slice(&spec.band_edges);
    edges.push(spec.nyquist());
    edges
}

// Hz to cycles/sample. The min() keeps fs/2 from rounding beyond 0.5.
fn normalize(freq: f64, sampling_rate: f64) -> f64 {
    (freq / sampling_rate).min(0.5)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filter::{DesignMethod, FilterType};

    #[test]
    fn lowpass_tables() {
        let spec = FilterSpec::default();
        let table = remez_table(&spec).unwrap();
        assert_eq!(table.edges, [0.0, 100.0, 200.0, 500.0]);
        assert_eq!(table.gains, [1.0, 0.0]);
        assert_eq!(table.weights, [1.0, 80.0]);

        let table = least_squares_table(&spec).unwrap();
        assert_eq!(
            table.points().collect::<Vec<_>>(),
            [(0.0, 1.0), (100.0, 1.0), (200.0, 0.0), (500.0, 0.0)]
        );
    }

    #[test]
    fn bandstop_tables() {
        let spec = FilterSpec::new(FilterType::Bandstop, DesignMethod::LeastSquares);
        let table = least_squares_table(&spec).unwrap();
        assert_eq!(table.freqs, [0.0, 100.0, 200.0, 300.0, 400.0, 500.0]);
        assert_eq!(table.gains, [1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(table.weights, [1.0, 80.0, 80.0]);
    }

    #[test]
    fn normalized_bands() {
        let spec = FilterSpec::new(FilterType::Bandpass, DesignMethod::EquiRipple);
        let bands = remez_table(&spec).unwrap().bands().unwrap();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].band, Band::new(0.0, 0.1).unwrap());
        assert_eq!(bands[1].band, Band::new(0.2, 0.3).unwrap());
        assert_eq!(bands[2].band, Band::new(0.4, 0.5).unwrap());
        assert_eq!(
            bands.iter().map(|b| b.gain).collect::<Vec<_>>(),
            [0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn invalid_spec_is_rejected() {
        let mut spec = FilterSpec::default();
        spec.band_edges = vec![300.0, 200.0];
        assert!(matches!(remez_table(&spec), Err(Error::EdgesNotIncreasing)));
        assert!(matches!(
            least_squares_table(&spec),
            Err(Error::EdgesNotIncreasing)
        ));
    }
}
