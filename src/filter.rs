use crate::error::{Error, Result};
use std::fmt;

/// Maximum number of taps accepted for an equiripple design.
pub const MAX_EQUIRIPPLE_ORDER: usize = 8192;

/// Maximum number of taps accepted for a least-squares design.
///
/// The least-squares solver works with a dense matrix of `(order + 1) / 2`
/// rows and columns.
pub const MAX_LEAST_SQUARES_ORDER: usize = 8191;

/// Maximum grid density factor.
pub const MAX_DENSITY_FACTOR: usize = 1000;

/// Frequency selective filter type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterType {
    /// Passes frequencies below the first edge.
    Lowpass,
    /// Passes frequencies above the second edge.
    Highpass,
    /// Passes frequencies between the second and third edges.
    Bandpass,
    /// Rejects frequencies between the second and third edges.
    Bandstop,
}

/// FIR design method.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DesignMethod {
    /// Parks-McClellan minimax design.
    EquiRipple,
    /// Weighted least-squares design.
    LeastSquares,
}

/// Whether a band passes or rejects the signal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BandKind {
    /// Pass band, desired gain one.
    Pass,
    /// Stop band, desired gain zero.
    Stop,
}

impl BandKind {
    /// Returns the desired gain of the band.
    pub fn gain(self) -> f64 {
        match self {
            BandKind::Pass => 1.0,
            BandKind::Stop => 0.0,
        }
    }
}

/// Band structure of a filter type.
///
/// This is shared by both design methods. The bands cover `[0, fs/2]`, with
/// the user-given edges separating them, so a layout with `n` bands has
/// `2 * (n - 1)` user edges.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BandLayout {
    /// Pass/stop pattern of the bands, from DC to Nyquist.
    pub kinds: &'static [BandKind],
    /// Labels of the user-given band edges.
    pub edge_labels: &'static [&'static str],
    /// Labels of the band weights.
    pub weight_labels: &'static [&'static str],
}

impl BandLayout {
    /// Returns the number of bands.
    pub fn num_bands(&self) -> usize {
        self.kinds.len()
    }

    /// Returns the number of user-given band edges.
    pub fn num_edges(&self) -> usize {
        self.edge_labels.len()
    }

    /// Returns the desired gain of each band.
    pub fn gains(&self) -> impl Iterator<Item = f64> + '_ {
        self.kinds.iter().map(|k| k.gain())
    }
}

static LOWPASS: BandLayout = BandLayout {
    kinds: &[BandKind::Pass, BandKind::Stop],
    edge_labels: &["Fpass", "Fstop"],
    weight_labels: &["Wpass", "Wstop"],
};

static HIGHPASS: BandLayout = BandLayout {
    kinds: &[BandKind::Stop, BandKind::Pass],
    edge_labels: &["Fstop", "Fpass"],
    weight_labels: &["Wstop", "Wpass"],
};

static BANDPASS: BandLayout = BandLayout {
    kinds: &[BandKind::Stop, BandKind::Pass, BandKind::Stop],
    edge_labels: &["Fstop1", "Fpass1", "Fpass2", "Fstop2"],
    weight_labels: &["Wstop1", "Wpass1", "Wstop2"],
};

static BANDSTOP: BandLayout = BandLayout {
    kinds: &[BandKind::Pass, BandKind::Stop, BandKind::Pass],
    edge_labels: &["Fpass1", "Fstop1", "Fstop2", "Fpass2"],
    weight_labels: &["Wpass1", "Wstop1", "Wpass2"],
};

impl FilterType {
    /// All the filter types.
    pub const ALL: [FilterType; 4] = [
        FilterType::Lowpass,
        FilterType::Highpass,
        FilterType::Bandpass,
        FilterType::Bandstop,
    ];

    /// Returns the band layout of this filter type.
    pub fn layout(self) -> &'static BandLayout {
        match self {
            FilterType::Lowpass => &LOWPASS,
            FilterType::Highpass => &HIGHPASS,
            FilterType::Bandpass => &BANDPASS,
            FilterType::Bandstop => &BANDSTOP,
        }
    }

    /// Returns true if the last band (the one ending at Nyquist) is a pass
    /// band.
    pub fn passes_nyquist(self) -> bool {
        self.layout().kinds.last() == Some(&BandKind::Pass)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterType::Lowpass => "lowpass",
            FilterType::Highpass => "highpass",
            FilterType::Bandpass => "bandpass",
            FilterType::Bandstop => "bandstop",
        };
        f.write_str(name)
    }
}

impl fmt::Display for DesignMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DesignMethod::EquiRipple => "equiripple",
            DesignMethod::LeastSquares => "least-squares",
        };
        f.write_str(name)
    }
}

/// FIR filter specification.
///
/// This is built fresh from user input for every design request and consumed
/// by [`design`](crate::design). Band edges and the sampling rate are in Hz.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSpec {
    /// Filter type.
    pub filter_type: FilterType,
    /// Design method.
    pub method: DesignMethod,
    /// Number of taps.
    pub order: usize,
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Band edges in Hz, strictly increasing and inside `(0, fs/2)`.
    ///
    /// Two edges for lowpass and highpass, four for bandpass and bandstop.
    pub band_edges: Vec<f64>,
    /// Weight of each band, from DC to Nyquist.
    pub band_weights: Vec<f64>,
    /// Extremum search density. Only used by the equiripple method.
    pub density_factor: usize,
}

impl FilterSpec {
    /// Creates a specification with default parameters.
    ///
    /// The defaults are 129 taps at a sampling rate of 1000 Hz, band edges at
    /// 100, 200, 300 and 400 Hz (only the first two for lowpass and highpass),
    /// a weight of 1 on the first band and 80 on the rest, and a density
    /// factor of 16.
    pub fn new(filter_type: FilterType, method: DesignMethod) -> FilterSpec {
        let layout = filter_type.layout();
        let band_edges = [100.0, 200.0, 300.0, 400.0][..layout.num_edges()].to_vec();
        let band_weights = [1.0, 80.0, 80.0][..layout.num_bands()].to_vec();
        FilterSpec {
            filter_type,
            method,
            order: 129,
            sampling_rate: 1000.0,
            band_edges,
            band_weights,
            density_factor: 16,
        }
    }

    /// Returns the Nyquist frequency, `fs / 2`.
    pub fn nyquist(&self) -> f64 {
        0.5 * self.sampling_rate
    }

    /// Checks that the specification is well formed.
    ///
    /// This does not guarantee that the design will succeed: the numerical
    /// solvers can still reject a well formed specification, for instance if
    /// the transition bands are too narrow for the requested order.
    pub fn validate(&self) -> Result<()> {
        let layout = self.filter_type.layout();
        if self.order == 0 {
            return Err(Error::InvalidOrder(self.order));
        }
        match self.method {
            DesignMethod::EquiRipple => {
                if self.order > MAX_EQUIRIPPLE_ORDER {
                    return Err(Error::InvalidOrder(self.order));
                }
                if !(1..=MAX_DENSITY_FACTOR).contains(&self.density_factor) {
                    return Err(Error::InvalidDensity(self.density_factor));
                }
            }
            DesignMethod::LeastSquares => {
                if self.order > MAX_LEAST_SQUARES_ORDER {
                    return Err(Error::InvalidOrder(self.order));
                }
                if self.order % 2 == 0 {
                    return Err(Error::EvenLengthLeastSquares(self.order));
                }
            }
        }
        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(Error::InvalidSamplingRate(self.sampling_rate));
        }
        if self.band_edges.len() != layout.num_edges() {
            return Err(Error::EdgeCount {
                filter_type: self.filter_type,
                expected: layout.num_edges(),
                found: self.band_edges.len(),
            });
        }
        if self.band_weights.len() != layout.num_bands() {
            return Err(Error::WeightCount {
                filter_type: self.filter_type,
                expected: layout.num_bands(),
                found: self.band_weights.len(),
            });
        }
        let nyquist = self.nyquist();
        if let Some(&edge) = self
            .band_edges
            .iter()
            .find(|&&e| !(e > 0.0 && e < nyquist))
        {
            return Err(Error::EdgeOutOfRange { edge, nyquist });
        }
        if self.band_edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::EdgesNotIncreasing);
        }
        if let Some(&weight) = self
            .band_weights
            .iter()
            .find(|&&w| !(w.is_finite() && w > 0.0))
        {
            return Err(Error::InvalidWeight(weight));
        }
        Ok(())
    }
}

impl Default for FilterSpec {
    fn default() -> FilterSpec {
        FilterSpec::new(FilterType::Lowpass, DesignMethod::EquiRipple)
    }
}

/// Designed FIR filter.
///
/// A `TapResult` is produced once per design request and never modified; a
/// new request replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TapResult {
    taps: Vec<f64>,
    sampling_rate: f64,
}

impl TapResult {
    pub(crate) fn new(taps: Vec<f64>, sampling_rate: f64) -> TapResult {
        TapResult {
            taps,
            sampling_rate,
        }
    }

    /// Returns the zeroed result that stands in after a failed design.
    ///
    /// It has a single zero tap and a sampling rate of zero, so it never has
    /// anything to analyze.
    pub fn cleared() -> TapResult {
        TapResult::new(vec![0.0], 0.0)
    }

    /// Returns the filter taps.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Returns the sampling rate used for the design, in Hz.
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Returns true if there is enough data for a frequency response, that
    /// is, at least two taps.
    pub fn is_analyzable(&self) -> bool {
        self.taps.len() >= 2
    }

    /// Consumes the result, returning the taps.
    pub fn into_taps(self) -> Vec<f64> {
        self.taps
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layouts() {
        for filter_type in FilterType::ALL {
            let layout = filter_type.layout();
            assert_eq!(layout.num_edges(), 2 * (layout.num_bands() - 1));
            assert_eq!(layout.weight_labels.len(), layout.num_bands());
        }
        let gains = |t: FilterType| t.layout().gains().collect::<Vec<_>>();
        assert_eq!(gains(FilterType::Lowpass), [1.0, 0.0]);
        assert_eq!(gains(FilterType::Highpass), [0.0, 1.0]);
        assert_eq!(gains(FilterType::Bandpass), [0.0, 1.0, 0.0]);
        assert_eq!(gains(FilterType::Bandstop), [1.0, 0.0, 1.0]);
        assert!(FilterType::Highpass.passes_nyquist());
        assert!(!FilterType::Bandpass.passes_nyquist());
    }

    #[test]
    fn defaults_are_valid() {
        for filter_type in FilterType::ALL {
            for method in [DesignMethod::EquiRipple, DesignMethod::LeastSquares] {
                FilterSpec::new(filter_type, method).validate().unwrap();
            }
        }
        let spec = FilterSpec::new(FilterType::Bandstop, DesignMethod::LeastSquares);
        assert_eq!(spec.band_edges, [100.0, 200.0, 300.0, 400.0]);
        assert_eq!(spec.band_weights, [1.0, 80.0, 80.0]);
    }

    #[test]
    fn invalid_specs() {
        let mut spec = FilterSpec::default();
        spec.order = 0;
        assert!(matches!(spec.validate(), Err(Error::InvalidOrder(0))));

        let mut spec = FilterSpec::default();
        spec.order = MAX_EQUIRIPPLE_ORDER + 1;
        assert!(matches!(spec.validate(), Err(Error::InvalidOrder(_))));

        let mut spec = FilterSpec::new(FilterType::Lowpass, DesignMethod::LeastSquares);
        spec.order = MAX_LEAST_SQUARES_ORDER;
        assert!(spec.validate().is_ok());
        spec.order = MAX_LEAST_SQUARES_ORDER + 2;
        assert!(matches!(
            spec.validate(),
            Err(Error::InvalidOrder(order)) if order == MAX_LEAST_SQUARES_ORDER + 2
        ));
        spec.order = 9_999_999;
        assert!(matches!(spec.validate(), Err(Error::InvalidOrder(_))));

        let mut spec = FilterSpec::default();
        spec.band_edges = vec![200.0, 100.0];
        assert!(matches!(spec.validate(), Err(Error::EdgesNotIncreasing)));

        let mut spec = FilterSpec::default();
        spec.band_edges = vec![100.0, 500.0];
        assert!(matches!(
            spec.validate(),
            Err(Error::EdgeOutOfRange { edge, .. }) if edge == 500.0
        ));

        let mut spec = FilterSpec::default();
        spec.band_edges = vec![100.0, 200.0, 300.0];
        assert!(matches!(
            spec.validate(),
            Err(Error::EdgeCount {
                expected: 2,
                found: 3,
                ..
            })
        ));

        let mut spec = FilterSpec::new(FilterType::Bandpass, DesignMethod::EquiRipple);
        spec.band_weights = vec![1.0, 1.0];
        assert!(matches!(spec.validate(), Err(Error::WeightCount { .. })));

        let mut spec = FilterSpec::default();
        spec.band_weights = vec![1.0, -2.0];
        assert!(matches!(spec.validate(), Err(Error::InvalidWeight(_))));

        let mut spec = FilterSpec::default();
        spec.density_factor = 0;
        assert!(matches!(spec.validate(), Err(Error::InvalidDensity(0))));

        let mut spec = FilterSpec::default();
        spec.sampling_rate = f64::NAN;
        assert!(matches!(spec.validate(), Err(Error::InvalidSamplingRate(_))));

        let mut spec = FilterSpec::new(FilterType::Lowpass, DesignMethod::LeastSquares);
        spec.order = 128;
        assert!(matches!(
            spec.validate(),
            Err(Error::EvenLengthLeastSquares(128))
        ));
    }

    #[test]
    fn cleared_result() {
        let result = TapResult::cleared();
        assert_eq!(result.taps(), [0.0]);
        assert_eq!(result.sampling_rate(), 0.0);
        assert!(!result.is_analyzable());
    }
}
