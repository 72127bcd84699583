//! Design and analysis options.
//!
//! Both option structs are created with reasonable defaults through
//! [`Default`], and individual values can be changed with the chained setters.

use crate::remez::Precision;

/// Options of the numerical design methods.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignOptions {
    max_iterations: usize,
    flatness_threshold: f64,
    precision: Precision,
}

impl DesignOptions {
    /// Returns the maximum number of Remez exchange iterations.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the flatness threshold used to stop the Remez exchange.
    ///
    /// The flatness is the difference between the maximum and the minimum
    /// absolute weighted error over the extremal frequencies, divided by the
    /// maximum. The exchange stops as soon as it is below the threshold.
    pub fn flatness_threshold(&self) -> f64 {
        self.flatness_threshold
    }

    /// Returns the arithmetic precision of the Remez exchange.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Sets the maximum number of Remez exchange iterations.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the flatness threshold used to stop the Remez exchange.
    pub fn set_flatness_threshold(&mut self, flatness_threshold: f64) -> &mut Self {
        self.flatness_threshold = flatness_threshold;
        self
    }

    /// Sets the arithmetic precision of the Remez exchange.
    pub fn set_precision(&mut self, precision: Precision) -> &mut Self {
        self.precision = precision;
        self
    }
}

impl Default for DesignOptions {
    fn default() -> DesignOptions {
        DesignOptions {
            max_iterations: 100,
            flatness_threshold: 1e-3,
            precision: Precision::Auto,
        }
    }
}

/// Options of the frequency response analysis.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisOptions {
    oversampling: usize,
    dynamic_range_db: f64,
    normalize: bool,
    db_cut: Option<f64>,
    with_phase: bool,
}

impl AnalysisOptions {
    /// Returns the zero-padding factor of the FFT.
    ///
    /// The taps are zero-padded to `oversampling` times their length.
    pub fn oversampling(&self) -> usize {
        self.oversampling
    }

    /// Returns the dynamic range of the magnitude response in dB.
    ///
    /// Magnitudes further than this below the peak are clamped.
    pub fn dynamic_range_db(&self) -> f64 {
        self.dynamic_range_db
    }

    /// Returns true if the magnitude response is normalized to a 0 dB peak.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Returns the lower cut applied after normalization, if any.
    pub fn db_cut(&self) -> Option<f64> {
        self.db_cut
    }

    /// Returns true if the phase response is computed.
    pub fn with_phase(&self) -> bool {
        self.with_phase
    }

    /// Sets the zero-padding factor of the FFT.
    pub fn set_oversampling(&mut self, oversampling: usize) -> &mut Self {
        self.oversampling = oversampling;
        self
    }

    /// Sets the dynamic range of the magnitude response in dB.
    pub fn set_dynamic_range_db(&mut self, dynamic_range_db: f64) -> &mut Self {
        self.dynamic_range_db = dynamic_range_db;
        self
    }

    /// Sets whether the magnitude response is normalized to a 0 dB peak.
    pub fn set_normalize(&mut self, normalize: bool) -> &mut Self {
        self.normalize = normalize;
        self
    }

    /// Sets the lower cut applied after normalization.
    pub fn set_db_cut(&mut self, db_cut: Option<f64>) -> &mut Self {
        self.db_cut = db_cut;
        self
    }

    /// Sets whether the phase response is computed.
    pub fn set_with_phase(&mut self, with_phase: bool) -> &mut Self {
        self.with_phase = with_phase;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> AnalysisOptions {
        AnalysisOptions {
            oversampling: 1024,
            dynamic_range_db: 90.0,
            normalize: true,
            db_cut: None,
            with_phase: false,
        }
    }
}
