//! Frequency response analysis.
//!
//! The frequency response of a filter is computed with a zero-padded FFT of
//! its taps. Only the first half of the spectrum, from DC up to (but not
//! including) the Nyquist frequency, is kept. Magnitudes are given in dB with
//! a limited dynamic range (see [`to_db`]), so that the zeros of the response
//! do not produce `-inf`.

use crate::options::AnalysisOptions;
use rustfft::{Fft, FftPlanner, num_complex::Complex64};
use std::fmt;

/// Frequency response of a filter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseCurve {
    /// Frequencies in Hz, from 0 up to (excluding) `fs / 2`.
    pub frequencies: Vec<f64>,
    /// Magnitude response in dB, one value per frequency.
    pub magnitude_db: Vec<f64>,
    /// Phase response in radians, in `(-pi, pi]`, if it was requested.
    pub phase_rad: Option<Vec<f64>>,
}

impl ResponseCurve {
    /// Returns the number of frequency points.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns true if the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Impulse response of a filter: the taps against the sample index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpulseResponse {
    /// Filter taps.
    pub taps: Vec<f64>,
}

impl ImpulseResponse {
    /// Returns the `(sample index, amplitude)` points.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.taps.iter().copied().enumerate()
    }
}

/// Analysis view of a filter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnalysisView {
    /// Magnitude response.
    #[default]
    Magnitude,
    /// Phase response.
    Phase,
    /// Magnitude and phase responses.
    MagnitudePhase,
    /// Impulse response.
    Impulse,
}

impl AnalysisView {
    /// Returns true if the view shows the phase response.
    pub fn needs_phase(self) -> bool {
        matches!(self, AnalysisView::Phase | AnalysisView::MagnitudePhase)
    }
}

/// Data to plot for an [`AnalysisView`].
#[derive(Debug, Clone, PartialEq)]
pub enum Plot {
    /// Frequency response, for the magnitude and phase views.
    Frequency(ResponseCurve),
    /// Impulse response.
    Impulse(ImpulseResponse),
}

/// Frequency response analyzer.
///
/// The analyzer keeps an FFT planner, so that plans are reused when filters of
/// the same length are analyzed repeatedly.
pub struct ResponseAnalyzer {
    planner: FftPlanner<f64>,
    options: AnalysisOptions,
}

impl fmt::Debug for ResponseAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseAnalyzer")
            .field("options", &self.options)
            .finish()
    }
}

impl Default for ResponseAnalyzer {
    fn default() -> ResponseAnalyzer {
        ResponseAnalyzer::new(AnalysisOptions::default())
    }
}

impl ResponseAnalyzer {
    /// Creates a new analyzer.
    pub fn new(options: AnalysisOptions) -> ResponseAnalyzer {
        ResponseAnalyzer {
            planner: FftPlanner::new(),
            options,
        }
    }

    /// Returns the analysis options.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Returns a mutable reference to the analysis options.
    pub fn options_mut(&mut self) -> &mut AnalysisOptions {
        &mut self.options
    }

    /// Computes the frequency response of a filter.
    ///
    /// The taps are zero-padded to `taps.len() * oversampling` samples, and
    /// the first `taps.len() * oversampling / 2` bins of their FFT are
    /// returned. The frequency of bin `k` is `k / n * fs / 2`, where `n` is
    /// the number of bins.
    ///
    /// Returns `None` if there are fewer than 2 taps or the oversampling is
    /// zero, since there is nothing to show. `None` is also returned if the
    /// FFT length overflows `usize`.
    pub fn analyze(&mut self, taps: &[f64], sampling_rate: f64) -> Option<ResponseCurve> {
        let fft_len = taps.len().checked_mul(self.options.oversampling())?;
        if taps.len() < 2 || fft_len < 2 {
            return None;
        }
        let mut buffer = vec![Complex64::new(0.0, 0.0); fft_len];
        for (b, &t) in buffer.iter_mut().zip(taps) {
            *b = Complex64::new(t, 0.0);
        }
        self.planner.plan_fft_forward(fft_len).process(&mut buffer);
        buffer.truncate(fft_len / 2);

        let n = buffer.len();
        let scale = 0.5 * sampling_rate / n as f64;
        let frequencies = (0..n).map(|k| k as f64 * scale).collect();
        let magnitudes: Vec<f64> = buffer.iter().map(|z| z.norm()).collect();
        let phase_rad = self
            .options
            .with_phase()
            .then(|| buffer.iter().map(|z| z.arg()).collect());
        tracing::debug!(num_taps = taps.len(), fft_len, "frequency response");
        Some(ResponseCurve {
            frequencies,
            magnitude_db: to_db(&magnitudes, &self.options),
            phase_rad,
        })
    }

    /// Returns the impulse response of a filter, which is the list of taps
    /// itself.
    ///
    /// Returns `None` if there are fewer than 2 taps.
    pub fn impulse(&self, taps: &[f64]) -> Option<ImpulseResponse> {
        (taps.len() >= 2).then(|| ImpulseResponse {
            taps: taps.to_vec(),
        })
    }

    /// Computes the data of an analysis view.
    ///
    /// The phase is computed for the views that show it, regardless of the
    /// phase option of the analyzer. Returns `None` if there are fewer than
    /// 2 taps.
    pub fn view(&mut self, view: AnalysisView, taps: &[f64], sampling_rate: f64) -> Option<Plot> {
        match view {
            AnalysisView::Impulse => self.impulse(taps).map(Plot::Impulse),
            _ => {
                let with_phase = self.options.with_phase();
                self.options.set_with_phase(view.needs_phase());
                let curve = self.analyze(taps, sampling_rate);
                self.options.set_with_phase(with_phase);
                curve.map(Plot::Frequency)
            }
        }
    }
}

/// Computes the frequency response of a filter with default options.
///
/// `n_points` is the oversampling factor of the FFT. See
/// [`ResponseAnalyzer::analyze`].
pub fn analyze(taps: &[f64], sampling_rate: f64, n_points: usize) -> Option<ResponseCurve> {
    let mut options = AnalysisOptions::default();
    options.set_oversampling(n_points);
    ResponseAnalyzer::new(options).analyze(taps, sampling_rate)
}

/// Converts magnitudes to dB.
///
/// The magnitudes are converted with `20 log10(|x|)`, and the values that are
/// further than the dynamic range below the maximum are replaced by the
/// maximum minus the dynamic range. Then the values are normalized so that
/// the maximum is 0 dB (if requested), and finally the values below the dB
/// cut (if any) are replaced by the cut.
///
/// If all the magnitudes are zero, the result is flat at minus the dynamic
/// range.
pub fn to_db(magnitudes: &[f64], options: &AnalysisOptions) -> Vec<f64> {
    let range = options.dynamic_range_db();
    let db: Vec<f64> = magnitudes.iter().map(|m| 20.0 * m.abs().log10()).collect();
    let max_db = db.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut db = if max_db.is_finite() {
        let floor = max_db - range;
        let offset = if options.normalize() { max_db } else { 0.0 };
        // f64::max also replaces NaN by the floor
        db.into_iter().map(|d| d.max(floor) - offset).collect()
    } else {
        vec![-range; db.len()]
    };
    if let Some(cut) = options.db_cut() {
        for d in db.iter_mut() {
            *d = d.max(cut);
        }
    }
    db
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn db_conversion() {
        let options = AnalysisOptions::default();
        let db = to_db(&[10.0, 1.0, 0.0, 1e-10], &options);
        assert_eq!(db[0], 0.0);
        assert!((db[1] + 20.0).abs() < 1e-12);
        assert_eq!(db[2], -90.0);
        assert_eq!(db[3], -90.0);

        let mut options = AnalysisOptions::default();
        options.set_normalize(false).set_db_cut(Some(0.0));
        let db = to_db(&[10.0, 0.1], &options);
        assert!((db[0] - 20.0).abs() < 1e-12);
        assert_eq!(db[1], 0.0);
    }

    #[test]
    fn all_zero_magnitudes() {
        let db = to_db(&[0.0; 8], &AnalysisOptions::default());
        assert_eq!(db, [-90.0; 8]);
    }

    #[test]
    fn nothing_to_show() {
        assert!(analyze(&[1.0], 1000.0, 1024).is_none());
        assert!(analyze(&[], 1000.0, 1024).is_none());
        assert!(analyze(&[1.0, 0.0], 1000.0, 0).is_none());
        assert!(ResponseAnalyzer::default().impulse(&[0.0]).is_none());
    }

    #[test]
    fn fft_length_overflow() {
        let mut analyzer = ResponseAnalyzer::default();
        analyzer.options_mut().set_oversampling(usize::MAX);
        assert!(analyzer.analyze(&[1.0, 0.0], 1000.0).is_none());
        assert!(analyze(&[0.5, 0.5, 0.5], 1000.0, usize::MAX / 2).is_none());
    }

    #[test]
    fn allpass() {
        let curve = analyze(&[1.0, 0.0, 0.0], 1000.0, 16).unwrap();
        assert_eq!(curve.len(), 24);
        assert!(curve.magnitude_db.iter().all(|&d| d.abs() < 1e-9));
        assert!(curve.phase_rad.is_none());
    }

    #[test]
    fn phase_of_delay() {
        let mut analyzer = ResponseAnalyzer::default();
        analyzer.options_mut().set_oversampling(8).set_with_phase(true);
        let curve = analyzer.analyze(&[0.0, 1.0], 2.0).unwrap();
        let phase = curve.phase_rad.unwrap();
        // one sample delay: phase = -2 pi f / fs
        for (&f, &p) in curve.frequencies.iter().zip(phase.iter()) {
            assert!((p + std::f64::consts::PI * f).abs() < 1e-9);
        }
    }

    #[test]
    fn views() {
        let taps = [0.25, 0.5, 0.25];
        let mut analyzer = ResponseAnalyzer::default();
        match analyzer.view(AnalysisView::Impulse, &taps, 1000.0) {
            Some(Plot::Impulse(impulse)) => {
                assert_eq!(impulse.points().collect::<Vec<_>>(), [
                    (0, 0.25),
                    (1, 0.5),
                    (2, 0.25)
                ])
            }
            other => panic!("unexpected plot {other:?}"),
        }
        match analyzer.view(AnalysisView::MagnitudePhase, &taps, 1000.0) {
            Some(Plot::Frequency(curve)) => assert!(curve.phase_rad.is_some()),
            other => panic!("unexpected plot {other:?}"),
        }
        match analyzer.view(AnalysisView::Magnitude, &taps, 1000.0) {
            Some(Plot::Frequency(curve)) => assert!(curve.phase_rad.is_none()),
            other => panic!("unexpected plot {other:?}"),
        }
        assert!(!analyzer.options().with_phase());
    }
}
