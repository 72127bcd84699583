//! Design and analysis session.
//!
//! A [`DesignSession`] follows the request cycle of an interactive filter
//! designer: the user requests a design from a [`FilterSpec`], then looks at
//! it through one of the analysis views. A failed design request clears the
//! current filter, so a stale filter is never shown as the result of the
//! failed request.

use crate::{
    design::design_with_options,
    error::Result,
    filter::{FilterSpec, TapResult},
    options::{AnalysisOptions, DesignOptions},
    response::{AnalysisView, Plot, ResponseAnalyzer},
};

/// Interactive design session.
#[derive(Debug)]
pub struct DesignSession {
    result: TapResult,
    view: AnalysisView,
    design_options: DesignOptions,
    analyzer: ResponseAnalyzer,
}

impl Default for DesignSession {
    fn default() -> DesignSession {
        DesignSession::new(DesignOptions::default(), AnalysisOptions::default())
    }
}

impl DesignSession {
    /// Creates a new session.
    ///
    /// The session starts with the cleared result and the magnitude view.
    pub fn new(design_options: DesignOptions, analysis_options: AnalysisOptions) -> DesignSession {
        DesignSession {
            result: TapResult::cleared(),
            view: AnalysisView::default(),
            design_options,
            analyzer: ResponseAnalyzer::new(analysis_options),
        }
    }

    /// Designs a filter, replacing the current one.
    ///
    /// On error the current filter is replaced by [`TapResult::cleared`] and
    /// the error is returned.
    pub fn request_design(&mut self, spec: &FilterSpec) -> Result<&TapResult> {
        match design_with_options(spec, &self.design_options) {
            Ok(result) => {
                self.result = result;
                Ok(&self.result)
            }
            Err(err) => {
                tracing::warn!(%err, "design request failed, clearing filter");
                self.result = TapResult::cleared();
                Err(err)
            }
        }
    }

    /// Returns the current filter.
    pub fn result(&self) -> &TapResult {
        &self.result
    }

    /// Returns the selected analysis view.
    pub fn view(&self) -> AnalysisView {
        self.view
    }

    /// Selects the analysis view.
    pub fn set_view(&mut self, view: AnalysisView) -> &mut Self {
        self.view = view;
        self
    }

    /// Returns the data to plot for the selected view.
    ///
    /// Returns `None` if the current filter has fewer than 2 taps, which is
    /// always the case after a failed design request.
    pub fn plot(&mut self) -> Option<Plot> {
        if !self.result.is_analyzable() {
            return None;
        }
        self.analyzer
            .view(self.view, self.result.taps(), self.result.sampling_rate())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::Error,
        filter::{DesignMethod, FilterType},
    };

    #[test]
    fn failed_request_clears() {
        let mut session = DesignSession::default();
        assert!(session.plot().is_none());
        let spec = FilterSpec::new(FilterType::Lowpass, DesignMethod::LeastSquares);
        assert_eq!(session.request_design(&spec).unwrap().taps().len(), 129);
        assert!(matches!(session.plot(), Some(Plot::Frequency(_))));

        let mut bad = spec.clone();
        bad.band_edges = vec![200.0, 100.0];
        assert!(matches!(
            session.request_design(&bad),
            Err(Error::EdgesNotIncreasing)
        ));
        assert_eq!(session.result(), &TapResult::cleared());
        assert!(session.plot().is_none());
    }

    #[test]
    fn impulse_view() {
        let mut session = DesignSession::default();
        let mut spec = FilterSpec::new(FilterType::Bandpass, DesignMethod::LeastSquares);
        spec.order = 31;
        let taps = session.request_design(&spec).unwrap().taps().to_vec();
        session.set_view(AnalysisView::Impulse);
        match session.plot() {
            Some(Plot::Impulse(impulse)) => assert_eq!(impulse.taps, taps),
            other => panic!("unexpected plot {other:?}"),
        }
    }
}
