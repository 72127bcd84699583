//! # FIR filter designer
//!
//! The [`fir_designer`](crate) crate designs linear phase FIR filters
//! (lowpass, highpass, bandpass and bandstop) with two methods, and analyzes
//! their frequency response.
//!
//! - **Equiripple**: the Parks-McClellan Remez exchange algorithm, which
//!   minimizes the maximum weighted error in the bands. See [`remez`].
//! - **Least squares**: minimizes the integral of the weighted squared error
//!   in the bands. See [`firls`](firls::firls).
//!
//! A filter is described by a [`FilterSpec`]: the filter type, the design
//! method, the number of taps, the sampling rate, the band edges (in Hz) and
//! the band weights. The desired gain of each band follows from the filter
//! type, as given by its [`BandLayout`]. The [`design`] function turns a
//! specification into a [`TapResult`], and [`analyze`] computes the magnitude
//! (and optionally phase) response of the taps.
//!
//! ## Examples
//!
//! ```
//! # fn main() -> Result<(), fir_designer::error::Error> {
//! use fir_designer::{analyze, design, DesignMethod, FilterSpec, FilterType};
//!
//! let mut spec = FilterSpec::new(FilterType::Lowpass, DesignMethod::EquiRipple);
//! spec.order = 129;
//! spec.sampling_rate = 1000.0;
//! spec.band_edges = vec![100.0, 200.0];
//! spec.band_weights = vec![1.0, 80.0];
//! let result = design(&spec)?;
//! assert_eq!(result.taps().len(), 129);
//!
//! let curve = analyze(result.taps(), result.sampling_rate(), 1024).unwrap();
//! assert_eq!(curve.magnitude_db.len(), 129 * 1024 / 2);
//! # Ok(())
//! # }
//! ```
//!
//! Equiripple designs are computed in `f64` first. Designs whose error is too
//! small for `f64` arithmetic, such as the one above (about 1e-13), are
//! repeated in extended precision with
//! [`num-bigfloat`](https://docs.rs/num-bigfloat/latest/num_bigfloat/). This
//! is much slower. See [`remez::Precision`] and [`DesignOptions`].
//!
//! Interactive front ends can use a [`DesignSession`], which keeps the current
//! filter, clears it when a design request fails, and produces the data for
//! the selected [`AnalysisView`].
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]. It never installs a subscriber.
//!
//! ## Features
//!
//! The `serde` feature derives `Serialize` and `Deserialize` for the data
//! model and the options.

#![warn(missing_docs)]

mod bands;
pub use bands::Band;
mod design;
pub use design::{design, design_with_options};
pub mod error;
mod filter;
pub use filter::{
    BandKind, BandLayout, DesignMethod, FilterSpec, FilterType, MAX_DENSITY_FACTOR,
    MAX_EQUIRIPPLE_ORDER, MAX_LEAST_SQUARES_ORDER, TapResult,
};
pub mod firls;
mod options;
pub use options::{AnalysisOptions, DesignOptions};
pub mod order_estimates;
pub mod remez;
mod response;
pub use response::{
    AnalysisView, ImpulseResponse, Plot, ResponseAnalyzer, ResponseCurve, analyze, to_db,
};
mod session;
pub use session::DesignSession;
mod tables;
pub use tables::{BandResponse, BreakpointTable, RemezTable, least_squares_table, remez_table};
