//! Least-squares linear phase FIR design.
//!
//! [`firls`] designs the odd length, even symmetric filter that minimizes the
//! integral of the weighted squared error between its amplitude response and
//! a piecewise linear desired response defined on a list of bands.
//!
//! Writing the amplitude response as `A(f) = sum_{k=0}^{M} a_k cos(k pi f)`
//! (`f` normalized to the Nyquist frequency), the minimization leads to the
//! normal equations `Q a = b`, where `Q` is the sum of a Toeplitz and a Hankel
//! matrix. Both `Q` and `b` are computed in closed form from integrals of
//! cosines over the bands, so no frequency grid is involved.

use crate::{
    error::{Error, Result},
    filter::MAX_LEAST_SQUARES_ORDER,
    tables::BreakpointTable,
};
use faer::{Col, Mat, Side, linalg::solvers::Solve};
use std::f64::consts::PI;

/// Least-squares FIR design.
///
/// Designs a filter with `num_taps` taps from a [`BreakpointTable`]. The
/// number of taps must be odd. The desired response is linear between the two
/// breakpoints of each band, and the squared error in each band is weighted by
/// the weight of the band. At most [`MAX_LEAST_SQUARES_ORDER`] taps are
/// accepted.
pub fn firls(num_taps: usize, table: &BreakpointTable) -> Result<Vec<f64>> {
    if num_taps > MAX_LEAST_SQUARES_ORDER {
        return Err(Error::InvalidOrder(num_taps));
    }
    if num_taps % 2 == 0 {
        return Err(Error::EvenLengthLeastSquares(num_taps));
    }
    let nyquist = 0.5 * table.sampling_rate;
    if !(nyquist.is_finite() && nyquist > 0.0) {
        return Err(Error::InvalidSamplingRate(table.sampling_rate));
    }
    let bands = normalized_bands(table, nyquist)?;
    let m = (num_taps - 1) / 2;

    // q_k = sum over bands of w * (f2 sinc(k f2) - f1 sinc(k f1))
    let q: Vec<f64> = (0..num_taps)
        .map(|k| {
            let k = k as f64;
            bands
                .iter()
                .map(|b| b.weight * (b.f2 * sinc(k * b.f2) - b.f1 * sinc(k * b.f1)))
                .sum()
        })
        .collect();
    let q_matrix = Mat::from_fn(m + 1, m + 1, |i, j| q[i.abs_diff(j)] + q[i + j]);

    // b_k = sum over bands of w * integral of D(f) cos(k pi f), with D linear
    let b = Col::from_fn(m + 1, |k| {
        bands
            .iter()
            .map(|band| band.weight * (band.integral(k, band.f2) - band.integral(k, band.f1)))
            .sum::<f64>()
    });

    let a: Vec<f64> = match q_matrix.llt(Side::Lower) {
        Ok(llt) => llt.solve(&b).iter().copied().collect(),
        Err(err) => {
            tracing::warn!(?err, num_taps, "cholesky failed, solving with LU");
            q_matrix.partial_piv_lu().solve(&b).iter().copied().collect()
        }
    };
    if a.iter().any(|x| !x.is_finite()) {
        return Err(Error::SingularSystem);
    }

    let mut taps = Vec::with_capacity(num_taps);
    taps.extend(a[1..].iter().rev());
    taps.push(2.0 * a[0]);
    taps.extend(a[1..].iter());
    tracing::debug!(num_taps, bands = bands.len(), "least-squares design");
    Ok(taps)
}

// Band normalized to the Nyquist frequency, with the slope and intercept of
// its desired response.
struct LinearBand {
    f1: f64,
    f2: f64,
    slope: f64,
    intercept: f64,
    weight: f64,
}

impl LinearBand {
    // Antiderivative evaluated at f of
    //   D(f) cos(k pi f)  (k > 0),  D(f)  (k = 0),
    // up to the factor used by the normal equations, written through sinc.
    fn integral(&self, k: usize, f: f64) -> f64 {
        let value = f * (self.slope * f + self.intercept) * sinc(k as f64 * f);
        if k == 0 {
            value - 0.5 * self.slope * f * f
        } else {
            let kpi = k as f64 * PI;
            value + self.slope * (kpi * f).cos() / (kpi * kpi)
        }
    }
}

fn normalized_bands(table: &BreakpointTable, nyquist: f64) -> Result<Vec<LinearBand>> {
    if table.freqs.is_empty() || table.freqs.len() % 2 != 0 {
        return Err(Error::BandsEmpty);
    }
    if table.freqs.len() != table.gains.len() || table.freqs.len() != 2 * table.weights.len() {
        return Err(Error::BandsEmpty);
    }
    table
        .freqs
        .chunks_exact(2)
        .zip(table.gains.chunks_exact(2))
        .zip(table.weights.iter())
        .map(|((freqs, gains), &weight)| {
            let f1 = freqs[0] / nyquist;
            let f2 = freqs[1] / nyquist;
            if !(0.0..=1.0).contains(&f1) || !(0.0..=1.0).contains(&f2) {
                return Err(Error::BandLimitsOutOfBounds);
            }
            if f1 >= f2 {
                return Err(Error::BandLimitsWrongOrder);
            }
            if !(weight.is_finite() && weight > 0.0) {
                return Err(Error::InvalidWeight(weight));
            }
            let slope = (gains[1] - gains[0]) / (f2 - f1);
            Ok(LinearBand {
                f1,
                f2,
                slope,
                intercept: gains[0] - f1 * slope,
                weight,
            })
        })
        .collect()
}

// Normalized sinc, sin(pi x) / (pi x)
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let y = PI * x;
        y.sin() / y
    }
}
