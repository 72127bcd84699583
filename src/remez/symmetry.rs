// Reduction of even symmetric filters to the odd length case. See Fig. 2 in
// McClellan, Parks and Rabiner (1973).
//
// An odd length filter (type I) has H(f) = sum_k a_k cos(k f). An even length
// filter (type II) has H(f) = cos(f/2) sum_k b_k cos(k f), so the desired
// response is divided by cos(f/2) and the weight multiplied by it.

use super::scalar::Scalar;
use crate::{
    bands::Band,
    error::{InvalidResponse, Result},
    tables::BandResponse,
};

const NYQUIST: f64 = 0.5;

// Check that the desired response is realizable.
//
// Must be called before adjust_bands, while the bands are still in
// cycles/sample and sorted.
pub fn check_response(bands: &[BandResponse], odd_length: bool) -> Result<()> {
    if odd_length {
        return Ok(());
    }
    // f = 0.5 is a zero of type II filters
    match bands.last() {
        Some(last) if last.band.end() == NYQUIST && last.gain != 0.0 => {
            Err(InvalidResponse::EvenLengthNyquist.into())
        }
        _ => Ok(()),
    }
}

// Adjust band edges to avoid the singularity at f = 0.5 of type II filters.
pub fn adjust_bands(bands: &mut Vec<BandResponse>, odd_length: bool) -> Result<()> {
    if odd_length {
        return Ok(());
    }
    let replacement = NYQUIST - 1e-4;
    if let Some(last) = bands.last_mut() {
        if last.band.end() == NYQUIST {
            if last.band.begin() > replacement {
                // remove band to avoid empty band
                bands.pop();
            } else {
                last.band = Band::new(last.band.begin(), replacement)?;
            }
        }
    }
    Ok(())
}

// f in rad/sample
pub fn adjust_desired<T: Scalar>(desired: T, f: T, odd_length: bool) -> T {
    if odd_length {
        desired
    } else {
        desired / (T::from_f64_lossy(0.5) * f).cos()
    }
}

// f in rad/sample
pub fn adjust_weight<T: Scalar>(weight: T, f: T, odd_length: bool) -> T {
    if odd_length {
        weight
    } else {
        weight * (T::from_f64_lossy(0.5) * f).cos()
    }
}

// Impulse response from the coefficients a_k of
//
// H(f) = sum_k a_k cos(k f)
//
// See equations (3) - (12) in McClellan, Parks and Rabiner (1973).
pub fn h_from_ak<T: Scalar>(ak: &[T], num_taps: usize) -> Vec<T> {
    let half = T::from_f64_lossy(0.5);
    let quarter = T::from_f64_lossy(0.25);
    let mut h = Vec::with_capacity(num_taps);
    if num_taps % 2 != 0 {
        h.extend(ak[1..].iter().rev().map(|&a| half * a));
        h.push(ak[0]);
        h.extend(ak[1..].iter().map(|&a| half * a));
    } else {
        let last = ak[ak.len() - 1];
        let inner: Vec<T> = ak[1..]
            .windows(2)
            .map(|w| quarter * (w[0] + w[1]))
            .collect();
        let center = half * ak[0] + quarter * ak[1];
        h.push(quarter * last);
        h.extend(inner.iter().rev());
        h.push(center);
        h.push(center);
        h.extend(inner.iter());
        h.push(quarter * last);
    }
    debug_assert_eq!(h.len(), num_taps);
    h
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    fn band(begin: f64, end: f64, gain: f64) -> BandResponse {
        BandResponse {
            band: Band::new(begin, end).unwrap(),
            gain,
            weight: 1.0,
        }
    }

    #[test]
    fn nyquist_passband() {
        let highpass = [band(0.0, 0.1, 0.0), band(0.2, 0.5, 1.0)];
        assert!(check_response(&highpass, true).is_ok());
        assert!(matches!(
            check_response(&highpass, false),
            Err(Error::InvalidResponse(InvalidResponse::EvenLengthNyquist))
        ));
        let lowpass = [band(0.0, 0.1, 1.0), band(0.2, 0.5, 0.0)];
        assert!(check_response(&lowpass, false).is_ok());
    }

    #[test]
    fn nyquist_avoided() {
        let mut bands = vec![band(0.0, 0.1, 1.0), band(0.2, 0.5, 0.0)];
        adjust_bands(&mut bands, false).unwrap();
        assert!(bands[1].band.end() < 0.5);
        let mut bands = vec![band(0.0, 0.1, 1.0), band(0.49995, 0.5, 0.0)];
        adjust_bands(&mut bands, false).unwrap();
        assert_eq!(bands.len(), 1);
    }

    #[test]
    fn taps_are_symmetric() {
        let ak: [f64; 4] = [0.5, 0.3, -0.1, 0.05];
        for num_taps in [7, 8] {
            let h = h_from_ak(&ak, num_taps);
            assert_eq!(h.len(), num_taps);
            for (a, b) in h.iter().zip(h.iter().rev()) {
                assert_eq!(a, b);
            }
        }
        // H(0) = sum_k a_k
        let h = h_from_ak(&ak, 7);
        let dc: f64 = h.iter().sum();
        assert!((dc - ak.iter().sum::<f64>()).abs() < 1e-12);
    }
}
