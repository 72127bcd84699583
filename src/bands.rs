use crate::error::{Error, Result};

/// Band.
///
/// A band is a closed subinterval of [0.0, 0.5], in cycles/sample, in which a
/// design method approximates a desired gain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Band {
    begin: f64,
    end: f64,
}

impl Band {
    /// Creates a new band.
    ///
    /// The band is the closed interval `[begin, end]`.
    pub fn new(begin: f64, end: f64) -> Result<Band> {
        if !begin.is_finite() || !end.is_finite() {
            return Err(Error::BandLimitsOutOfBounds);
        }
        if begin > end {
            return Err(Error::BandLimitsWrongOrder);
        }
        if begin < 0.0 || end > 0.5 {
            return Err(Error::BandLimitsOutOfBounds);
        }
        Ok(Band { begin, end })
    }

    /// Returns the beginning of the band.
    pub fn begin(&self) -> f64 {
        self.begin
    }

    /// Returns the end of the band.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Returns the length of the band.
    pub fn len(&self) -> f64 {
        self.end - self.begin
    }

    /// Returns true if the band contains a certain frequency.
    pub fn contains(&self, freq: f64) -> bool {
        (self.begin..=self.end).contains(&freq)
    }

    /// Returns true if the two bands overlap.
    pub fn overlaps(&self, other: &Band) -> bool {
        self.end > other.begin && other.end > self.begin
    }

    /// Returns the distance between a frequency and the band.
    ///
    /// The distance is zero if the band contains the frequency, and the
    /// distance to the closest endpoint of the band otherwise.
    pub fn distance(&self, freq: f64) -> f64 {
        if self.contains(freq) {
            0.0
        } else {
            (freq - self.begin).abs().min((freq - self.end).abs())
        }
    }
}

// Check that the bands are correctly defined
pub(crate) fn check_bands(bands: &[Band]) -> Result<()> {
    if bands.is_empty() {
        return Err(Error::BandsEmpty);
    }
    for (j, band1) in bands.iter().enumerate() {
        for band2 in bands.iter().skip(j + 1) {
            if band1.overlaps(band2) {
                return Err(Error::BandsOverlap);
            }
        }
    }
    Ok(())
}

// Sort bands in increasing order
pub(crate) fn sort_bands<T: Copy>(bands: &[T], key: impl Fn(&T) -> Band) -> Vec<T> {
    let mut bands = bands.to_vec();
    bands.sort_unstable_by(|a, b| key(a).begin().total_cmp(&key(b).begin()));
    bands
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn band_limits() {
        assert!(matches!(
            Band::new(0.3, 0.2),
            Err(Error::BandLimitsWrongOrder)
        ));
        assert!(matches!(
            Band::new(0.1, 0.6),
            Err(Error::BandLimitsOutOfBounds)
        ));
        assert!(matches!(
            Band::new(f64::NAN, 0.2),
            Err(Error::BandLimitsOutOfBounds)
        ));
        let band = Band::new(0.1, 0.2).unwrap();
        assert_eq!(band.distance(0.15), 0.0);
        assert!((band.distance(0.3) - 0.1).abs() < 1e-12);
        assert!((band.distance(0.05) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn overlapping_bands() {
        let a = Band::new(0.0, 0.2).unwrap();
        let b = Band::new(0.1, 0.3).unwrap();
        let c = Band::new(0.2, 0.5).unwrap();
        assert!(matches!(check_bands(&[a, b]), Err(Error::BandsOverlap)));
        assert!(check_bands(&[a, c]).is_ok());
        assert!(matches!(check_bands(&[]), Err(Error::BandsEmpty)));
    }

    #[test]
    fn sorting() {
        let a = Band::new(0.3, 0.5).unwrap();
        let b = Band::new(0.0, 0.1).unwrap();
        assert_eq!(sort_bands(&[a, b], |&x| x), [b, a]);
    }
}
