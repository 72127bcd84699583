use crate::error::Error;
use faer::linalg::solvers::EvdError;
use faer_ext::IntoFaer;
use ndarray::Array2;
use num_complex::Complex64;

/// Eigenvalue backend.
///
/// The Remez exchange finds the local extrema of the weighted error as the
/// real eigenvalues of a colleague matrix. This trait models the solver used
/// for that step, so that it can be replaced (for instance by a LAPACK based
/// one) without touching the exchange itself.
pub trait EigenvalueBackend {
    /// Computes the eigenvalues of a real square matrix.
    ///
    /// An error is returned if the eigenvalues cannot be computed.
    ///
    /// # Panics
    ///
    /// This function is allowed to panic if `matrix` is not a square matrix.
    fn eigenvalues(&self, matrix: Array2<f64>) -> Result<Vec<Complex64>, EigenvaluesError>;
}

/// Eigenvalue calculation error.
///
/// The error contains a descriptive string of the problem.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct EigenvaluesError(pub String);

impl From<EigenvaluesError> for Error {
    fn from(value: EigenvaluesError) -> Error {
        Error::EigenvaluesError(value.0)
    }
}

/// faer eigenvalue backend.
///
/// This is the default backend. It uses the pure Rust [`faer`] crate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FaerBackend {}

impl EigenvalueBackend for FaerBackend {
    fn eigenvalues(&self, matrix: Array2<f64>) -> Result<Vec<Complex64>, EigenvaluesError> {
        let matrix = matrix.view().into_faer();
        Ok(matrix.eigenvalues()?)
    }
}

impl From<EvdError> for EigenvaluesError {
    fn from(value: EvdError) -> EigenvaluesError {
        match value {
            EvdError::NoConvergence => EigenvaluesError("no convergence".to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn faer_eigenvalues() {
        let matrix = array![[2.0, 0.0], [0.0, -3.0]];
        let mut eig = FaerBackend::default().eigenvalues(matrix).unwrap();
        eig.sort_by(|a, b| a.re.total_cmp(&b.re));
        assert!((eig[0].re + 3.0).abs() < 1e-12);
        assert!((eig[1].re - 2.0).abs() < 1e-12);
        assert!(eig.iter().all(|z| z.im.abs() < 1e-12));
    }
}
