//! Ordinary least squares.
//!
//! The forecaster fits a single-feature line `y = a*x + b`. The design matrix is
//! built with an intercept column and solved through SVD, which also handles
//! tall systems (more observations than parameters).
//!
//! Month indices are large (`year * 12 + month`), so the feature is centered on
//! its first value before solving and the intercept is shifted back afterwards.
//! This keeps the system well conditioned without changing the fitted line.

use nalgebra::{DMatrix, DVector};

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = a*x + b` by ordinary least squares.
///
/// Needs at least two points with distinct `x`; returns `None` otherwise.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LineFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let origin = xs[0];
    if xs.iter().all(|&x| (x - origin).abs() < f64::EPSILON) {
        return None;
    }

    let n = xs.len();
    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, &x) in xs.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x - origin;
    }
    let y = DVector::from_column_slice(ys);

    let beta = solve_least_squares(&design, &y)?;
    let slope = beta[1];
    let intercept = beta[0] - slope * origin;

    Some(LineFit { slope, intercept })
}
