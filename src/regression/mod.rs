//! Regression family fitters over period-index series.
//!
//! Every fitter takes parallel x (1-based period index) and y vectors and
//! returns a [`TrendModel`] carrying its coefficients and R². Degenerate
//! input (too few points, zero x variance, singular normal equations,
//! non-positive x for the logarithmic family) yields the family's zero-fit
//! with R² = 0, never an error.

use log::warn;
use serde::Serialize;

use crate::stats::descriptive::mean;
use crate::stats::inference::student_t_pvalue;

/// Determinant threshold below which the quadratic normal equations are
/// treated as singular.
const SINGULAR_EPS: f64 = 1e-10;

/// A fitted trend model, one of three families.
///
/// New families can be added here without touching the forecaster: selection
/// and prediction dispatch through [`select_best_fit`] and
/// [`TrendModel::predict`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum TrendModel {
    Linear {
        slope: f64,
        intercept: f64,
        r_squared: f64,
    },
    Quadratic {
        a: f64,
        b: f64,
        c: f64,
        r_squared: f64,
    },
    Logarithmic {
        a: f64,
        b: f64,
        r_squared: f64,
    },
}

impl TrendModel {
    /// Predicted y at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        match *self {
            TrendModel::Linear { slope, intercept, .. } => slope * x + intercept,
            TrendModel::Quadratic { a, b, c, .. } => a * x * x + b * x + c,
            TrendModel::Logarithmic { a, b, .. } => {
                if x > 0.0 {
                    a * x.ln() + b
                } else {
                    b
                }
            }
        }
    }

    /// Coefficient of determination for the fit.
    pub fn r_squared(&self) -> f64 {
        match *self {
            TrendModel::Linear { r_squared, .. }
            | TrendModel::Quadratic { r_squared, .. }
            | TrendModel::Logarithmic { r_squared, .. } => r_squared,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrendModel::Linear { .. } => "linear",
            TrendModel::Quadratic { .. } => "quadratic",
            TrendModel::Logarithmic { .. } => "logarithmic",
        }
    }
}

/// Ordinary least squares linear fit. Zero-fit below two points.
pub fn fit_linear(x: &[f64], y: &[f64]) -> TrendModel {
    let zero = TrendModel::Linear {
        slope: 0.0,
        intercept: 0.0,
        r_squared: 0.0,
    };
    let Some((slope, intercept)) = linear_coefficients(x, y) else {
        return zero;
    };
    let predictions: Vec<f64> = x.iter().map(|&xi| slope * xi + intercept).collect();
    TrendModel::Linear {
        slope,
        intercept,
        r_squared: r_squared_of(y, &predictions),
    }
}

/// Quadratic fit y = ax² + bx + c via Cramer's rule on the 3×3 normal
/// equations. Zero-fit below three points or when the system is singular.
pub fn fit_quadratic(x: &[f64], y: &[f64]) -> TrendModel {
    let zero = TrendModel::Quadratic {
        a: 0.0,
        b: 0.0,
        c: 0.0,
        r_squared: 0.0,
    };
    if x.len() != y.len() || x.len() < 3 {
        return zero;
    }

    let n = x.len() as f64;
    let s1: f64 = x.iter().sum();
    let s2: f64 = x.iter().map(|&v| v * v).sum();
    let s3: f64 = x.iter().map(|&v| v * v * v).sum();
    let s4: f64 = x.iter().map(|&v| v * v * v * v).sum();
    let t0: f64 = y.iter().sum();
    let t1: f64 = x.iter().zip(y.iter()).map(|(&xi, &yi)| xi * yi).sum();
    let t2: f64 = x.iter().zip(y.iter()).map(|(&xi, &yi)| xi * xi * yi).sum();

    // Normal equations:
    // | s4 s3 s2 | |a|   |t2|
    // | s3 s2 s1 | |b| = |t1|
    // | s2 s1 n  | |c|   |t0|
    let det = s4 * (s2 * n - s1 * s1) - s3 * (s3 * n - s1 * s2) + s2 * (s3 * s1 - s2 * s2);
    if det.abs() < SINGULAR_EPS {
        warn!("quadratic normal equations singular (det = {det:e}); returning zero fit");
        return zero;
    }

    let det_a = t2 * (s2 * n - s1 * s1) - s3 * (t1 * n - s1 * t0) + s2 * (t1 * s1 - s2 * t0);
    let det_b = s4 * (t1 * n - s1 * t0) - t2 * (s3 * n - s1 * s2) + s2 * (s3 * t0 - t1 * s2);
    let det_c = s4 * (s2 * t0 - t1 * s1) - s3 * (s3 * t0 - t1 * s2) + t2 * (s3 * s1 - s2 * s2);

    let a = det_a / det;
    let b = det_b / det;
    let c = det_c / det;

    let predictions: Vec<f64> = x.iter().map(|&xi| a * xi * xi + b * xi + c).collect();
    TrendModel::Quadratic {
        a,
        b,
        c,
        r_squared: r_squared_of(y, &predictions),
    }
}

/// Logarithmic fit y = a·ln(x) + b. Requires every x > 0; otherwise the
/// zero-fit. Delegates to the linear fitter over transformed x.
pub fn fit_logarithmic(x: &[f64], y: &[f64]) -> TrendModel {
    let zero = TrendModel::Logarithmic {
        a: 0.0,
        b: 0.0,
        r_squared: 0.0,
    };
    if x.iter().any(|&v| v <= 0.0) {
        return zero;
    }
    let ln_x: Vec<f64> = x.iter().map(|&v| v.ln()).collect();
    let Some((a, b)) = linear_coefficients(&ln_x, y) else {
        return zero;
    };
    let predictions: Vec<f64> = ln_x.iter().map(|&v| a * v + b).collect();
    TrendModel::Logarithmic {
        a,
        b,
        r_squared: r_squared_of(y, &predictions),
    }
}

/// Fit all three families and return the one with the highest R².
///
/// Exact ties keep the earlier family (linear, then quadratic, then
/// logarithmic).
pub fn select_best_fit(x: &[f64], y: &[f64]) -> TrendModel {
    let candidates = [fit_linear(x, y), fit_quadratic(x, y), fit_logarithmic(x, y)];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.r_squared() > best.r_squared() {
            best = *candidate;
        }
    }
    best
}

/// Linear fit with inference diagnostics and prediction-interval inputs.
///
/// The 95% intervals use a simplified critical value (1.96 when df > 30,
/// otherwise 2.0) rather than an exact t-table lookup.
#[derive(Debug, Clone, Serialize)]
pub struct LinearRegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub slope_std_error: f64,
    pub intercept_std_error: f64,
    pub slope_p_value: f64,
    pub intercept_p_value: f64,
    pub slope_ci: (f64, f64),
    pub intercept_ci: (f64, f64),
    pub mean_x: f64,
    /// Σ(x − mean_x)².
    pub sxx: f64,
    /// Residual mean square, SSres/(n−2).
    pub mse: f64,
    /// Critical value used for the confidence and prediction intervals.
    pub t_critical: f64,
    pub n: usize,
}

impl LinearRegressionResult {
    /// Neutral result for degenerate input: zero coefficients, p = 1.
    fn neutral(n: usize) -> Self {
        LinearRegressionResult {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
            slope_std_error: 0.0,
            intercept_std_error: 0.0,
            slope_p_value: 1.0,
            intercept_p_value: 1.0,
            slope_ci: (0.0, 0.0),
            intercept_ci: (0.0, 0.0),
            mean_x: 0.0,
            sxx: 0.0,
            mse: 0.0,
            t_critical: 2.0,
            n,
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Half-width of the 95% prediction interval at `x`:
    /// t_crit · sqrt(MSE · (1 + 1/n + (x − mean_x)²/Sxx)).
    ///
    /// Degenerate fits (Sxx = 0 or n = 0) yield 0, collapsing the interval
    /// onto the point prediction.
    pub fn prediction_interval_half_width(&self, x: f64) -> f64 {
        if self.n == 0 || self.sxx <= 0.0 || self.mse < 0.0 {
            return 0.0;
        }
        let n = self.n as f64;
        let spread = (x - self.mean_x).powi(2) / self.sxx;
        self.t_critical * (self.mse * (1.0 + 1.0 / n + spread)).sqrt()
    }
}

/// Linear OLS fit with standard errors, t-test p-values (df = n−2), and 95%
/// confidence intervals. Requires at least three points; otherwise the
/// neutral result.
pub fn fit_linear_detailed(x: &[f64], y: &[f64]) -> LinearRegressionResult {
    if x.len() != y.len() || x.len() < 3 {
        return LinearRegressionResult::neutral(x.len());
    }
    let Some((slope, intercept)) = linear_coefficients(x, y) else {
        return LinearRegressionResult::neutral(x.len());
    };

    let n = x.len();
    let n_f = n as f64;
    let df = n - 2;
    let mean_x = mean(x);

    let sxx: f64 = x.iter().map(|&xi| (xi - mean_x).powi(2)).sum();
    if sxx < f64::EPSILON {
        return LinearRegressionResult::neutral(n);
    }

    let predictions: Vec<f64> = x.iter().map(|&xi| slope * xi + intercept).collect();
    let ss_res: f64 = y
        .iter()
        .zip(predictions.iter())
        .map(|(&yi, &pi)| (yi - pi).powi(2))
        .sum();
    let mse = ss_res / df as f64;

    let slope_std_error = (mse / sxx).sqrt();
    let intercept_std_error = (mse * (1.0 / n_f + mean_x * mean_x / sxx)).sqrt();

    let slope_p_value = coefficient_p_value(slope, slope_std_error, df);
    let intercept_p_value = coefficient_p_value(intercept, intercept_std_error, df);

    let t_critical = if df > 30 { 1.96 } else { 2.0 };
    let slope_ci = (
        slope - t_critical * slope_std_error,
        slope + t_critical * slope_std_error,
    );
    let intercept_ci = (
        intercept - t_critical * intercept_std_error,
        intercept + t_critical * intercept_std_error,
    );

    LinearRegressionResult {
        slope,
        intercept,
        r_squared: r_squared_of(y, &predictions),
        slope_std_error,
        intercept_std_error,
        slope_p_value,
        intercept_p_value,
        slope_ci,
        intercept_ci,
        mean_x,
        sxx,
        mse,
        t_critical,
        n,
    }
}

/// Two-tailed p-value for a single OLS coefficient.
///
/// A zero standard error comes from an exact fit: the p-value is then 0 for
/// a nonzero coefficient and 1 for a zero one.
fn coefficient_p_value(coefficient: f64, std_error: f64, df: usize) -> f64 {
    if std_error < f64::EPSILON {
        return if coefficient.abs() < f64::EPSILON { 1.0 } else { 0.0 };
    }
    student_t_pvalue(coefficient / std_error, df)
}

/// Closed-form OLS slope and intercept; None when the input is degenerate.
fn linear_coefficients(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xx: f64 = x.iter().map(|&v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(&xi, &yi)| xi * yi).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < SINGULAR_EPS {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some((slope, intercept))
}

/// R² = 1 − SSres/SStot; 0 when the series has no variance. Can be negative
/// for fits worse than the mean.
fn r_squared_of(y: &[f64], predictions: &[f64]) -> f64 {
    let mean_y = mean(y);
    let ss_tot: f64 = y.iter().map(|&v| (v - mean_y).powi(2)).sum();
    if ss_tot < f64::EPSILON {
        return 0.0;
    }
    let ss_res: f64 = y
        .iter()
        .zip(predictions.iter())
        .map(|(&yi, &pi)| (yi - pi).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}
