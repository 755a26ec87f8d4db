// Statistics module
//
// Descriptive helpers, distribution approximations, and the correlation
// significance test used by dashboard consumers.

pub mod descriptive;
pub mod inference;

use serde::Serialize;

pub use descriptive::{mean, pearson, population_std_dev, population_variance};
pub use inference::{incomplete_beta, ln_gamma, normal_cdf, student_t_pvalue};

/// z critical value for a 95% interval.
const Z_95: f64 = 1.96;

/// Pearson correlation with significance and a 95% confidence interval.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationResult {
    /// Correlation coefficient in [-1, 1].
    pub coefficient: f64,
    /// Two-tailed p-value from the t-distribution transform.
    pub p_value: f64,
    /// Lower bound of the 95% confidence interval (Fisher z-transform).
    pub ci_lower: f64,
    /// Upper bound of the 95% confidence interval.
    pub ci_upper: f64,
}

/// Correlation between two equal-length numeric vectors.
///
/// Significance comes from t = r·sqrt((n−2)/(1−r²)) with n−2 degrees of
/// freedom; the confidence interval from the Fisher z-transform,
/// z = atanh r ± 1.96/sqrt(n−3). Fewer than four points collapse the
/// interval to the point estimate; degenerate vectors yield the neutral
/// result (r = 0, p = 1).
///
/// # Example
/// ```
/// use shoplytics::stats;
///
/// let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = vec![2.0, 4.0, 6.1, 7.9, 10.0];
/// let result = stats::correlation_test(&x, &y);
/// assert!(result.coefficient > 0.99);
/// assert!(result.p_value < 0.05);
/// ```
pub fn correlation_test(x: &[f64], y: &[f64]) -> CorrelationResult {
    let r = pearson(x, y);
    let n = x.len();

    let p_value = if n < 3 {
        1.0
    } else {
        let denominator = 1.0 - r * r;
        let t = if denominator < f64::EPSILON {
            f64::INFINITY
        } else {
            r * ((n - 2) as f64 / denominator).sqrt()
        };
        student_t_pvalue(t, n - 2)
    };

    let (ci_lower, ci_upper) = if n > 3 && r.abs() < 1.0 {
        let z = r.atanh();
        let half_width = Z_95 / ((n - 3) as f64).sqrt();
        ((z - half_width).tanh(), (z + half_width).tanh())
    } else {
        (r, r)
    };

    CorrelationResult {
        coefficient: r,
        p_value,
        ci_lower,
        ci_upper,
    }
}
