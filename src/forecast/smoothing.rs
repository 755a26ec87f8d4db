//! Exponential-smoothing and ARIMA-style forecasts over the count series.
//!
//! Three lightweight recursions (simple exponential smoothing, Holt's linear
//! trend, a simplified ARIMA(0,1,1)) plus their ensemble average. This path
//! is independent of the regression forecaster and never fails: short input
//! skips the methods that need more history.

use serde::{Deserialize, Serialize};

/// Smoothing constants for the ensemble forecaster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Level smoothing constant (simple and Holt).
    pub alpha: f64,
    /// Trend smoothing constant (Holt).
    pub beta: f64,
    /// Moving-average weight for the ARIMA(0,1,1) recursion.
    pub theta: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        SmoothingParams {
            alpha: 0.3,
            beta: 0.3,
            theta: 0.3,
        }
    }
}

/// One future step of the ensemble forecast.
///
/// `holt` is None when the history is too short (fewer than two points) for
/// a trend estimate; the ensemble then averages the remaining methods.
#[derive(Debug, Clone, Serialize)]
pub struct EnsemblePoint {
    /// 1-based offset from the last observed period.
    pub step: usize,
    pub simple: f64,
    pub holt: Option<f64>,
    pub arima: f64,
    pub ensemble: f64,
}

/// Simple exponential smoothing: S₁ = y₁, Sᵢ = α·yᵢ + (1−α)·Sᵢ₋₁.
pub fn simple_exponential(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut smoothed = Vec::with_capacity(values.len());
    for &value in values {
        let next = match smoothed.last() {
            Some(&prev) => alpha * value + (1.0 - alpha) * prev,
            None => value,
        };
        smoothed.push(next);
    }
    smoothed
}

/// Holt double exponential smoothing.
///
/// Returns the (level, trend) series; both empty when fewer than two points
/// are supplied.
pub fn holt_smoothing(values: &[f64], alpha: f64, beta: f64) -> (Vec<f64>, Vec<f64>) {
    if values.len() < 2 {
        return (Vec::new(), Vec::new());
    }

    let mut levels = Vec::with_capacity(values.len());
    let mut trends = Vec::with_capacity(values.len());
    levels.push(values[0]);
    trends.push(values[1] - values[0]);

    for &value in &values[1..] {
        let prev_level = levels[levels.len() - 1];
        let prev_trend = trends[trends.len() - 1];
        let level = alpha * value + (1.0 - alpha) * (prev_level + prev_trend);
        let trend = beta * (level - prev_level) + (1.0 - beta) * prev_trend;
        levels.push(level);
        trends.push(trend);
    }

    (levels, trends)
}

/// Simplified ARIMA(0,1,1) one-step-ahead fitted values.
///
/// fitted₁ = y₁; thereafter prediction = previous fitted + θ·previous error,
/// error = y − prediction.
pub fn arima_011(values: &[f64], theta: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut fitted = Vec::with_capacity(values.len());
    fitted.push(values[0]);
    let mut prev_error = 0.0;

    for &value in &values[1..] {
        let prediction = fitted[fitted.len() - 1] + theta * prev_error;
        prev_error = value - prediction;
        fitted.push(prediction);
    }

    fitted
}

/// Ensemble forecast over `periods_ahead` future steps.
///
/// Per step h: simple = last smoothed value, holt = level + h·trend, arima =
/// last fitted value; the ensemble averages whichever methods are present.
/// All reported values are floored at 0 and rounded.
pub fn ensemble_forecast(
    values: &[f64],
    periods_ahead: usize,
    params: &SmoothingParams,
) -> Vec<EnsemblePoint> {
    if values.is_empty() || periods_ahead == 0 {
        return Vec::new();
    }

    let smoothed = simple_exponential(values, params.alpha);
    let (levels, trends) = holt_smoothing(values, params.alpha, params.beta);
    let fitted = arima_011(values, params.theta);

    let last_smoothed = smoothed[smoothed.len() - 1];
    let last_fitted = fitted[fitted.len() - 1];
    let holt_state = match (levels.last(), trends.last()) {
        (Some(&level), Some(&trend)) => Some((level, trend)),
        _ => None,
    };

    (1..=periods_ahead)
        .map(|step| {
            let holt = holt_state.map(|(level, trend)| level + step as f64 * trend);
            let mut sum = last_smoothed + last_fitted;
            let mut methods = 2.0;
            if let Some(h) = holt {
                sum += h;
                methods += 1.0;
            }
            let ensemble = sum / methods;
            EnsemblePoint {
                step,
                simple: round_non_negative(last_smoothed),
                holt: holt.map(round_non_negative),
                arima: round_non_negative(last_fitted),
                ensemble: round_non_negative(ensemble),
            }
        })
        .collect()
}

fn round_non_negative(value: f64) -> f64 {
    value.round().max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_exponential_recursion() {
        let smoothed = simple_exponential(&[10.0, 20.0, 30.0], 0.3);
        assert_eq!(smoothed.len(), 3);
        assert!((smoothed[0] - 10.0).abs() < 1e-10);
        assert!((smoothed[1] - 13.0).abs() < 1e-10);
        assert!((smoothed[2] - 18.1).abs() < 1e-10);
    }

    #[test]
    fn test_holt_tracks_linear_trend() {
        let values: Vec<f64> = (1..=20).map(|i| 2.0 * i as f64).collect();
        let (levels, trends) = holt_smoothing(&values, 0.3, 0.3);
        assert_eq!(levels.len(), 20);
        // On an exact line the trend estimate stays at the true slope
        assert!((trends[trends.len() - 1] - 2.0).abs() < 1e-6);
        assert!((levels[levels.len() - 1] - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_holt_short_input_is_empty() {
        let (levels, trends) = holt_smoothing(&[5.0], 0.3, 0.3);
        assert!(levels.is_empty());
        assert!(trends.is_empty());
    }

    #[test]
    fn test_arima_constant_series() {
        let fitted = arima_011(&[8.0; 6], 0.3);
        assert_eq!(fitted.len(), 6);
        for value in fitted {
            assert!((value - 8.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_arima_recursion_values() {
        // y = [10, 13]: fitted₂ = 10 + 0.3·0 = 10, error = 3
        // y₃ = 16: fitted₃ = 10 + 0.3·3 = 10.9
        let fitted = arima_011(&[10.0, 13.0, 16.0], 0.3);
        assert!((fitted[1] - 10.0).abs() < 1e-10);
        assert!((fitted[2] - 10.9).abs() < 1e-10);
    }

    #[test]
    fn test_ensemble_reports_all_methods() {
        let values: Vec<f64> = (1..=10).map(|i| 10.0 + i as f64).collect();
        let points = ensemble_forecast(&values, 3, &SmoothingParams::default());
        assert_eq!(points.len(), 3);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.step, i + 1);
            assert!(point.holt.is_some());
            assert!(point.simple >= 0.0);
            assert!(point.ensemble >= 0.0);
        }
        // Holt projects the trend forward, so later steps grow
        assert!(points[2].holt.unwrap() > points[0].holt.unwrap());
    }

    #[test]
    fn test_ensemble_single_point_skips_holt() {
        let points = ensemble_forecast(&[12.0], 2, &SmoothingParams::default());
        assert_eq!(points.len(), 2);
        assert!(points[0].holt.is_none());
        // Ensemble of simple and arima, both 12
        assert!((points[0].ensemble - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_ensemble_floors_negative_forecasts() {
        // Steep downward trend pushes Holt projections below zero
        let values: Vec<f64> = (0..8).map(|i| 50.0 - 10.0 * i as f64).collect();
        let points = ensemble_forecast(&values, 5, &SmoothingParams::default());
        for point in points {
            assert!(point.simple >= 0.0);
            assert!(point.arima >= 0.0);
            assert!(point.ensemble >= 0.0);
            if let Some(holt) = point.holt {
                assert!(holt >= 0.0);
            }
        }
    }

    #[test]
    fn test_ensemble_empty_input() {
        assert!(ensemble_forecast(&[], 4, &SmoothingParams::default()).is_empty());
    }
}
