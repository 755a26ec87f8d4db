//! Trend-model forecasting over aggregated period series.
//!
//! Fits the regression families to the ticket-count series, selects the best
//! one by R², and projects future periods with prediction intervals. Revenue
//! always uses the detailed linear fit. The smoothing ensemble in
//! [`smoothing`] runs independently of this path.

pub mod smoothing;

use log::debug;
use serde::Serialize;

pub use smoothing::{
    arima_011, ensemble_forecast, holt_smoothing, simple_exponential, EnsemblePoint,
    SmoothingParams,
};

use crate::aggregate::PeriodMetric;
use crate::period::Granularity;
use crate::regression::{
    fit_linear_detailed, select_best_fit, LinearRegressionResult, TrendModel,
};
use crate::stats::descriptive::population_std_dev;

/// Forecast for one future period.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    /// Display label of the future period.
    pub period: String,
    /// Rounded, non-negative ticket-count prediction.
    pub predicted_tickets: f64,
    pub tickets_lower: f64,
    pub tickets_upper: f64,
    /// Non-negative revenue prediction.
    pub predicted_revenue: f64,
    pub revenue_lower: f64,
    pub revenue_upper: f64,
}

/// Result of the model-selection forecaster.
#[derive(Debug, Clone, Serialize)]
pub struct TrendForecast {
    /// Family selected for the ticket-count series.
    pub ticket_model: TrendModel,
    /// Detailed linear fit always used for revenue.
    pub revenue_model: LinearRegressionResult,
    /// One entry per requested future period; empty when the history has
    /// fewer than three points.
    pub points: Vec<ForecastPoint>,
}

/// Forecast `periods_ahead` future periods from a chronologically sorted
/// series.
///
/// Ticket counts are fitted with all three regression families (highest R²
/// wins, ties keep the earlier family); revenue always uses the detailed
/// linear fit. A linear count winner gets the full prediction-interval
/// formula; quadratic and logarithmic winners fall back to ± one population
/// standard deviation of the observed counts.
pub fn forecast_periods(
    series: &[PeriodMetric],
    granularity: Granularity,
    periods_ahead: usize,
) -> TrendForecast {
    let n = series.len();
    if n < 3 {
        debug!("forecast skipped: {n} periods of history, need 3");
        return TrendForecast {
            ticket_model: TrendModel::Linear {
                slope: 0.0,
                intercept: 0.0,
                r_squared: 0.0,
            },
            revenue_model: fit_linear_detailed(&[], &[]),
            points: Vec::new(),
        };
    }

    let x: Vec<f64> = (1..=n).map(|i| i as f64).collect();
    let counts: Vec<f64> = series.iter().map(|m| m.ticket_count as f64).collect();
    let revenues: Vec<f64> = series.iter().map(|m| m.total_revenue).collect();

    let ticket_model = select_best_fit(&x, &counts);
    let count_detailed = fit_linear_detailed(&x, &counts);
    let revenue_model = fit_linear_detailed(&x, &revenues);
    let counts_std = population_std_dev(&counts);

    debug!(
        "selected {} model for ticket counts (r² = {:.4}); revenue r² = {:.4}",
        ticket_model.name(),
        ticket_model.r_squared(),
        revenue_model.r_squared
    );

    let mut points = Vec::with_capacity(periods_ahead);
    let mut date = series[n - 1].period_start;

    for step in 1..=periods_ahead {
        let x_future = (n + step) as f64;
        date = granularity.advance(date);

        let (count_prediction, count_half_width) = match ticket_model {
            TrendModel::Linear { .. } => (
                count_detailed.predict(x_future),
                count_detailed.prediction_interval_half_width(x_future),
            ),
            // Coarser interval for the nonlinear families: ± one population
            // standard deviation of the observed counts.
            _ => (ticket_model.predict(x_future), counts_std),
        };

        let revenue_prediction = revenue_model.predict(x_future);
        let revenue_half_width = revenue_model.prediction_interval_half_width(x_future);

        points.push(ForecastPoint {
            period: granularity.bucket_label(date),
            predicted_tickets: count_prediction.round().max(0.0),
            tickets_lower: (count_prediction - count_half_width).max(0.0),
            tickets_upper: (count_prediction + count_half_width).max(0.0),
            predicted_revenue: revenue_prediction.max(0.0),
            revenue_lower: (revenue_prediction - revenue_half_width).max(0.0),
            revenue_upper: (revenue_prediction + revenue_half_width).max(0.0),
        });
    }

    TrendForecast {
        ticket_model,
        revenue_model,
        points,
    }
}
