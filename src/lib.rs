//! Shoplytics: period aggregation and forecasting for repair-ticket data.
//!
//! The engine turns a raw stream of time-stamped ticket records into
//! period-aggregated metrics, fitted trend models, multi-method forecasts,
//! and significance assessments:
//!
//! - calendar bucketing at daily through yearly granularity ([`period`])
//! - single-pass aggregation with distinct-customer tracking ([`aggregate`])
//! - regression family fitting and selection ([`regression`])
//! - point forecasts with prediction intervals ([`forecast`])
//! - an independent smoothing/ARIMA ensemble ([`forecast::smoothing`])
//! - period-over-period growth significance ([`growth`])
//! - correlation with confidence intervals ([`stats`])
//!
//! Everything is a deterministic, side-effect-free transformation over
//! in-memory series; degenerate numerical input yields neutral results, not
//! errors. The only I/O boundary is the [`source::TicketStore`] trait.

pub mod aggregate;
pub mod core;
pub mod forecast;
pub mod growth;
pub mod period;
pub mod regression;
pub mod source;
pub mod stats;

// Re-export commonly used types
pub use aggregate::{
    aggregate_paid_periods, aggregate_periods, rollup_daily_stats, DailyTicketStat, PeriodMetric,
    TicketRecord,
};
pub use crate::core::error::{Error, Result};
pub use forecast::{
    ensemble_forecast, forecast_periods, EnsemblePoint, ForecastPoint, SmoothingParams,
    TrendForecast,
};
pub use growth::{compare_consecutive_periods, GrowthComparison, GrowthThresholds};
pub use period::Granularity;
pub use regression::{
    fit_linear, fit_linear_detailed, fit_logarithmic, fit_quadratic, select_best_fit,
    LinearRegressionResult, TrendModel,
};
pub use source::TicketStore;
pub use stats::{correlation_test, CorrelationResult};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
