//! Period-over-period growth comparisons.
//!
//! Each consecutive pair of periods yields growth rates and a heuristic
//! significance flag: ticket-count differences are treated as Poisson
//! (stddev ≈ sqrt of the mean count), revenue differences use a flat
//! fraction of the mean amount as the stddev proxy. Both heuristics are
//! approximations, exposed as configurable thresholds rather than asserted
//! as rigorous tests.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::aggregate::PeriodMetric;

/// Thresholds for the growth significance heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GrowthThresholds {
    /// Number of heuristic standard deviations a difference must exceed.
    pub z_threshold: f64,
    /// Assumed revenue variation as a fraction of the mean amount.
    pub revenue_variation: f64,
}

impl Default for GrowthThresholds {
    fn default() -> Self {
        GrowthThresholds {
            z_threshold: 2.0,
            revenue_variation: 0.10,
        }
    }
}

/// Growth of one period relative to the one before it.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthComparison {
    /// Label of the current (later) period.
    pub period: String,
    pub current_tickets: u64,
    pub previous_tickets: u64,
    pub current_revenue: f64,
    pub previous_revenue: f64,
    /// Percent change in ticket count.
    pub ticket_growth_pct: f64,
    /// Percent change in revenue.
    pub revenue_growth_pct: f64,
    pub ticket_significant: bool,
    pub revenue_significant: bool,
}

/// Compare each chronologically consecutive pair of periods.
///
/// Fewer than two periods yield an empty result.
pub fn compare_consecutive_periods(
    series: &[PeriodMetric],
    thresholds: &GrowthThresholds,
) -> Vec<GrowthComparison> {
    let comparisons: Vec<GrowthComparison> = series
        .windows(2)
        .map(|pair| {
            let previous = &pair[0];
            let current = &pair[1];

            let ticket_growth_pct =
                growth_rate(previous.ticket_count as f64, current.ticket_count as f64);
            let revenue_growth_pct = growth_rate(previous.total_revenue, current.total_revenue);

            // Poisson-style heuristic for counts
            let count_mean = (previous.ticket_count + current.ticket_count) as f64 / 2.0;
            let count_diff =
                (current.ticket_count as f64 - previous.ticket_count as f64).abs();
            let ticket_significant =
                count_mean > 0.0 && count_diff > thresholds.z_threshold * count_mean.sqrt();

            // Flat-variation heuristic for revenue
            let revenue_mean = (previous.total_revenue + current.total_revenue) / 2.0;
            let revenue_diff = (current.total_revenue - previous.total_revenue).abs();
            let revenue_significant = revenue_mean > 0.0
                && revenue_diff
                    > thresholds.z_threshold * thresholds.revenue_variation * revenue_mean;

            GrowthComparison {
                period: current.label.clone(),
                current_tickets: current.ticket_count,
                previous_tickets: previous.ticket_count,
                current_revenue: current.total_revenue,
                previous_revenue: previous.total_revenue,
                ticket_growth_pct,
                revenue_growth_pct,
                ticket_significant,
                revenue_significant,
            }
        })
        .collect();

    debug!(
        "compared {} period pairs ({} significant by count)",
        comparisons.len(),
        comparisons.iter().filter(|c| c.ticket_significant).count()
    );

    comparisons
}

/// Percent growth; 100 when growing from zero, 0 when both are zero.
fn growth_rate(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}
