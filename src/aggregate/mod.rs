//! Period aggregation over raw ticket records.
//!
//! A single pass folds records into per-bucket accumulators (count, distinct
//! customers, revenue total); finalized buckets become [`PeriodMetric`]
//! values sorted chronologically by bucket key. The paid-only variant shares
//! the same pass, parameterized by a predicate.

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::period::Granularity;

/// A raw repair-ticket row, as fetched from the external store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub customer_id: String,
    /// Final billed amount; missing values count as 0.
    pub final_cost: Option<f64>,
    pub paid: bool,
}

/// A pre-aggregated daily row from the store's daily rollup query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTicketStat {
    pub date: NaiveDate,
    pub ticket_count: u64,
    pub unique_customers: u64,
    pub total_revenue: f64,
}

/// One finalized period bucket with derived ratio metrics.
///
/// `period_key` is the grouping and sort identity (lexicographic order is
/// chronological); `label` is the display string; `period_start` is the
/// canonical bucket start date used when stepping forecasts forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodMetric {
    pub period_key: String,
    pub period_start: NaiveDate,
    pub label: String,
    pub ticket_count: u64,
    pub unique_customers: u64,
    pub total_revenue: f64,
    /// total_revenue / ticket_count, or 0 for empty buckets.
    pub average_ticket_value: f64,
    /// total_revenue / unique_customers, or 0 for empty buckets.
    pub revenue_per_customer: f64,
}

/// Per-bucket accumulator, local to one aggregation pass.
struct BucketAccumulator {
    period_start: NaiveDate,
    label: String,
    ticket_count: u64,
    customers: HashSet<String>,
    total_revenue: f64,
}

/// Aggregate ticket records into chronologically ordered period metrics.
///
/// Records outside the optional `[start, end]` window are excluded before
/// bucketing.
pub fn aggregate_periods(
    records: &[TicketRecord],
    granularity: Granularity,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<PeriodMetric> {
    aggregate_with(records, granularity, start, end, |_| true)
}

/// Same aggregation restricted to paid tickets.
pub fn aggregate_paid_periods(
    records: &[TicketRecord],
    granularity: Granularity,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<PeriodMetric> {
    aggregate_with(records, granularity, start, end, |record| record.paid)
}

fn aggregate_with<F>(
    records: &[TicketRecord],
    granularity: Granularity,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    include: F,
) -> Vec<PeriodMetric>
where
    F: Fn(&TicketRecord) -> bool,
{
    let mut buckets: HashMap<String, BucketAccumulator> = HashMap::new();
    let mut seen = 0usize;

    for record in records {
        if let Some(s) = start {
            if record.created_at < s {
                continue;
            }
        }
        if let Some(e) = end {
            if record.created_at > e {
                continue;
            }
        }
        if !include(record) {
            continue;
        }

        seen += 1;
        let date = record.created_at.date_naive();
        let key = granularity.bucket_key(date);
        let bucket = buckets.entry(key).or_insert_with(|| BucketAccumulator {
            period_start: granularity.period_start(date),
            label: granularity.bucket_label(date),
            ticket_count: 0,
            customers: HashSet::new(),
            total_revenue: 0.0,
        });
        bucket.ticket_count += 1;
        bucket.customers.insert(record.customer_id.clone());
        bucket.total_revenue += record.final_cost.unwrap_or(0.0);
    }

    debug!(
        "aggregated {} of {} records into {} {} buckets",
        seen,
        records.len(),
        buckets.len(),
        granularity
    );

    finalize(buckets)
}

/// Re-aggregate already-daily rows into coarser buckets.
///
/// Counts, customers, and revenue are summed per target bucket. Distinct
/// customers summed across days over-count customers active on several
/// days; the raw-record path is authoritative for distinct counts.
pub fn rollup_daily_stats(stats: &[DailyTicketStat], granularity: Granularity) -> Vec<PeriodMetric> {
    let mut buckets: HashMap<String, (NaiveDate, String, u64, u64, f64)> = HashMap::new();

    for stat in stats {
        let key = granularity.bucket_key(stat.date);
        let bucket = buckets.entry(key).or_insert_with(|| {
            (
                granularity.period_start(stat.date),
                granularity.bucket_label(stat.date),
                0,
                0,
                0.0,
            )
        });
        bucket.2 += stat.ticket_count;
        bucket.3 += stat.unique_customers;
        bucket.4 += stat.total_revenue;
    }

    let mut metrics: Vec<PeriodMetric> = buckets
        .into_iter()
        .map(|(key, (period_start, label, ticket_count, unique_customers, total_revenue))| {
            derive_metric(key, period_start, label, ticket_count, unique_customers, total_revenue)
        })
        .collect();
    metrics.sort_by(|a, b| a.period_key.cmp(&b.period_key));
    metrics
}

fn finalize(buckets: HashMap<String, BucketAccumulator>) -> Vec<PeriodMetric> {
    let mut metrics: Vec<PeriodMetric> = buckets
        .into_iter()
        .map(|(key, bucket)| {
            derive_metric(
                key,
                bucket.period_start,
                bucket.label,
                bucket.ticket_count,
                bucket.customers.len() as u64,
                bucket.total_revenue,
            )
        })
        .collect();
    metrics.sort_by(|a, b| a.period_key.cmp(&b.period_key));
    metrics
}

fn derive_metric(
    period_key: String,
    period_start: NaiveDate,
    label: String,
    ticket_count: u64,
    unique_customers: u64,
    total_revenue: f64,
) -> PeriodMetric {
    let average_ticket_value = if ticket_count > 0 {
        total_revenue / ticket_count as f64
    } else {
        0.0
    };
    let revenue_per_customer = if unique_customers > 0 {
        total_revenue / unique_customers as f64
    } else {
        0.0
    };
    PeriodMetric {
        period_key,
        period_start,
        label,
        ticket_count,
        unique_customers,
        total_revenue,
        average_ticket_value,
        revenue_per_customer,
    }
}
