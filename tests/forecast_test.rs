use chrono::{TimeZone, Utc};
use shoplytics::{
    aggregate_periods, compare_consecutive_periods, correlation_test, ensemble_forecast,
    forecast_periods, Granularity, GrowthThresholds, SmoothingParams, TicketRecord,
};

/// One month of synthetic history: `counts[m]` tickets in month m+1, each
/// billed at `ticket_price`.
fn monthly_records(counts: &[u64], ticket_price: f64) -> Vec<TicketRecord> {
    let mut records = Vec::new();
    for (month_index, &count) in counts.iter().enumerate() {
        for i in 0..count {
            records.push(TicketRecord {
                id: format!("t-{month_index}-{i}"),
                created_at: Utc
                    .with_ymd_and_hms(2024, month_index as u32 + 1, 1 + (i % 28) as u32, 10, 0, 0)
                    .unwrap(),
                customer_id: format!("customer-{i}"),
                final_cost: Some(ticket_price),
                paid: true,
            });
        }
    }
    records
}

#[test]
fn test_linear_growth_forecast_end_to_end() {
    let records = monthly_records(&[10, 12, 14, 16, 18], 10.0);
    let metrics = aggregate_periods(&records, Granularity::Monthly, None, None);
    assert_eq!(metrics.len(), 5);

    let forecast = forecast_periods(&metrics, Granularity::Monthly, 2);
    assert_eq!(forecast.ticket_model.name(), "linear");
    assert_eq!(forecast.points.len(), 2);

    assert!((forecast.points[0].predicted_tickets - 20.0).abs() < 1e-6);
    assert!((forecast.points[1].predicted_tickets - 22.0).abs() < 1e-6);
    assert_eq!(forecast.points[0].period, "June 2024");
    assert_eq!(forecast.points[1].period, "July 2024");

    for point in &forecast.points {
        assert!(point.tickets_lower <= point.predicted_tickets);
        assert!(point.predicted_tickets <= point.tickets_upper);
        assert!(point.revenue_lower <= point.revenue_upper);
    }
}

#[test]
fn test_too_little_history_yields_empty_forecast() {
    let records = monthly_records(&[10, 12], 10.0);
    let metrics = aggregate_periods(&records, Granularity::Monthly, None, None);
    let forecast = forecast_periods(&metrics, Granularity::Monthly, 6);
    assert!(forecast.points.is_empty());
}

#[test]
fn test_ensemble_runs_independently_of_trend_path() {
    let records = monthly_records(&[10, 12, 14, 16, 18, 20], 10.0);
    let metrics = aggregate_periods(&records, Granularity::Monthly, None, None);
    let counts: Vec<f64> = metrics.iter().map(|m| m.ticket_count as f64).collect();

    let points = ensemble_forecast(&counts, 3, &SmoothingParams::default());
    assert_eq!(points.len(), 3);
    for point in &points {
        assert!(point.simple >= 0.0);
        assert!(point.arima >= 0.0);
        assert!(point.ensemble >= 0.0);
        assert!(point.holt.is_some());
    }
    // Holt follows the upward trend beyond the smoothing lag
    assert!(points[2].holt.unwrap() > points[0].holt.unwrap());
}

#[test]
fn test_growth_comparisons_over_aggregated_series() {
    let records = monthly_records(&[100, 200, 204], 50.0);
    let metrics = aggregate_periods(&records, Granularity::Monthly, None, None);
    let comparisons = compare_consecutive_periods(&metrics, &GrowthThresholds::default());
    assert_eq!(comparisons.len(), 2);

    assert!((comparisons[0].ticket_growth_pct - 100.0).abs() < 1e-10);
    assert!(comparisons[0].ticket_significant);
    assert!(comparisons[0].revenue_significant);

    assert!((comparisons[1].ticket_growth_pct - 2.0).abs() < 1e-10);
    assert!(!comparisons[1].ticket_significant);
}

#[test]
fn test_counts_and_revenue_correlate() {
    let records = monthly_records(&[10, 14, 12, 18, 20, 24], 35.0);
    let metrics = aggregate_periods(&records, Granularity::Monthly, None, None);

    let counts: Vec<f64> = metrics.iter().map(|m| m.ticket_count as f64).collect();
    let revenues: Vec<f64> = metrics.iter().map(|m| m.total_revenue).collect();

    // Revenue is an exact multiple of counts here
    let result = correlation_test(&counts, &revenues);
    assert!((result.coefficient - 1.0).abs() < 1e-9);
    assert!(result.p_value < 1e-6);
}

#[test]
fn test_forecast_serializes_for_dashboard_consumers() {
    let records = monthly_records(&[10, 12, 14, 16, 18], 10.0);
    let metrics = aggregate_periods(&records, Granularity::Monthly, None, None);
    let forecast = forecast_periods(&metrics, Granularity::Monthly, 2);

    let json = serde_json::to_value(&forecast).expect("forecast serializes");
    assert_eq!(json["points"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(json["ticket_model"]["family"], "linear");
    assert!(json["points"][0]["predicted_tickets"].is_number());

    let metrics_json = serde_json::to_string(&metrics).expect("metrics serialize");
    assert!(metrics_json.contains("\"period_key\":\"2024-01\""));
}
