//! Integration tests for filtering, aggregation and summary over generated data.

mod common;

use solar_balance::data::{
    FilterOptions, aggregate_by_day, aggregate_by_hour, aggregate_by_month, filter, summarize,
};

use common::approx;

#[test]
fn daily_totals_add_up_to_summary() {
    let records = common::sample_records(10);
    let summary = summarize(&records);
    let daily = aggregate_by_day(&records);

    assert_eq!(daily.len(), 10);
    assert_eq!(summary.day_count, 10);
    assert_eq!(summary.record_count, 240);

    let solar: f64 = daily.iter().map(|d| d.solar_production).sum();
    let demand: f64 = daily.iter().map(|d| d.energy_demand).sum();
    let import: f64 = daily.iter().map(|d| d.grid_import).sum();
    let export: f64 = daily.iter().map(|d| d.excess_export).sum();
    assert!(approx(solar, summary.total_solar_production, 1e-6));
    assert!(approx(demand, summary.total_energy_demand, 1e-6));
    assert!(approx(import, summary.total_grid_import, 1e-6));
    assert!(approx(export, summary.total_excess_export, 1e-6));
}

#[test]
fn monthly_groups_span_month_boundary() {
    // 2025-03-28 + 10 days reaches into April
    let records = common::sample_records(10);
    let monthly = aggregate_by_month(&records);
    assert_eq!(monthly.len(), 2);
    assert_eq!((monthly[0].year, monthly[0].month), (2025, 3));
    assert_eq!((monthly[1].year, monthly[1].month), (2025, 4));

    let summary = summarize(&records);
    let solar: f64 = monthly.iter().map(|m| m.solar_production).sum();
    assert!(approx(solar, summary.total_solar_production, 1e-6));
    for m in &monthly {
        assert!((0.0..=100.0).contains(&m.self_consumption_percentage));
        assert!((0.0..=100.0).contains(&m.grid_dependency_percentage));
    }
}

#[test]
fn hourly_profile_has_every_hour_even_when_filtered() {
    let records = common::sample_records(5);
    let evening = filter(
        &records,
        &FilterOptions {
            hours: vec![18, 19, 20],
            ..FilterOptions::default()
        },
    );
    assert_eq!(evening.len(), 15);

    let hourly = aggregate_by_hour(&evening);
    assert_eq!(hourly.len(), 24);
    for (i, h) in hourly.iter().enumerate() {
        assert_eq!(h.hour as usize, i);
        if (18..=20).contains(&h.hour) {
            assert_eq!(h.record_count, 5);
        } else {
            assert_eq!(h.record_count, 0);
            assert_eq!(h.energy_demand, 0.0);
        }
    }
}

#[test]
fn empty_filter_is_identity() {
    let records = common::sample_records(3);
    assert_eq!(filter(&records, &FilterOptions::default()), records);
}

#[test]
fn weekday_and_weekend_partition_the_records() {
    let records = common::sample_records(14);
    let weekdays = filter(
        &records,
        &FilterOptions {
            weekdays_only: true,
            ..FilterOptions::default()
        },
    );
    let weekends = filter(
        &records,
        &FilterOptions {
            weekends_only: true,
            ..FilterOptions::default()
        },
    );
    assert_eq!(weekdays.len(), 10 * 24);
    assert_eq!(weekends.len(), 4 * 24);
    assert!(weekends.iter().all(|p| p.is_weekend));

    let both = FilterOptions {
        weekdays_only: true,
        weekends_only: true,
        ..FilterOptions::default()
    };
    assert!(filter(&records, &both).is_empty());
}

#[test]
fn date_range_is_inclusive() {
    let records = common::sample_records(10);
    let opts = FilterOptions {
        start_date: Some("2025-03-30".to_string()),
        end_date: Some("2025-04-01".to_string()),
        ..FilterOptions::default()
    };
    let out = filter(&records, &opts);
    assert_eq!(out.len(), 3 * 24);
    assert_eq!(out[0].date, "2025-03-30");
    assert_eq!(out[out.len() - 1].date, "2025-04-01");
}

#[test]
fn fixture_summary_matches_hand_computed_values() {
    let s = summarize(&common::two_day_fixture());
    assert!(approx(s.total_solar_production, 15.5, 1e-9));
    assert!(approx(s.total_energy_demand, 11.5, 1e-9));
    assert!(approx(s.total_grid_import, 4.0, 1e-9));
    assert!(approx(s.total_excess_export, 8.0, 1e-9));
    assert!(approx(s.self_consumption_percentage, 48.387, 1e-3));
    assert!(approx(s.grid_dependency_percentage, 34.783, 1e-3));
    assert_eq!(s.day_count, 2);
    assert!(approx(s.average_daily_production, 7.75, 1e-9));
}
