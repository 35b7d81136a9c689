//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use solar_balance::config::SampleConfig;
use solar_balance::data::SolarDataPoint;
use solar_balance::sample::SampleGenerator;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Three hours on 2025-01-01 and one on 2025-01-02.
///
/// Totals: solar 15.5, demand 11.5, import 4.0, export 8.0.
pub fn two_day_fixture() -> Vec<SolarDataPoint> {
    vec![
        SolarDataPoint::from_calendar(date(2025, 1, 1), 10, 5.0, 2.0),
        SolarDataPoint::from_calendar(date(2025, 1, 1), 12, 6.0, 3.0),
        SolarDataPoint::from_calendar(date(2025, 1, 1), 20, 0.0, 4.0),
        SolarDataPoint::from_calendar(date(2025, 1, 2), 12, 4.5, 2.5),
    ]
}

/// Seeded sample records covering `days` full days from 2025-03-28.
pub fn sample_records(days: usize) -> Vec<SolarDataPoint> {
    let cfg = SampleConfig {
        days,
        start_date: "2025-03-28".to_string(),
        seed: 7,
        ..SampleConfig::default()
    };
    SampleGenerator::new(&cfg)
        .expect("valid sample config")
        .generate()
}

/// Float comparison with an absolute tolerance.
pub fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}
