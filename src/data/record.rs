//! Hourly observation record and its derived energy-balance fields.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date format used by the `date` field (zero-padded ISO calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One hour of solar production and energy demand.
///
/// `net_energy`, `grid_import` and `excess_export` are derived from the two
/// measured quantities by [`derive_metrics`] and are never set independently.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use solar_balance::data::record::SolarDataPoint;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let p = SolarDataPoint::from_calendar(date, 12, 4.0, 1.5);
/// assert_eq!(p.excess_export, 2.5);
/// assert_eq!(p.grid_import, 0.0);
/// assert!(p.is_weekend);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarDataPoint {
    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
    /// Hour of day (0-23).
    pub hour: u32,
    /// Month (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Day of week, 0 = Sunday.
    pub day_of_week: u32,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// Quarter (1-4).
    pub quarter: u32,
    /// ISO week number.
    pub week_of_year: u32,
    /// Solar production during the hour (kWh).
    pub solar_production: f64,
    /// Energy demand during the hour (kWh).
    pub energy_demand: f64,
    /// `solar_production - energy_demand` (kWh).
    pub net_energy: f64,
    /// Energy drawn from the grid, `max(0, -net_energy)` (kWh).
    pub grid_import: f64,
    /// Energy sent to the grid, `max(0, net_energy)` (kWh).
    pub excess_export: f64,
}

impl SolarDataPoint {
    /// Builds a derived record, filling every calendar field from `date`.
    pub fn from_calendar(
        date: NaiveDate,
        hour: u32,
        solar_production: f64,
        energy_demand: f64,
    ) -> Self {
        let fields = CalendarFields::from_date(date);
        derive_metrics(Self {
            date: date.format(DATE_FORMAT).to_string(),
            hour,
            month: fields.month,
            year: fields.year,
            day_of_week: fields.day_of_week,
            is_weekend: fields.is_weekend,
            quarter: fields.quarter,
            week_of_year: fields.week_of_year,
            solar_production,
            energy_demand,
            net_energy: 0.0,
            grid_import: 0.0,
            excess_export: 0.0,
        })
    }

    /// Energy covered directly by solar during this hour (kWh).
    pub fn self_consumed(&self) -> f64 {
        self.solar_production - self.excess_export
    }
}

impl fmt::Display for SolarDataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:00 | solar={:>6.2} kWh  demand={:>6.2} kWh  net={:>6.2} kWh \
             | import={:.2}  export={:.2}",
            self.date,
            self.hour,
            self.solar_production,
            self.energy_demand,
            self.net_energy,
            self.grid_import,
            self.excess_export,
        )
    }
}

/// Calendar key fields computed from a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub quarter: u32,
    pub week_of_year: u32,
}

impl CalendarFields {
    pub fn from_date(date: NaiveDate) -> Self {
        let day_of_week = date.weekday().num_days_from_sunday();
        let month = date.month();
        Self {
            year: date.year(),
            month,
            day_of_week,
            is_weekend: day_of_week == 0 || day_of_week == 6,
            quarter: (month - 1) / 3 + 1,
            week_of_year: date.iso_week().week(),
        }
    }
}

/// Recomputes the three derived fields from production and demand.
///
/// Negative inputs are not rejected; they propagate arithmetically and are
/// the caller's responsibility. `NaN` and infinities follow IEEE-754.
/// Derivation depends only on the measured fields, so applying it twice
/// yields the same record.
pub fn derive_metrics(point: SolarDataPoint) -> SolarDataPoint {
    let net_energy = point.solar_production - point.energy_demand;
    // NaN must reach both grid fields
    let (grid_import, excess_export) = if net_energy.is_nan() {
        (net_energy, net_energy)
    } else if net_energy < 0.0 {
        (-net_energy, 0.0)
    } else {
        (0.0, net_energy)
    };
    SolarDataPoint {
        net_energy,
        grid_import,
        excess_export,
        ..point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn surplus_hour_exports_only() {
        let p = SolarDataPoint::from_calendar(day(2025, 1, 1), 12, 5.0, 2.0);
        assert_eq!(p.net_energy, 3.0);
        assert_eq!(p.excess_export, 3.0);
        assert_eq!(p.grid_import, 0.0);
    }

    #[test]
    fn deficit_hour_imports_only() {
        let p = SolarDataPoint::from_calendar(day(2025, 1, 1), 20, 0.0, 4.0);
        assert_eq!(p.net_energy, -4.0);
        assert_eq!(p.grid_import, 4.0);
        assert_eq!(p.excess_export, 0.0);
    }

    #[test]
    fn balanced_hour_has_neither() {
        let p = SolarDataPoint::from_calendar(day(2025, 1, 1), 10, 2.5, 2.5);
        assert_eq!(p.grid_import, 0.0);
        assert_eq!(p.excess_export, 0.0);
    }

    #[test]
    fn derivation_ignores_stale_derived_fields() {
        let mut p = SolarDataPoint::from_calendar(day(2025, 1, 1), 8, 1.0, 3.0);
        p.grid_import = 99.0;
        p.excess_export = 42.0;
        let once = derive_metrics(p);
        let twice = derive_metrics(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.grid_import, 2.0);
        assert_eq!(once.excess_export, 0.0);
    }

    #[test]
    fn nan_input_reaches_both_grid_fields() {
        let p = SolarDataPoint::from_calendar(day(2025, 1, 1), 12, f64::NAN, 2.0);
        assert!(p.net_energy.is_nan());
        assert!(p.grid_import.is_nan());
        assert!(p.excess_export.is_nan());
    }

    #[test]
    fn infinite_production_exports_infinity() {
        let p = SolarDataPoint::from_calendar(day(2025, 1, 1), 12, f64::INFINITY, 2.0);
        assert_eq!(p.excess_export, f64::INFINITY);
        assert_eq!(p.grid_import, 0.0);

        let q = SolarDataPoint::from_calendar(day(2025, 1, 1), 12, 0.0, f64::INFINITY);
        assert_eq!(q.grid_import, f64::INFINITY);
        assert_eq!(q.excess_export, 0.0);
    }

    #[test]
    fn negative_inputs_propagate() {
        let p = SolarDataPoint::from_calendar(day(2025, 1, 1), 0, -1.0, 0.0);
        assert_eq!(p.net_energy, -1.0);
        assert_eq!(p.grid_import, 1.0);
    }

    #[test]
    fn calendar_fields_from_date() {
        // 2025-01-01 is a Wednesday in ISO week 1
        let f = CalendarFields::from_date(day(2025, 1, 1));
        assert_eq!(f.day_of_week, 3);
        assert!(!f.is_weekend);
        assert_eq!(f.quarter, 1);
        assert_eq!(f.week_of_year, 1);

        let sunday = CalendarFields::from_date(day(2025, 11, 16));
        assert_eq!(sunday.day_of_week, 0);
        assert!(sunday.is_weekend);
        assert_eq!(sunday.quarter, 4);
    }

    #[test]
    fn display_does_not_panic() {
        let p = SolarDataPoint::from_calendar(day(2025, 3, 9), 7, 0.4, 1.1);
        let s = format!("{p}");
        assert!(s.starts_with("2025-03-09 07:00"));
    }
}
