//! Grouping of records by day, month and hour of day.
//!
//! Groups are accumulated in ordered maps so output is always sorted on the
//! natural key: dates chronologically, `(year, month)` numerically, hours 0-23.

use std::collections::BTreeMap;

use serde::Serialize;

use super::balance::{grid_dependency_pct, self_consumption_pct};
use super::record::SolarDataPoint;

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: usize = 24;

/// Running sums of the four additive energy quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct EnergyTotals {
    solar_production: f64,
    energy_demand: f64,
    grid_import: f64,
    excess_export: f64,
    count: usize,
}

impl EnergyTotals {
    fn add(&mut self, p: &SolarDataPoint) {
        self.solar_production += p.solar_production;
        self.energy_demand += p.energy_demand;
        self.grid_import += p.grid_import;
        self.excess_export += p.excess_export;
        self.count += 1;
    }

    fn net_energy(&self) -> f64 {
        self.solar_production - self.energy_demand
    }
}

/// Energy totals for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyData {
    pub date: String,
    pub solar_production: f64,
    pub energy_demand: f64,
    /// Recomputed from the summed production and demand.
    pub net_energy: f64,
    pub grid_import: f64,
    pub excess_export: f64,
}

/// Energy totals and balance percentages for one `(year, month)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub solar_production: f64,
    pub energy_demand: f64,
    pub net_energy: f64,
    pub grid_import: f64,
    pub excess_export: f64,
    /// Computed from the monthly totals, not averaged per record.
    pub self_consumption_percentage: f64,
    /// Computed from the monthly totals, not averaged per record.
    pub grid_dependency_percentage: f64,
}

/// Mean hourly profile for one hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyAverage {
    pub hour: u32,
    pub solar_production: f64,
    pub energy_demand: f64,
    pub net_energy: f64,
    pub grid_import: f64,
    pub excess_export: f64,
    /// Number of records that contributed to this hour.
    pub record_count: usize,
}

/// Sums the energy quantities per date, sorted chronologically.
pub fn aggregate_by_day(points: &[SolarDataPoint]) -> Vec<DailyData> {
    let mut days: BTreeMap<&str, EnergyTotals> = BTreeMap::new();
    for p in points {
        days.entry(p.date.as_str()).or_default().add(p);
    }

    days.into_iter()
        .map(|(date, t)| DailyData {
            date: date.to_string(),
            solar_production: t.solar_production,
            energy_demand: t.energy_demand,
            net_energy: t.net_energy(),
            grid_import: t.grid_import,
            excess_export: t.excess_export,
        })
        .collect()
}

/// Sums the energy quantities per `(year, month)` and derives the
/// self-consumption and grid-dependency percentages from the totals.
pub fn aggregate_by_month(points: &[SolarDataPoint]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<(i32, u32), EnergyTotals> = BTreeMap::new();
    for p in points {
        months.entry((p.year, p.month)).or_default().add(p);
    }

    months
        .into_iter()
        .map(|((year, month), t)| MonthlySummary {
            year,
            month,
            solar_production: t.solar_production,
            energy_demand: t.energy_demand,
            net_energy: t.net_energy(),
            grid_import: t.grid_import,
            excess_export: t.excess_export,
            self_consumption_percentage: self_consumption_pct(
                t.solar_production,
                t.excess_export,
            ),
            grid_dependency_percentage: grid_dependency_pct(t.grid_import, t.energy_demand),
        })
        .collect()
}

/// Averages the energy quantities per hour of day.
///
/// Always returns exactly 24 entries. An hour with no records keeps every
/// field at zero. Each average divides by the number of records for that
/// hour. Records with an hour outside 0-23 are ignored.
pub fn aggregate_by_hour(points: &[SolarDataPoint]) -> Vec<HourlyAverage> {
    let mut hours = [EnergyTotals::default(); HOURS_PER_DAY];
    for p in points {
        match hours.get_mut(p.hour as usize) {
            Some(bucket) => bucket.add(p),
            None => tracing::warn!(hour = p.hour, date = %p.date, "hour out of range"),
        }
    }

    hours
        .iter()
        .zip(0u32..)
        .map(|(t, hour)| {
            let mean = |sum: f64| {
                if t.count == 0 {
                    0.0
                } else {
                    sum / t.count as f64
                }
            };
            let solar_production = mean(t.solar_production);
            let energy_demand = mean(t.energy_demand);
            HourlyAverage {
                hour,
                solar_production,
                energy_demand,
                net_energy: solar_production - energy_demand,
                grid_import: mean(t.grid_import),
                excess_export: mean(t.excess_export),
                record_count: t.count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn point(y: i32, m: u32, d: u32, hour: u32, solar: f64, demand: f64) -> SolarDataPoint {
        let date = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        SolarDataPoint::from_calendar(date, hour, solar, demand)
    }

    #[test]
    fn daily_sums_and_order() {
        let points = vec![
            point(2025, 1, 2, 10, 4.5, 2.5),
            point(2025, 1, 1, 10, 5.0, 2.0),
            point(2025, 1, 1, 11, 6.0, 3.0),
            point(2025, 1, 1, 20, 0.0, 4.0),
        ];
        let days = aggregate_by_day(&points);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2025-01-01");
        assert_eq!(days[0].solar_production, 11.0);
        assert_eq!(days[0].energy_demand, 9.0);
        assert_eq!(days[0].net_energy, 2.0);
        assert_eq!(days[0].grid_import, 4.0);
        assert_eq!(days[0].excess_export, 6.0);
        assert_eq!(days[1].date, "2025-01-02");
    }

    #[test]
    fn monthly_orders_by_year_then_month() {
        let points = vec![
            point(2025, 2, 1, 12, 1.0, 1.0),
            point(2024, 12, 31, 12, 1.0, 1.0),
            point(2025, 1, 15, 12, 1.0, 1.0),
            point(2025, 10, 1, 12, 1.0, 1.0),
        ];
        let keys: Vec<(i32, u32)> = aggregate_by_month(&points)
            .iter()
            .map(|m| (m.year, m.month))
            .collect();
        assert_eq!(keys, vec![(2024, 12), (2025, 1), (2025, 2), (2025, 10)]);
    }

    #[test]
    fn monthly_percentages_from_totals() {
        let points = vec![
            point(2025, 1, 1, 10, 5.0, 2.0),
            point(2025, 1, 1, 11, 6.0, 3.0),
            point(2025, 1, 1, 20, 0.0, 4.0),
            point(2025, 1, 2, 10, 4.5, 2.5),
        ];
        let months = aggregate_by_month(&points);
        assert_eq!(months.len(), 1);
        assert!((months[0].self_consumption_percentage - 48.387).abs() < 1e-3);
        assert!((months[0].grid_dependency_percentage - 34.783).abs() < 1e-3);
    }

    #[test]
    fn monthly_without_production_or_demand_is_zero() {
        let months = aggregate_by_month(&[point(2025, 1, 1, 3, 0.0, 0.0)]);
        assert_eq!(months[0].self_consumption_percentage, 0.0);
        assert_eq!(months[0].grid_dependency_percentage, 0.0);
    }

    #[test]
    fn hourly_always_has_24_entries() {
        assert_eq!(aggregate_by_hour(&[]).len(), 24);
        let hours = aggregate_by_hour(&[point(2025, 1, 1, 5, 1.0, 2.0)]);
        assert_eq!(hours.len(), 24);
        for (i, h) in hours.iter().enumerate() {
            assert_eq!(h.hour as usize, i);
        }
        assert_eq!(hours[4].record_count, 0);
        assert_eq!(hours[4].energy_demand, 0.0);
    }

    #[test]
    fn hourly_divides_by_contributing_records() {
        let points = vec![
            point(2025, 1, 1, 12, 4.0, 1.0),
            point(2025, 1, 2, 12, 2.0, 3.0),
            point(2025, 1, 1, 13, 9.0, 0.0),
        ];
        let hours = aggregate_by_hour(&points);
        assert_eq!(hours[12].record_count, 2);
        assert_eq!(hours[12].solar_production, 3.0);
        assert_eq!(hours[12].energy_demand, 2.0);
        assert_eq!(hours[12].grid_import, 0.5);
        assert_eq!(hours[12].excess_export, 1.5);
        assert_eq!(hours[13].solar_production, 9.0);
    }

    #[test]
    fn hourly_ignores_out_of_range_hours() {
        let mut p = point(2025, 1, 1, 0, 1.0, 1.0);
        p.hour = 24;
        let hours = aggregate_by_hour(&[p]);
        assert!(hours.iter().all(|h| h.record_count == 0));
    }
}
