//! Financial, environmental and operational what-if analyses.

pub mod cost;
pub mod emissions;
pub mod peak_shaving;
pub mod self_sufficiency;
pub mod storage;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::data::record::SolarDataPoint;

pub use cost::{CostSavings, calculate_cost_savings};
pub use emissions::{EmissionsReduction, calculate_emissions_reduction};
pub use peak_shaving::{PeakShaving, PeakShavingBattery, calculate_peak_shaving};
pub use self_sufficiency::{SelfSufficiency, calculate_self_sufficiency};
pub use storage::{StoragePotential, calculate_storage_potential};

/// Groups records by date (chronologically), each day sorted by hour.
///
/// The sort is stable and does not assume any input order.
pub(crate) fn days_by_date(points: &[SolarDataPoint]) -> BTreeMap<&str, Vec<&SolarDataPoint>> {
    let mut days: BTreeMap<&str, Vec<&SolarDataPoint>> = BTreeMap::new();
    for p in points {
        days.entry(p.date.as_str()).or_default().push(p);
    }
    for hours in days.values_mut() {
        hours.sort_by_key(|p| p.hour);
    }
    days
}

/// Scalar parameters for [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    pub grid_import_rate: f64,
    pub grid_export_rate: f64,
    pub grid_emission_factor: f64,
    pub battery: PeakShavingBattery,
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            grid_import_rate: cost::DEFAULT_GRID_IMPORT_RATE,
            grid_export_rate: cost::DEFAULT_GRID_EXPORT_RATE,
            grid_emission_factor: emissions::DEFAULT_GRID_EMISSION_FACTOR,
            battery: PeakShavingBattery::default(),
        }
    }
}

/// All five analyses for one record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub params: AnalyticsParams,
    pub cost_savings: CostSavings,
    pub emissions: EmissionsReduction,
    pub self_sufficiency: SelfSufficiency,
    pub storage_potential: StoragePotential,
    pub peak_shaving: PeakShaving,
}

/// Runs every analysis over the same derived records.
pub fn analyze(points: &[SolarDataPoint], params: &AnalyticsParams) -> AnalyticsReport {
    let report = AnalyticsReport {
        params: *params,
        cost_savings: calculate_cost_savings(
            points,
            params.grid_import_rate,
            params.grid_export_rate,
        ),
        emissions: calculate_emissions_reduction(points, params.grid_emission_factor),
        self_sufficiency: calculate_self_sufficiency(points),
        storage_potential: calculate_storage_potential(points),
        peak_shaving: calculate_peak_shaving(points, &params.battery),
    };
    tracing::debug!(
        records = points.len(),
        savings = report.cost_savings.total_savings,
        optimal_storage_kwh = report.storage_potential.optimal_storage_capacity,
        "analytics computed"
    );
    report
}

impl fmt::Display for AnalyticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", self.cost_savings)?;
        writeln!(f, "{}\n", self.emissions)?;
        writeln!(f, "{}\n", self.self_sufficiency)?;
        writeln!(f, "{}\n", self.storage_potential)?;
        write!(f, "{}", self.peak_shaving)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn point(d: u32, hour: u32) -> SolarDataPoint {
        let date = NaiveDate::from_ymd_opt(2025, 4, d).expect("valid date");
        SolarDataPoint::from_calendar(date, hour, 1.0, 1.0)
    }

    #[test]
    fn days_grouped_and_hour_sorted() {
        let points = vec![point(2, 15), point(1, 9), point(2, 3), point(1, 4)];
        let days = days_by_date(&points);
        let keys: Vec<&str> = days.keys().copied().collect();
        assert_eq!(keys, vec!["2025-04-01", "2025-04-02"]);
        let hours: Vec<u32> = days["2025-04-02"].iter().map(|p| p.hour).collect();
        assert_eq!(hours, vec![3, 15]);
    }

    #[test]
    fn default_params_match_documented_defaults() {
        let p = AnalyticsParams::default();
        assert_eq!(p.grid_import_rate, 0.15);
        assert_eq!(p.grid_export_rate, 0.08);
        assert_eq!(p.grid_emission_factor, 0.5);
        assert_eq!(p.battery.storage_capacity_kwh, 5.0);
        assert_eq!(p.battery.max_discharge_rate_kw, 2.0);
    }

    #[test]
    fn report_display_does_not_panic() {
        let report = analyze(&[point(1, 12)], &AnalyticsParams::default());
        let s = format!("{report}");
        assert!(s.contains("Peak Shaving"));
    }
}
