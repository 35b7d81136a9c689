//! Whole-collection rollup of totals, daily averages and peaks.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::balance::{grid_dependency_pct, self_consumption_pct};
use super::record::SolarDataPoint;

/// Rollup of a record collection.
///
/// Regenerated in full for each collection; empty input yields all zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    /// Total solar production (kWh).
    pub total_solar_production: f64,
    /// Total energy demand (kWh).
    pub total_energy_demand: f64,
    /// Total grid import (kWh).
    pub total_grid_import: f64,
    /// Total excess export (kWh).
    pub total_excess_export: f64,
    /// `total_solar_production - total_energy_demand` (kWh).
    pub total_net_energy: f64,
    /// Production per distinct date (kWh/day).
    pub average_daily_production: f64,
    /// Demand per distinct date (kWh/day).
    pub average_daily_demand: f64,
    /// Largest single-record production (kWh).
    pub peak_production: f64,
    /// Largest single-record demand (kWh).
    pub peak_demand: f64,
    pub self_consumption_percentage: f64,
    pub grid_dependency_percentage: f64,
    /// Distinct dates in the collection (at least 1).
    pub day_count: usize,
    pub record_count: usize,
}

/// Computes totals and peaks in a single pass over `points`.
///
/// # Examples
///
/// ```
/// use solar_balance::data::summary::summarize;
///
/// let s = summarize(&[]);
/// assert_eq!(s.total_solar_production, 0.0);
/// assert_eq!(s.day_count, 1);
/// ```
pub fn summarize(points: &[SolarDataPoint]) -> DataSummary {
    let mut solar = 0.0_f64;
    let mut demand = 0.0_f64;
    let mut import = 0.0_f64;
    let mut export = 0.0_f64;
    let mut peak_production = 0.0_f64;
    let mut peak_demand = 0.0_f64;
    let mut dates = BTreeSet::new();

    for p in points {
        solar += p.solar_production;
        demand += p.energy_demand;
        import += p.grid_import;
        export += p.excess_export;
        peak_production = peak_production.max(p.solar_production);
        peak_demand = peak_demand.max(p.energy_demand);
        dates.insert(p.date.as_str());
    }

    let day_count = dates.len().max(1);
    let days = day_count as f64;

    DataSummary {
        total_solar_production: solar,
        total_energy_demand: demand,
        total_grid_import: import,
        total_excess_export: export,
        total_net_energy: solar - demand,
        average_daily_production: solar / days,
        average_daily_demand: demand / days,
        peak_production,
        peak_demand,
        self_consumption_percentage: self_consumption_pct(solar, export),
        grid_dependency_percentage: grid_dependency_pct(import, demand),
        day_count,
        record_count: points.len(),
    }
}

impl fmt::Display for DataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Energy Summary ---")?;
        writeln!(
            f,
            "Records:               {} over {} day(s)",
            self.record_count, self.day_count
        )?;
        writeln!(
            f,
            "Solar production:      {:.2} kWh ({:.2} kWh/day, peak {:.2} kWh)",
            self.total_solar_production, self.average_daily_production, self.peak_production
        )?;
        writeln!(
            f,
            "Energy demand:         {:.2} kWh ({:.2} kWh/day, peak {:.2} kWh)",
            self.total_energy_demand, self.average_daily_demand, self.peak_demand
        )?;
        writeln!(f, "Net energy:            {:.2} kWh", self.total_net_energy)?;
        writeln!(f, "Grid import:           {:.2} kWh", self.total_grid_import)?;
        writeln!(f, "Excess export:         {:.2} kWh", self.total_excess_export)?;
        writeln!(
            f,
            "Self-consumption:      {:.1}%",
            self.self_consumption_percentage
        )?;
        write!(
            f,
            "Grid dependency:       {:.1}%",
            self.grid_dependency_percentage
        )
    }
}
