//! Electricity cost with and without solar.

use std::fmt;

use serde::Serialize;

use crate::data::balance::percentage;
use crate::data::record::SolarDataPoint;

/// Default grid import price per kWh.
pub const DEFAULT_GRID_IMPORT_RATE: f64 = 0.15;
/// Default feed-in credit per exported kWh.
pub const DEFAULT_GRID_EXPORT_RATE: f64 = 0.08;

/// Cost totals across a record collection, in currency units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSavings {
    /// Cost if all demand were bought from the grid.
    pub total_cost_without_solar: f64,
    /// Import cost minus export credit; negative means a net credit.
    pub total_cost_with_solar: f64,
    pub total_grid_import_cost: f64,
    pub total_grid_export_credit: f64,
    /// Value of self-consumed solar at the import rate.
    pub total_solar_savings: f64,
    /// `total_cost_without_solar - total_cost_with_solar`.
    pub total_savings: f64,
    pub savings_percentage: f64,
}

/// Prices every record at the given rates and sums the results.
///
/// # Arguments
///
/// * `points` - Derived records
/// * `import_rate` - Price per imported kWh
/// * `export_rate` - Credit per exported kWh
pub fn calculate_cost_savings(
    points: &[SolarDataPoint],
    import_rate: f64,
    export_rate: f64,
) -> CostSavings {
    let mut without_solar = 0.0_f64;
    let mut with_solar = 0.0_f64;
    let mut import_cost = 0.0_f64;
    let mut export_credit = 0.0_f64;
    let mut solar_savings = 0.0_f64;

    for p in points {
        let hour_import_cost = p.grid_import * import_rate;
        let hour_export_credit = p.excess_export * export_rate;
        without_solar += p.energy_demand * import_rate;
        import_cost += hour_import_cost;
        export_credit += hour_export_credit;
        solar_savings += p.self_consumed() * import_rate;
        with_solar += hour_import_cost - hour_export_credit;
    }

    let total_savings = without_solar - with_solar;

    CostSavings {
        total_cost_without_solar: without_solar,
        total_cost_with_solar: with_solar,
        total_grid_import_cost: import_cost,
        total_grid_export_credit: export_credit,
        total_solar_savings: solar_savings,
        total_savings,
        savings_percentage: percentage(total_savings, without_solar),
    }
}

impl fmt::Display for CostSavings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Cost Savings ---")?;
        writeln!(f, "Cost without solar:    {:.2}", self.total_cost_without_solar)?;
        writeln!(f, "Cost with solar:       {:.2}", self.total_cost_with_solar)?;
        writeln!(
            f,
            "  import cost {:.2}, export credit {:.2}",
            self.total_grid_import_cost, self.total_grid_export_credit
        )?;
        writeln!(f, "Self-consumption value:{:>7.2}", self.total_solar_savings)?;
        write!(
            f,
            "Total savings:         {:.2} ({:.1}%)",
            self.total_savings, self.savings_percentage
        )
    }
}
