//! Energy-balance ratios shared by aggregates, summaries and analytics.

/// Returns `100 * numerator / denominator`, or 0 when the denominator is 0.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

/// Share of produced solar energy used on site rather than exported (%).
///
/// # Arguments
///
/// * `solar_production` - Total production (kWh)
/// * `excess_export` - Total export (kWh)
pub fn self_consumption_pct(solar_production: f64, excess_export: f64) -> f64 {
    percentage(solar_production - excess_export, solar_production)
}

/// Share of demand drawn from the grid (%).
///
/// # Arguments
///
/// * `grid_import` - Total grid import (kWh)
/// * `energy_demand` - Total demand (kWh)
pub fn grid_dependency_pct(grid_import: f64, energy_demand: f64) -> f64 {
    percentage(grid_import, energy_demand)
}

/// Share of demand met without grid import (%).
pub fn self_sufficiency_pct(self_consumed: f64, energy_demand: f64) -> f64 {
    percentage(self_consumed, energy_demand)
}
