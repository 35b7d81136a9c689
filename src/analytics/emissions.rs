//! Avoided grid CO2 emissions.

use std::fmt;

use serde::Serialize;

use crate::data::balance::percentage;
use crate::data::record::SolarDataPoint;

/// Default grid emission factor (kg CO2 per kWh).
pub const DEFAULT_GRID_EMISSION_FACTOR: f64 = 0.5;

/// CO2 a single tree absorbs per year (kg), used for the illustrative
/// tree equivalent.
const KG_CO2_PER_TREE: f64 = 21.7;

const KG_PER_TONNE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionsReduction {
    /// Emissions if all demand came from the grid (kg).
    pub emissions_without_solar: f64,
    /// Emissions of the remaining grid import (kg).
    pub emissions_with_solar: f64,
    pub emissions_reduction: f64,
    pub emissions_reduction_tonnes: f64,
    pub reduction_percentage: f64,
    /// Trees needed to absorb the same CO2 in a year, rounded.
    /// Negative when the reduction is negative.
    pub trees_planted_equivalent: f64,
}

/// Compares grid emissions for total demand against actual grid import.
pub fn calculate_emissions_reduction(
    points: &[SolarDataPoint],
    grid_emission_factor: f64,
) -> EmissionsReduction {
    let (demand, import) = points.iter().fold((0.0_f64, 0.0_f64), |(d, i), p| {
        (d + p.energy_demand, i + p.grid_import)
    });

    let without_solar = demand * grid_emission_factor;
    let with_solar = import * grid_emission_factor;
    let reduction = without_solar - with_solar;

    EmissionsReduction {
        emissions_without_solar: without_solar,
        emissions_with_solar: with_solar,
        emissions_reduction: reduction,
        emissions_reduction_tonnes: reduction / KG_PER_TONNE,
        reduction_percentage: percentage(reduction, without_solar),
        trees_planted_equivalent: (reduction / KG_CO2_PER_TREE).round(),
    }
}

impl fmt::Display for EmissionsReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Emissions ---")?;
        writeln!(f, "Without solar:         {:.2} kg CO2", self.emissions_without_solar)?;
        writeln!(f, "With solar:            {:.2} kg CO2", self.emissions_with_solar)?;
        writeln!(
            f,
            "Reduction:             {:.2} kg CO2 ({:.3} t, {:.1}%)",
            self.emissions_reduction, self.emissions_reduction_tonnes, self.reduction_percentage
        )?;
        write!(f, "Tree equivalent:       {:.0}", self.trees_planted_equivalent)
    }
}
