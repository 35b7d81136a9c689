//! Self-sufficiency totals and hour classification.

use std::fmt;

use serde::Serialize;

use crate::data::balance::{self_consumption_pct, self_sufficiency_pct};
use crate::data::record::SolarDataPoint;

/// Mutually exclusive classification of one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HourCategory {
    /// No solar production at all.
    NoProduction,
    /// Production exactly covered demand.
    SelfSufficient,
    /// Surplus exported to the grid.
    ExcessProduction,
    /// Deficit imported from the grid.
    GridDependent,
}

impl HourCategory {
    /// Classifies a derived record, testing the categories in priority order.
    pub fn classify(p: &SolarDataPoint) -> Self {
        if p.solar_production == 0.0 {
            Self::NoProduction
        } else if p.grid_import == 0.0 && p.excess_export == 0.0 {
            Self::SelfSufficient
        } else if p.excess_export > 0.0 {
            Self::ExcessProduction
        } else {
            Self::GridDependent
        }
    }
}

/// Number of hours in each [`HourCategory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourClassification {
    pub self_sufficient: usize,
    pub grid_dependent: usize,
    pub excess_production: usize,
    pub no_production: usize,
}

impl HourClassification {
    fn record(&mut self, category: HourCategory) {
        match category {
            HourCategory::NoProduction => self.no_production += 1,
            HourCategory::SelfSufficient => self.self_sufficient += 1,
            HourCategory::ExcessProduction => self.excess_production += 1,
            HourCategory::GridDependent => self.grid_dependent += 1,
        }
    }

    /// Sum of all four counts.
    pub fn total(&self) -> usize {
        self.self_sufficient + self.grid_dependent + self.excess_production + self.no_production
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfSufficiency {
    pub total_solar_production: f64,
    pub total_energy_demand: f64,
    pub total_grid_import: f64,
    pub total_excess_export: f64,
    /// `sum(solar_production - excess_export)` (kWh).
    pub total_self_consumed: f64,
    /// Share of demand met without grid import (%).
    pub self_sufficiency_percentage: f64,
    /// Share of production used on site (%).
    pub self_consumption_percentage: f64,
    pub hours: HourClassification,
}

/// Totals the collection and classifies every hour.
pub fn calculate_self_sufficiency(points: &[SolarDataPoint]) -> SelfSufficiency {
    let mut solar = 0.0_f64;
    let mut demand = 0.0_f64;
    let mut import = 0.0_f64;
    let mut export = 0.0_f64;
    let mut self_consumed = 0.0_f64;
    let mut hours = HourClassification::default();

    for p in points {
        solar += p.solar_production;
        demand += p.energy_demand;
        import += p.grid_import;
        export += p.excess_export;
        self_consumed += p.self_consumed();
        hours.record(HourCategory::classify(p));
    }

    SelfSufficiency {
        total_solar_production: solar,
        total_energy_demand: demand,
        total_grid_import: import,
        total_excess_export: export,
        total_self_consumed: self_consumed,
        self_sufficiency_percentage: self_sufficiency_pct(self_consumed, demand),
        self_consumption_percentage: self_consumption_pct(solar, export),
        hours,
    }
}

impl fmt::Display for SelfSufficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Self-Sufficiency ---")?;
        writeln!(
            f,
            "Self-consumed solar:   {:.2} kWh of {:.2} kWh demand",
            self.total_self_consumed, self.total_energy_demand
        )?;
        writeln!(
            f,
            "Self-sufficiency:      {:.1}%",
            self.self_sufficiency_percentage
        )?;
        write!(
            f,
            "Hours:                 {} self-sufficient, {} excess, {} grid-dependent, {} no production",
            self.hours.self_sufficient,
            self.hours.excess_production,
            self.hours.grid_dependent,
            self.hours.no_production
        )
    }
}
