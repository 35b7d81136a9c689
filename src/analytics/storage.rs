//! Storage potential of an unconstrained daily battery.
//!
//! Each day starts empty and is walked hour by hour: surplus charges the
//! store, deficit hours draw from it. Nothing carries over between days.

use std::fmt;

use serde::Serialize;

use super::days_by_date;
use crate::data::balance::self_sufficiency_pct;
use crate::data::record::SolarDataPoint;

/// Battery state carried through one day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct StorageState {
    level: f64,
    max_level: f64,
    additional_self_consumption: f64,
}

impl StorageState {
    fn step(self, p: &SolarDataPoint) -> Self {
        if p.excess_export > 0.0 {
            let level = self.level + p.excess_export;
            Self {
                level,
                max_level: self.max_level.max(level),
                ..self
            }
        } else if p.grid_import > 0.0 && self.level > 0.0 {
            let discharge = self.level.min(p.grid_import);
            Self {
                level: self.level - discharge,
                additional_self_consumption: self.additional_self_consumption + discharge,
                ..self
            }
        } else {
            self
        }
    }
}

/// Storage simulation outcome for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStorage {
    pub date: String,
    pub excess_energy: f64,
    pub deficit_energy: f64,
    /// Deficit covered from stored surplus (kWh).
    pub additional_self_consumption: f64,
    /// Highest storage level reached during the day (kWh).
    pub max_storage_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoragePotential {
    pub total_excess_energy: f64,
    /// Total grid import (kWh).
    pub total_deficit_energy: f64,
    pub potential_additional_self_consumption: f64,
    /// Largest capacity any single day required (kWh).
    pub optimal_storage_capacity: f64,
    pub current_self_sufficiency: f64,
    pub potential_self_sufficiency: f64,
    /// `potential_self_sufficiency - current_self_sufficiency` (percentage points).
    pub self_sufficiency_improvement: f64,
    pub days: Vec<DailyStorage>,
}

fn simulate_day(date: &str, hours: &[&SolarDataPoint]) -> DailyStorage {
    let end = hours
        .iter()
        .fold(StorageState::default(), |state, p| state.step(p));
    let (excess, deficit) = hours.iter().fold((0.0_f64, 0.0_f64), |(e, d), p| {
        (e + p.excess_export, d + p.grid_import)
    });
    tracing::trace!(date, max_level = end.max_level, "storage day simulated");

    DailyStorage {
        date: date.to_string(),
        excess_energy: excess,
        deficit_energy: deficit,
        additional_self_consumption: end.additional_self_consumption,
        max_storage_level: end.max_level,
    }
}

/// Simulates a capacity-unconstrained battery per day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use solar_balance::analytics::storage::calculate_storage_potential;
/// use solar_balance::data::record::SolarDataPoint;
///
/// let d = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
/// let points = vec![
///     SolarDataPoint::from_calendar(d, 12, 5.0, 1.0),
///     SolarDataPoint::from_calendar(d, 20, 0.0, 3.0),
/// ];
/// let s = calculate_storage_potential(&points);
/// assert_eq!(s.optimal_storage_capacity, 4.0);
/// assert_eq!(s.potential_additional_self_consumption, 3.0);
/// ```
pub fn calculate_storage_potential(points: &[SolarDataPoint]) -> StoragePotential {
    let days: Vec<DailyStorage> = days_by_date(points)
        .iter()
        .map(|(date, hours)| simulate_day(date, hours))
        .collect();

    let mut total_excess = 0.0_f64;
    let mut total_deficit = 0.0_f64;
    let mut additional = 0.0_f64;
    let mut optimal_capacity = 0.0_f64;
    for d in &days {
        total_excess += d.excess_energy;
        total_deficit += d.deficit_energy;
        additional += d.additional_self_consumption;
        optimal_capacity = optimal_capacity.max(d.max_storage_level);
    }

    let (demand, self_consumed) = points.iter().fold((0.0_f64, 0.0_f64), |(d, s), p| {
        (d + p.energy_demand, s + p.self_consumed())
    });
    let current = self_sufficiency_pct(self_consumed, demand);
    let potential = self_sufficiency_pct(self_consumed + additional, demand);

    StoragePotential {
        total_excess_energy: total_excess,
        total_deficit_energy: total_deficit,
        potential_additional_self_consumption: additional,
        optimal_storage_capacity: optimal_capacity,
        current_self_sufficiency: current,
        potential_self_sufficiency: potential,
        self_sufficiency_improvement: potential - current,
        days,
    }
}

impl fmt::Display for StoragePotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Storage Potential ---")?;
        writeln!(
            f,
            "Excess / deficit:      {:.2} / {:.2} kWh",
            self.total_excess_energy, self.total_deficit_energy
        )?;
        writeln!(
            f,
            "Recoverable deficit:   {:.2} kWh",
            self.potential_additional_self_consumption
        )?;
        writeln!(
            f,
            "Optimal capacity:      {:.2} kWh",
            self.optimal_storage_capacity
        )?;
        write!(
            f,
            "Self-sufficiency:      {:.1}% -> {:.1}% (+{:.1} pts)",
            self.current_self_sufficiency,
            self.potential_self_sufficiency,
            self.self_sufficiency_improvement
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn point(d: u32, hour: u32, solar: f64, demand: f64) -> SolarDataPoint {
        let date = NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date");
        SolarDataPoint::from_calendar(date, hour, solar, demand)
    }

    #[test]
    fn surplus_then_deficit_is_recovered() {
        let points = vec![
            point(2, 11, 4.0, 1.0), // +3
            point(2, 12, 3.0, 1.0), // +2 → level 5
            point(2, 19, 0.0, 2.0), // -2 → 3
            point(2, 20, 0.0, 4.0), // -3 → 0, 1 kWh left on grid
        ];
        let s = calculate_storage_potential(&points);
        assert_eq!(s.optimal_storage_capacity, 5.0);
        assert_eq!(s.potential_additional_self_consumption, 5.0);
        assert_eq!(s.total_excess_energy, 5.0);
        assert_eq!(s.total_deficit_energy, 6.0);
        assert_eq!(s.days.len(), 1);
    }

    #[test]
    fn deficit_before_surplus_is_not_covered() {
        let points = vec![point(2, 7, 0.0, 3.0), point(2, 13, 5.0, 1.0)];
        let s = calculate_storage_potential(&points);
        assert_eq!(s.potential_additional_self_consumption, 0.0);
        assert_eq!(s.optimal_storage_capacity, 4.0);
    }

    #[test]
    fn hours_are_sorted_before_simulation() {
        // Same records as above in reverse input order
        let points = vec![point(2, 20, 0.0, 3.0), point(2, 12, 5.0, 1.0)];
        let s = calculate_storage_potential(&points);
        assert_eq!(s.potential_additional_self_consumption, 3.0);
    }

    #[test]
    fn days_do_not_carry_over() {
        let points = vec![point(2, 12, 6.0, 0.0), point(3, 20, 0.0, 4.0)];
        let s = calculate_storage_potential(&points);
        assert_eq!(s.potential_additional_self_consumption, 0.0);
        assert_eq!(s.days.len(), 2);
        assert_eq!(s.days[0].date, "2025-06-02");
    }

    #[test]
    fn optimal_capacity_is_max_not_sum() {
        let points = vec![point(2, 12, 3.0, 0.0), point(3, 12, 7.0, 0.0)];
        let s = calculate_storage_potential(&points);
        assert_eq!(s.optimal_storage_capacity, 7.0);
    }

    #[test]
    fn improvement_is_potential_minus_current() {
        let points = vec![
            point(2, 12, 4.0, 2.0),
            point(2, 20, 0.0, 2.0),
        ];
        let s = calculate_storage_potential(&points);
        assert!((s.current_self_sufficiency - 50.0).abs() < 1e-9);
        assert!((s.potential_self_sufficiency - 100.0).abs() < 1e-9);
        assert!((s.self_sufficiency_improvement - 50.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input() {
        let s = calculate_storage_potential(&[]);
        assert_eq!(s.optimal_storage_capacity, 0.0);
        assert_eq!(s.self_sufficiency_improvement, 0.0);
        assert!(s.days.is_empty());
    }
}
