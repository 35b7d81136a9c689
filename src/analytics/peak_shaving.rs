//! Peak shaving with a capacity- and rate-limited daily battery.
//!
//! The battery starts each day full and discharges into hours whose demand
//! exceeds [`PEAK_THRESHOLD`] of that day's peak demand. The day's original
//! peak is measured on demand; the shaved peak is measured on the residual
//! grid import.

use std::fmt;

use serde::Serialize;

use super::days_by_date;
use crate::data::balance::percentage;
use crate::data::record::SolarDataPoint;

/// Default usable battery capacity (kWh).
pub const DEFAULT_STORAGE_CAPACITY_KWH: f64 = 5.0;
/// Default maximum discharge per hour (kW).
pub const DEFAULT_MAX_DISCHARGE_RATE_KW: f64 = 2.0;
/// Fraction of the daily peak demand above which an hour is shaved.
pub const PEAK_THRESHOLD: f64 = 0.7;

/// Battery limits for the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakShavingBattery {
    pub storage_capacity_kwh: f64,
    pub max_discharge_rate_kw: f64,
}

impl Default for PeakShavingBattery {
    fn default() -> Self {
        Self {
            storage_capacity_kwh: DEFAULT_STORAGE_CAPACITY_KWH,
            max_discharge_rate_kw: DEFAULT_MAX_DISCHARGE_RATE_KW,
        }
    }
}

/// Peak-shaving outcome for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPeakShaving {
    pub date: String,
    /// Highest single-hour demand (kWh).
    pub original_peak: f64,
    /// Highest single-hour grid import after discharge (kWh).
    pub shaved_peak: f64,
    pub peak_reduction: f64,
    pub energy_discharged: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakShaving {
    pub battery: PeakShavingBattery,
    /// Sum of daily demand peaks (kWh).
    pub total_peak_demand: f64,
    /// Sum of daily post-shaving grid import peaks (kWh).
    pub total_shaved_peak: f64,
    pub total_peak_reduction: f64,
    pub peak_reduction_percentage: f64,
    pub total_energy_discharged: f64,
    pub days: Vec<DailyPeakShaving>,
}

/// Battery state carried through one day.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ShavingState {
    level: f64,
    discharged: f64,
    shaved_peak: f64,
}

fn simulate_day(
    date: &str,
    hours: &[&SolarDataPoint],
    battery: &PeakShavingBattery,
) -> DailyPeakShaving {
    let original_peak = hours
        .iter()
        .fold(0.0_f64, |peak, p| peak.max(p.energy_demand));
    let threshold = PEAK_THRESHOLD * original_peak;

    let start = ShavingState {
        level: battery.storage_capacity_kwh,
        discharged: 0.0,
        shaved_peak: 0.0,
    };
    let end = hours.iter().fold(start, |state, p| {
        let mut grid_import = p.grid_import;
        let mut level = state.level;
        let mut discharged = state.discharged;

        if p.energy_demand > threshold && level > 0.0 {
            let uncovered = p.energy_demand - p.self_consumed();
            let discharge = uncovered.min(battery.max_discharge_rate_kw).min(level);
            grid_import = (grid_import - discharge).max(0.0);
            level -= discharge;
            discharged += discharge;
        }

        ShavingState {
            level,
            discharged,
            shaved_peak: state.shaved_peak.max(grid_import),
        }
    });
    tracing::trace!(
        date,
        original_peak,
        shaved_peak = end.shaved_peak,
        "peak shaving day simulated"
    );

    DailyPeakShaving {
        date: date.to_string(),
        original_peak,
        shaved_peak: end.shaved_peak,
        peak_reduction: original_peak - end.shaved_peak,
        energy_discharged: end.discharged,
    }
}

/// Simulates daily peak shaving for every date in the collection.
///
/// # Arguments
///
/// * `points` - Derived records
/// * `battery` - Capacity and discharge-rate limits
pub fn calculate_peak_shaving(
    points: &[SolarDataPoint],
    battery: &PeakShavingBattery,
) -> PeakShaving {
    let days: Vec<DailyPeakShaving> = days_by_date(points)
        .iter()
        .map(|(date, hours)| simulate_day(date, hours, battery))
        .collect();

    let total_peak: f64 = days.iter().map(|d| d.original_peak).sum();
    let total_shaved: f64 = days.iter().map(|d| d.shaved_peak).sum();
    let total_discharged: f64 = days.iter().map(|d| d.energy_discharged).sum();
    let reduction = total_peak - total_shaved;

    PeakShaving {
        battery: *battery,
        total_peak_demand: total_peak,
        total_shaved_peak: total_shaved,
        total_peak_reduction: reduction,
        peak_reduction_percentage: percentage(reduction, total_peak),
        total_energy_discharged: total_discharged,
        days,
    }
}

impl fmt::Display for PeakShaving {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Peak Shaving ---")?;
        writeln!(
            f,
            "Battery:               {:.1} kWh, {:.1} kW max discharge",
            self.battery.storage_capacity_kwh, self.battery.max_discharge_rate_kw
        )?;
        writeln!(
            f,
            "Daily peaks (sum):     {:.2} -> {:.2} kWh",
            self.total_peak_demand, self.total_shaved_peak
        )?;
        writeln!(
            f,
            "Peak reduction:        {:.2} kWh ({:.1}%)",
            self.total_peak_reduction, self.peak_reduction_percentage
        )?;
        write!(
            f,
            "Energy discharged:     {:.2} kWh",
            self.total_energy_discharged
        )
    }
}
