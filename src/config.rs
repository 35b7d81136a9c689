//! TOML-based analysis configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::analytics::{AnalyticsParams, PeakShavingBattery, cost, emissions, peak_shaving};
use crate::data::filter::FilterOptions;
use crate::data::record::DATE_FORMAT;

/// Top-level analysis configuration parsed from TOML.
///
/// All fields have defaults matching the baseline preset. Load from
/// TOML with [`AnalysisConfig::from_toml_file`] or use
/// [`AnalysisConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Grid import price and feed-in credit.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Grid carbon intensity.
    #[serde(default)]
    pub emissions: EmissionsConfig,
    /// Battery used by the peak-shaving simulation.
    #[serde(default)]
    pub peak_shaving: PeakShavingConfig,
    /// Record filter applied before aggregation and analytics.
    #[serde(default)]
    pub filter: FilterOptions,
    /// Sample-data generator parameters.
    #[serde(default)]
    pub sample: SampleConfig,
}

/// Grid import price and feed-in credit, per kWh.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    pub grid_import_rate: f64,
    pub grid_export_rate: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            grid_import_rate: cost::DEFAULT_GRID_IMPORT_RATE,
            grid_export_rate: cost::DEFAULT_GRID_EXPORT_RATE,
        }
    }
}

/// Grid carbon intensity.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmissionsConfig {
    /// kg CO2 per kWh imported.
    pub grid_emission_factor: f64,
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            grid_emission_factor: emissions::DEFAULT_GRID_EMISSION_FACTOR,
        }
    }
}

/// Battery used by the peak-shaving simulation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeakShavingConfig {
    /// Usable capacity (kWh).
    pub storage_capacity_kwh: f64,
    /// Maximum discharge per hour (kW).
    pub max_discharge_rate_kw: f64,
}

impl Default for PeakShavingConfig {
    fn default() -> Self {
        Self {
            storage_capacity_kwh: peak_shaving::DEFAULT_STORAGE_CAPACITY_KWH,
            max_discharge_rate_kw: peak_shaving::DEFAULT_MAX_DISCHARGE_RATE_KW,
        }
    }
}

/// Sample-data generator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleConfig {
    /// Number of days to generate (must be > 0).
    pub days: usize,
    /// First generated date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Random seed.
    pub seed: u64,
    /// PV system peak output (kW).
    pub system_kw: f64,
    /// Household base demand (kW).
    pub base_demand_kw: f64,
    /// Standard deviation of the daily cloud factor.
    pub cloud_noise_std: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            days: 30,
            start_date: "2025-01-01".to_string(),
            seed: 42,
            system_kw: 5.0,
            base_demand_kw: 0.5,
            cloud_noise_std: 0.25,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariff.grid_import_rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl AnalysisConfig {
    /// Returns the baseline configuration (documented default rates and battery).
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the high-tariff preset: expensive imports, low feed-in credit.
    pub fn high_tariff() -> Self {
        Self {
            tariff: TariffConfig {
                grid_import_rate: 0.35,
                grid_export_rate: 0.05,
            },
            ..Self::default()
        }
    }

    /// Returns the low-carbon-grid preset: a mostly renewable grid mix.
    pub fn low_carbon_grid() -> Self {
        Self {
            emissions: EmissionsConfig {
                grid_emission_factor: 0.12,
            },
            ..Self::default()
        }
    }

    /// Returns the large-battery preset: a 13.5 kWh home battery.
    pub fn large_battery() -> Self {
        Self {
            peak_shaving: PeakShavingConfig {
                storage_capacity_kwh: 13.5,
                max_discharge_rate_kw: 5.0,
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_tariff", "low_carbon_grid", "large_battery"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_tariff" => Ok(Self::high_tariff()),
            "low_carbon_grid" => Ok(Self::low_carbon_grid()),
            "large_battery" => Ok(Self::large_battery()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Scalar parameters for the analytics engine.
    pub fn analytics_params(&self) -> AnalyticsParams {
        AnalyticsParams {
            grid_import_rate: self.tariff.grid_import_rate,
            grid_export_rate: self.tariff.grid_export_rate,
            grid_emission_factor: self.emissions.grid_emission_factor,
            battery: PeakShavingBattery {
                storage_capacity_kwh: self.peak_shaving.storage_capacity_kwh,
                max_discharge_rate_kw: self.peak_shaving.max_discharge_rate_kw,
            },
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let non_negative = [
            ("tariff.grid_import_rate", self.tariff.grid_import_rate),
            ("tariff.grid_export_rate", self.tariff.grid_export_rate),
            (
                "emissions.grid_emission_factor",
                self.emissions.grid_emission_factor,
            ),
            (
                "peak_shaving.storage_capacity_kwh",
                self.peak_shaving.storage_capacity_kwh,
            ),
            (
                "peak_shaving.max_discharge_rate_kw",
                self.peak_shaving.max_discharge_rate_kw,
            ),
            ("sample.system_kw", self.sample.system_kw),
            ("sample.base_demand_kw", self.sample.base_demand_kw),
            ("sample.cloud_noise_std", self.sample.cloud_noise_std),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::new(field, "must be a finite number >= 0"));
            }
        }

        errors.extend(validate_filter(&self.filter));

        let s = &self.sample;
        if s.days == 0 {
            errors.push(ConfigError::new("sample.days", "must be > 0"));
        }
        if parse_date(&s.start_date).is_none() {
            errors.push(ConfigError::new(
                "sample.start_date",
                format!("must be a YYYY-MM-DD date, got \"{}\"", s.start_date),
            ));
        }

        errors
    }
}

/// Checks filter dates, months and hours for well-formedness.
pub fn validate_filter(filter: &FilterOptions) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("filter.start_date", &filter.start_date),
        ("filter.end_date", &filter.end_date),
    ] {
        if let Some(date) = value {
            if parse_date(date).is_none() {
                errors.push(ConfigError::new(
                    field,
                    format!("must be a YYYY-MM-DD date, got \"{date}\""),
                ));
            }
        }
    }
    if let (Some(start), Some(end)) = (&filter.start_date, &filter.end_date) {
        if start > end {
            errors.push(ConfigError::new(
                "filter.start_date",
                "must be <= filter.end_date",
            ));
        }
    }
    if let Some(m) = filter.months.iter().find(|m| !(1..=12).contains(*m)) {
        errors.push(ConfigError::new(
            "filter.months",
            format!("must be in 1..=12, got {m}"),
        ));
    }
    if let Some(h) = filter.hours.iter().find(|h| **h > 23) {
        errors.push(ConfigError::new(
            "filter.hours",
            format!("must be in 0..=23, got {h}"),
        ));
    }

    errors
}

/// Parses a strict zero-padded `YYYY-MM-DD` date.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}
