//! Seeded generator of realistic hourly sample data.

use std::f64::consts::PI;

use chrono::{Datelike, Days, NaiveDate};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::{ConfigError, SampleConfig, parse_date};
use crate::data::record::SolarDataPoint;

/// First hour with daylight (inclusive).
const SUNRISE_HOUR: u32 = 6;
/// First hour without daylight.
const SUNSET_HOUR: u32 = 19;
/// Day of year with the longest daylight.
const SUMMER_SOLSTICE_DOY: f64 = 172.0;
/// Per-hour production noise as a fraction of output.
const HOURLY_NOISE_STD: f64 = 0.05;
/// Demand noise standard deviation (kWh).
const DEMAND_NOISE_STD: f64 = 0.1;
const MIN_DEMAND_KWH: f64 = 0.05;
const CLOUD_MIN: f64 = 0.2;
const CLOUD_MAX: f64 = 1.1;

/// Gaussian noise via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    z0 * std_dev
}

/// Half-sine daylight fraction for an hour, 0 outside daylight.
fn daylight_frac(hour: u32) -> f64 {
    if !(SUNRISE_HOUR..SUNSET_HOUR).contains(&hour) {
        return 0.0;
    }
    let span = f64::from(SUNSET_HOUR - SUNRISE_HOUR);
    let pos = (f64::from(hour - SUNRISE_HOUR) + 0.5) / span;
    (PI * pos).sin()
}

/// Seasonal production multiplier in [0.3, 1.0], highest at midsummer.
fn seasonal_factor(date: NaiveDate) -> f64 {
    let doy = f64::from(date.ordinal());
    0.65 + 0.35 * (2.0 * PI * (doy - SUMMER_SOLSTICE_DOY) / 365.0).cos()
}

/// Household demand shape (kWh above the base load) for one hour.
fn demand_shape(hour: u32, is_weekend: bool) -> f64 {
    let profile = match hour {
        7..=9 => 0.8,
        10..=16 => 0.3,
        17..=21 => 1.5,
        22 | 23 => 0.4,
        _ => 0.0,
    };
    if is_weekend && (8..=20).contains(&hour) {
        profile * 1.2 + 0.2
    } else {
        profile
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Generates derived hourly records for consecutive days.
///
/// Production follows a daylight bell scaled by season and a per-day cloud
/// factor; demand combines a base load with morning and evening peaks.
/// The same configuration always produces the same records.
///
/// # Examples
///
/// ```
/// use solar_balance::config::SampleConfig;
/// use solar_balance::sample::SampleGenerator;
///
/// let cfg = SampleConfig { days: 2, ..SampleConfig::default() };
/// let points = SampleGenerator::new(&cfg).unwrap().generate();
/// assert_eq!(points.len(), 48);
/// ```
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    start: NaiveDate,
    days: usize,
    system_kw: f64,
    base_demand_kw: f64,
    cloud_noise_std: f64,
    rng: StdRng,
}

impl SampleGenerator {
    /// Creates a generator from sample configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `start_date` is not a `YYYY-MM-DD` date.
    pub fn new(cfg: &SampleConfig) -> Result<Self, ConfigError> {
        let start = parse_date(&cfg.start_date).ok_or_else(|| ConfigError {
            field: "sample.start_date".to_string(),
            message: format!("must be a YYYY-MM-DD date, got \"{}\"", cfg.start_date),
        })?;
        Ok(Self {
            start,
            days: cfg.days,
            system_kw: cfg.system_kw.max(0.0),
            base_demand_kw: cfg.base_demand_kw.max(0.0),
            cloud_noise_std: cfg.cloud_noise_std.max(0.0),
            rng: StdRng::seed_from_u64(cfg.seed),
        })
    }

    /// Produces `days * 24` records starting at the configured date.
    pub fn generate(mut self) -> Vec<SolarDataPoint> {
        let mut points = Vec::with_capacity(self.days * 24);
        for offset in 0..self.days {
            let Some(date) = self.start.checked_add_days(Days::new(offset as u64)) else {
                tracing::warn!(offset, "sample date out of range, stopping early");
                break;
            };
            let cloud =
                (1.0 + gaussian_noise(&mut self.rng, self.cloud_noise_std)).clamp(CLOUD_MIN, CLOUD_MAX);
            let season = seasonal_factor(date);
            let weekday = date.weekday().num_days_from_sunday();
            let is_weekend = weekday == 0 || weekday == 6;

            for hour in 0..24 {
                let frac = daylight_frac(hour);
                let solar = if frac > 0.0 {
                    let noise_mult = 1.0 + gaussian_noise(&mut self.rng, HOURLY_NOISE_STD);
                    (self.system_kw * frac * season * cloud * noise_mult).max(0.0)
                } else {
                    0.0
                };
                let demand = (self.base_demand_kw
                    + demand_shape(hour, is_weekend)
                    + gaussian_noise(&mut self.rng, DEMAND_NOISE_STD))
                .max(MIN_DEMAND_KWH);

                points.push(SolarDataPoint::from_calendar(
                    date,
                    hour,
                    round3(solar),
                    round3(demand),
                ));
            }
        }
        tracing::debug!(records = points.len(), start = %self.start, "generated sample data");
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(days: usize, seed: u64) -> SampleConfig {
        SampleConfig {
            days,
            seed,
            ..SampleConfig::default()
        }
    }

    fn generate(c: &SampleConfig) -> Vec<SolarDataPoint> {
        SampleGenerator::new(c).map(SampleGenerator::generate).unwrap_or_default()
    }

    #[test]
    fn produces_24_hours_per_day() {
        let points = generate(&cfg(3, 1));
        assert_eq!(points.len(), 72);
        assert_eq!(points[0].date, "2025-01-01");
        assert_eq!(points[71].date, "2025-01-03");
        assert_eq!(points[25].hour, 1);
    }

    #[test]
    fn same_seed_is_deterministic() {
        assert_eq!(generate(&cfg(5, 9)), generate(&cfg(5, 9)));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(generate(&cfg(5, 1)), generate(&cfg(5, 2)));
    }

    #[test]
    fn no_production_at_night_and_values_non_negative() {
        for p in generate(&cfg(10, 3)) {
            assert!(p.solar_production >= 0.0);
            assert!(p.energy_demand > 0.0);
            if p.hour < SUNRISE_HOUR || p.hour >= SUNSET_HOUR {
                assert_eq!(p.solar_production, 0.0, "night production at {}", p.hour);
            }
        }
    }

    #[test]
    fn summer_outproduces_winter() {
        assert!(seasonal_factor(NaiveDate::from_ymd_opt(2025, 6, 21).expect("date")) > 0.99);
        assert!(seasonal_factor(NaiveDate::from_ymd_opt(2025, 12, 21).expect("date")) < 0.31);
    }

    #[test]
    fn invalid_start_date_is_rejected() {
        let c = SampleConfig {
            start_date: "tomorrow".to_string(),
            ..SampleConfig::default()
        };
        assert!(SampleGenerator::new(&c).is_err());
    }

    #[test]
    fn gaussian_noise_zero_std() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(gaussian_noise(&mut rng, 0.0), 0.0);
    }
}
