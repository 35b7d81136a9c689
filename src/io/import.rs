//! CSV import of hourly records.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;

use crate::config::parse_date;
use crate::data::record::{CalendarFields, SolarDataPoint, derive_metrics};
use crate::error::{Error, Result};

/// One CSV row as written by [`super::export::write_csv`] or by hand.
///
/// Only `date`, `hour`, `solarProduction` and `energyDemand` are required.
/// Derived columns are accepted and ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    date: String,
    hour: u32,
    month: Option<u32>,
    year: Option<i32>,
    day_of_week: Option<u32>,
    is_weekend: Option<String>,
    quarter: Option<u32>,
    week_of_year: Option<u32>,
    solar_production: f64,
    energy_demand: f64,
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

impl CsvRow {
    fn into_point(self, row: usize) -> Result<SolarDataPoint> {
        let date = parse_date(self.date.trim()).ok_or_else(|| Error::InvalidField {
            row,
            field: "date",
            message: format!("expected YYYY-MM-DD, got \"{}\"", self.date),
        })?;
        if self.hour > 23 {
            return Err(Error::InvalidField {
                row,
                field: "hour",
                message: format!("expected 0-23, got {}", self.hour),
            });
        }
        let is_weekend = match self.is_weekend.as_deref() {
            None | Some("") => None,
            Some(s) => Some(parse_bool(s).ok_or_else(|| Error::InvalidField {
                row,
                field: "isWeekend",
                message: format!("expected true/false, got \"{s}\""),
            })?),
        };

        let cal = CalendarFields::from_date(date);
        Ok(derive_metrics(SolarDataPoint {
            date: self.date.trim().to_string(),
            hour: self.hour,
            month: self.month.unwrap_or(cal.month),
            year: self.year.unwrap_or(cal.year),
            day_of_week: self.day_of_week.unwrap_or(cal.day_of_week),
            is_weekend: is_weekend.unwrap_or(cal.is_weekend),
            quarter: self.quarter.unwrap_or(cal.quarter),
            week_of_year: self.week_of_year.unwrap_or(cal.week_of_year),
            solar_production: self.solar_production,
            energy_demand: self.energy_demand,
            net_energy: 0.0,
            grid_import: 0.0,
            excess_export: 0.0,
        }))
    }
}

/// Reads and derives records from CSV with a header row.
///
/// # Errors
///
/// Returns an error on malformed CSV, unparseable numbers, an invalid date,
/// an hour outside 0-23, or an unrecognized boolean.
pub fn read_csv(reader: impl Read) -> Result<Vec<SolarDataPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        points.push(row?.into_point(i + 1)?);
    }
    tracing::info!(records = points.len(), "imported CSV records");
    Ok(points)
}

/// Reads and derives records from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row is invalid.
pub fn import_csv(path: &Path) -> Result<Vec<SolarDataPoint>> {
    let file = File::open(path)?;
    tracing::debug!(path = %path.display(), "reading CSV");
    read_csv(io::BufReader::new(file))
}
