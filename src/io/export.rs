//! CSV export of hourly records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::data::record::SolarDataPoint;
use crate::error::Result;

/// Column header, in the same order [`super::import::read_csv`] accepts.
pub const HEADER: &str = "date,hour,month,year,dayOfWeek,isWeekend,quarter,weekOfYear,\
                          solarProduction,energyDemand,netEnergy,gridImport,excessExport";

/// Exports records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per record, including the
/// derived fields. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(points: &[SolarDataPoint], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(points, buf)?;
    tracing::info!(records = points.len(), path = %path.display(), "exported CSV");
    Ok(())
}

/// Writes records as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(points: &[SolarDataPoint], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;
    for p in points {
        wtr.write_record(&[
            p.date.clone(),
            p.hour.to_string(),
            p.month.to_string(),
            p.year.to_string(),
            p.day_of_week.to_string(),
            p.is_weekend.to_string(),
            p.quarter.to_string(),
            p.week_of_year.to_string(),
            p.solar_production.to_string(),
            p.energy_demand.to_string(),
            p.net_energy.to_string(),
            p.grid_import.to_string(),
            p.excess_export.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
