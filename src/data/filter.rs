//! Predicate-based subsetting of a record collection.

use serde::{Deserialize, Serialize};

use super::record::SolarDataPoint;

/// Independently optional filter predicates, combined with logical AND.
///
/// Dates are compared as strings, which is chronological for zero-padded
/// `YYYY-MM-DD` values. An empty `months` or `hours` list imposes no
/// constraint. `weekdays_only` and `weekends_only` are separate flags;
/// setting both matches nothing.
///
/// # Examples
///
/// ```
/// use solar_balance::data::filter::FilterOptions;
///
/// let opts = FilterOptions {
///     months: vec![6, 7, 8],
///     weekdays_only: true,
///     ..FilterOptions::default()
/// };
/// assert!(!opts.is_empty());
/// assert!(FilterOptions::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterOptions {
    /// Earliest date to keep (inclusive).
    pub start_date: Option<String>,
    /// Latest date to keep (inclusive).
    pub end_date: Option<String>,
    /// Months to keep (1-12).
    pub months: Vec<u32>,
    /// Hours of day to keep (0-23).
    pub hours: Vec<u32>,
    /// Keep Monday through Friday only.
    pub weekdays_only: bool,
    /// Keep Saturday and Sunday only.
    pub weekends_only: bool,
}

impl FilterOptions {
    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.months.is_empty()
            && self.hours.is_empty()
            && !self.weekdays_only
            && !self.weekends_only
    }

    /// Evaluates every supplied predicate against one record.
    pub fn matches(&self, point: &SolarDataPoint) -> bool {
        if let Some(start) = &self.start_date {
            if point.date.as_str() < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.end_date {
            if point.date.as_str() > end.as_str() {
                return false;
            }
        }
        if !self.months.is_empty() && !self.months.contains(&point.month) {
            return false;
        }
        if !self.hours.is_empty() && !self.hours.contains(&point.hour) {
            return false;
        }
        if self.weekdays_only && point.is_weekend {
            return false;
        }
        if self.weekends_only && !point.is_weekend {
            return false;
        }
        true
    }
}

/// Returns the records matching `options`, preserving input order.
///
/// The input collection is never modified.
pub fn filter(points: &[SolarDataPoint], options: &FilterOptions) -> Vec<SolarDataPoint> {
    if options.is_empty() {
        return points.to_vec();
    }
    let kept: Vec<SolarDataPoint> = points
        .iter()
        .filter(|p| options.matches(p))
        .cloned()
        .collect();
    tracing::debug!(input = points.len(), kept = kept.len(), "filtered records");
    kept
}
