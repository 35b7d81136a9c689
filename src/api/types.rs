//! API query and response types.

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsReport;
use crate::config::validate_filter;
use crate::data::{DataSummary, FilterOptions};

/// Filter query parameters accepted by every endpoint.
///
/// `months` and `hours` are comma-separated lists, e.g. `months=6,7,8`.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub months: Option<String>,
    pub hours: Option<String>,
    pub weekdays_only: Option<bool>,
    pub weekends_only: Option<bool>,
}

fn parse_list(name: &str, value: Option<&str>) -> Result<Vec<u32>, String> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| format!("`{name}` must be a comma-separated list of integers"))
        })
        .collect()
}

impl FilterQuery {
    /// Converts query parameters into validated filter options.
    ///
    /// # Errors
    ///
    /// Returns a message if a list is unparseable or a value is out of range.
    pub fn into_options(self) -> Result<FilterOptions, String> {
        let options = FilterOptions {
            months: parse_list("months", self.months.as_deref())?,
            hours: parse_list("hours", self.hours.as_deref())?,
            start_date: self.start_date,
            end_date: self.end_date,
            weekdays_only: self.weekdays_only.unwrap_or(false),
            weekends_only: self.weekends_only.unwrap_or(false),
        };
        let errors = validate_filter(&options);
        match errors.first() {
            Some(e) => Err(e.to_string()),
            None => Ok(options),
        }
    }
}

/// Summary plus analytics for the filtered records.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub summary: DataSummary,
    pub analytics: AnalyticsReport,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_parsed() {
        let q = FilterQuery {
            months: Some("6, 7,8".to_string()),
            hours: Some("17,18".to_string()),
            weekdays_only: Some(true),
            ..FilterQuery::default()
        };
        let opts = q.into_options().expect("query should parse");
        assert_eq!(opts.months, vec![6, 7, 8]);
        assert_eq!(opts.hours, vec![17, 18]);
        assert!(opts.weekdays_only);
        assert!(!opts.weekends_only);
    }

    #[test]
    fn empty_query_has_no_predicates() {
        let opts = FilterQuery::default().into_options().expect("empty query");
        assert!(opts.is_empty());
    }

    #[test]
    fn bad_list_is_rejected() {
        let q = FilterQuery {
            months: Some("june".to_string()),
            ..FilterQuery::default()
        };
        assert!(q.into_options().is_err());
    }

    #[test]
    fn out_of_range_hour_is_rejected() {
        let q = FilterQuery {
            hours: Some("25".to_string()),
            ..FilterQuery::default()
        };
        let err = q.into_options().expect_err("must fail");
        assert!(err.contains("filter.hours"));
    }
}
