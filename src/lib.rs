//! Solar production and household demand analysis.
//!
//! Hourly records are derived into grid flows, filtered, aggregated by day,
//! month and hour of day, summarized, and fed to the advanced analytics
//! (cost savings, emissions, self-sufficiency, storage potential and peak
//! shaving).

pub mod analytics;
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod sample;
