//! CSV ingestion and export.

pub mod export;
pub mod import;

pub use export::{export_csv, write_csv};
pub use import::{import_csv, read_csv};
