//! Period-bucketed statistics for civil-registry documents.
//!
//! Documents are bucketed by their registration date (the earliest linked
//! sub-form), folded into per-period counters, and expanded into a dense,
//! gap-free series of report rows for one year or for every year the input
//! spans.
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod period;
pub mod reports;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
pub use period::{period_key, periods_in_year, PeriodKey};
pub use reports::{
    count_classifications, derive_registration_date, detect_year_range, generate_report,
    generate_summary, group_documents, zero_fill, zero_fill_all_years,
};
pub use types::{
    ClassificationCounts, Document, DocumentStatus, FormType, Granularity, ReportGroup, ReportRow,
    ReportSummary, SubForm,
};
