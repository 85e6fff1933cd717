//! Detection aggregation and spreadsheet export.
//!
//! The same detections are reduced two ways depending on where they go:
//! - [`StatisticalSummary`] for the on-screen per-class summary
//! - [`LastWriteWins`] for the exported spreadsheet rows

pub mod aggregate;
pub mod error;
pub mod export;

pub use aggregate::{
    AggregationStrategy, ClassSummary, DisplaySummary, ExportValues, LastWriteWins, PartValues,
    StatisticalSummary, PLACEHOLDER,
};
pub use error::{ReportError, ReportResult};
pub use export::{
    build_rows, export, export_file_name, export_on, ExportArtifact, ExportCell, ExportRow,
    HEADERS, SHEET_NAME,
};
