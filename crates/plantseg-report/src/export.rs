//! Spreadsheet export of a batch report.
//!
//! One workbook with a single sheet: a fixed ten-column header followed by
//! one row per image, in batch order. Rows use [`LastWriteWins`], so an image
//! with several detections of a class exports the last one. Failed images
//! export the default row; error text never reaches the sheet.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use plantseg_models::{BatchReport, ImageResult, PlantPart};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info};

use crate::aggregate::{AggregationStrategy, LastWriteWins, PLACEHOLDER};
use crate::error::ReportResult;

/// Worksheet name.
pub const SHEET_NAME: &str = "Сводная таблица";

/// File name prefix; the export date and extension are appended.
pub const FILE_BASE_NAME: &str = "PlantSeg_Сводка";

/// Header row, in column order.
pub const HEADERS: [&str; 10] = [
    "Название файла",
    "Точность листьев (%)",
    "Точность стебля (%)",
    "Точность корня (%)",
    "Длина листьев (см)",
    "Длина стебля (см)",
    "Длина корня (см)",
    "Площадь листьев (см²)",
    "Площадь стебля (см²)",
    "Площадь корня (см²)",
];

const FILE_NAME_COLUMN_WIDTH: f64 = 28.0;
const VALUE_COLUMN_WIDTH: f64 = 18.0;

/// Number format for values shown with exactly one decimal, e.g. `70.0`.
const ONE_DECIMAL_FORMAT: &str = "0.0";

/// One spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    Number(f64),
    /// Number displayed with one decimal place
    Decimal(f64),
    Text(String),
    Empty,
}

impl ExportCell {
    fn write(
        &self,
        sheet: &mut Worksheet,
        row: u32,
        col: u16,
        decimal_format: &Format,
    ) -> ReportResult<()> {
        match self {
            ExportCell::Number(n) => {
                sheet.write_number(row, col, *n)?;
            }
            ExportCell::Decimal(n) => {
                sheet.write_number_with_format(row, col, *n, decimal_format)?;
            }
            ExportCell::Text(s) => {
                sheet.write_string(row, col, s)?;
            }
            ExportCell::Empty => {}
        }
        Ok(())
    }
}

/// One data row: file name followed by nine per-class values.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub file_name: String,
    pub cells: Vec<ExportCell>,
}

impl ExportRow {
    /// Build the row for one image.
    pub fn from_result(result: &ImageResult) -> Self {
        let values = LastWriteWins.aggregate(&result.detections);

        let confidences = PlantPart::ALL
            .iter()
            .map(|p| ExportCell::Decimal(values.get(*p).confidence_percent()));
        let lengths = PlantPart::ALL.iter().map(|p| match values.get(*p).length {
            Some(length) => ExportCell::Number(length),
            None => ExportCell::Text(PLACEHOLDER.to_string()),
        });
        let areas = PlantPart::ALL.iter().map(|p| match values.get(*p).area {
            Some(area) => ExportCell::Number(area),
            None => ExportCell::Empty,
        });

        Self {
            file_name: result.file_name.clone(),
            cells: confidences.chain(lengths).chain(areas).collect(),
        }
    }
}

/// Build data rows for every image in the report, in order.
pub fn build_rows(report: &BatchReport) -> Vec<ExportRow> {
    report.iter().map(ExportRow::from_result).collect()
}

/// Export file name for the given date, e.g. `PlantSeg_Сводка_2026-01-31.xlsx`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}_{}.xlsx", FILE_BASE_NAME, date.format("%Y-%m-%d"))
}

/// In-memory workbook ready to be saved.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Save the workbook into `dir` under its export file name.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> ReportResult<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "Report saved");
        Ok(path)
    }
}

/// Export the report stamped with today's UTC date.
///
/// Returns `Ok(None)` without building anything when no image has a
/// detection.
pub fn export(report: &BatchReport) -> ReportResult<Option<ExportArtifact>> {
    export_on(report, Utc::now().date_naive())
}

/// Export the report stamped with `date`.
pub fn export_on(report: &BatchReport, date: NaiveDate) -> ReportResult<Option<ExportArtifact>> {
    if !report.has_detections() {
        debug!("No detections in report, skipping export");
        return Ok(None);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    let decimal_format = Format::new().set_num_format(ONE_DECIMAL_FORMAT);
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    sheet.set_column_width(0, FILE_NAME_COLUMN_WIDTH)?;
    for col in 1..HEADERS.len() as u16 {
        sheet.set_column_width(col, VALUE_COLUMN_WIDTH)?;
    }

    let rows = build_rows(report);
    for (i, row) in rows.iter().enumerate() {
        let row_idx = i as u32 + 1;
        sheet.write_string(row_idx, 0, &row.file_name)?;
        for (j, cell) in row.cells.iter().enumerate() {
            cell.write(sheet, row_idx, j as u16 + 1, &decimal_format)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(rows = rows.len(), bytes = bytes.len(), "Workbook built");

    Ok(Some(ExportArtifact {
        file_name: export_file_name(date),
        bytes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantseg_models::Detection;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn sample_report() -> BatchReport {
        BatchReport::new(vec![
            ImageResult::success(
                "rucola_01.png",
                vec![
                    Detection::new("leaf", 0.91).with_area(4.5),
                    Detection::new("root", 0.9).with_area(2.0).with_length(5.0),
                    Detection::new("root", 0.7).with_area(3.0),
                ],
            ),
            ImageResult::failure("broken.jpg", "Request failed with status code 500"),
            ImageResult::success("empty.png", vec![]),
        ])
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name(date()), "PlantSeg_Сводка_2026-03-14.xlsx");
    }

    #[test]
    fn test_rows_follow_report_order() {
        let rows = build_rows(&sample_report());
        let names: Vec<_> = rows.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, ["rucola_01.png", "broken.jpg", "empty.png"]);
        assert!(rows.iter().all(|r| r.cells.len() == HEADERS.len() - 1));
    }

    #[test]
    fn test_row_values_last_write_wins() {
        let rows = build_rows(&sample_report());
        let cells = &rows[0].cells;

        // confidence: leaf, stem, root
        assert_eq!(cells[0], ExportCell::Decimal(91.0));
        assert_eq!(cells[1], ExportCell::Decimal(0.0));
        assert_eq!(cells[2], ExportCell::Decimal(70.0));
        // length: leaf, stem, root
        assert_eq!(cells[3], ExportCell::Text(PLACEHOLDER.to_string()));
        assert_eq!(cells[5], ExportCell::Number(5.0));
        // area: leaf, stem, root
        assert_eq!(cells[6], ExportCell::Number(4.5));
        assert_eq!(cells[7], ExportCell::Number(0.0));
        assert_eq!(cells[8], ExportCell::Number(3.0));
    }

    #[test]
    fn test_failed_image_exports_defaults() {
        let rows = build_rows(&sample_report());
        let failed = &rows[1];
        assert!(failed.cells[..3].iter().all(|c| *c == ExportCell::Decimal(0.0)));
        assert!(failed.cells[3..6]
            .iter()
            .all(|c| *c == ExportCell::Text(PLACEHOLDER.to_string())));
        assert!(failed.cells[6..].iter().all(|c| *c == ExportCell::Number(0.0)));
    }

    #[test]
    fn test_export_builds_workbook() {
        let artifact = export_on(&sample_report(), date())
            .unwrap()
            .expect("report has detections");
        assert_eq!(artifact.file_name, "PlantSeg_Сводка_2026-03-14.xlsx");
        // xlsx is a zip container
        assert_eq!(&artifact.bytes[..2], b"PK");
    }

    #[test]
    fn test_export_skips_without_detections() {
        let report = BatchReport::new(vec![
            ImageResult::failure("a.png", "timeout"),
            ImageResult::success("b.png", vec![]),
        ]);
        assert!(export_on(&report, date()).unwrap().is_none());
        assert!(export_on(&BatchReport::default(), date()).unwrap().is_none());
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = export_on(&sample_report(), date()).unwrap().unwrap();

        let path = artifact.write_to_dir(dir.path().join("reports")).unwrap();
        assert!(path.ends_with("PlantSeg_Сводка_2026-03-14.xlsx"));
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    }
}
