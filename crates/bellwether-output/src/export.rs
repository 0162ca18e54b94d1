//! CSV and JSON export of date-indexed tables.

use bellwether_frame::{ColumnData, DATE_COLUMN, Frame};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(ExportError::InvalidFormat(path.display().to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Borrowed view of a table for export.
///
/// The date index is written first under the `date` column, then every column
/// in table order.
#[derive(Debug, Clone, Copy)]
pub struct FrameExport<'a> {
    frame: &'a Frame,
}

impl<'a> FrameExport<'a> {
    /// Wrap a table for export.
    pub const fn new(frame: &'a Frame) -> Self {
        Self { frame }
    }

    fn to_csv(self) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        let mut header = vec![DATE_COLUMN];
        header.extend(self.frame.column_names());
        wtr.write_record(&header)?;

        for (row, date) in self.frame.index().iter().enumerate() {
            let mut record = Vec::with_capacity(header.len());
            record.push(date.format("%Y-%m-%d").to_string());
            record.extend(
                self.frame
                    .columns()
                    .iter()
                    .map(|c| c.data().render(row).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }

        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
    }

    fn to_records(self) -> Vec<Value> {
        self.frame
            .index()
            .iter()
            .enumerate()
            .map(|(row, date)| {
                let mut record = Map::new();
                record.insert(
                    DATE_COLUMN.to_string(),
                    Value::String(date.format("%Y-%m-%d").to_string()),
                );
                for column in self.frame.columns() {
                    let cell = match column.data() {
                        ColumnData::Numeric(values) => values[row].map_or(Value::Null, Value::from),
                        ColumnData::Text(values) => {
                            values[row].clone().map_or(Value::Null, Value::String)
                        }
                    };
                    record.insert(column.name().to_string(), cell);
                }
                Value::Object(record)
            })
            .collect()
    }
}

impl Exporter for FrameExport<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Json => Ok(serde_json::to_string(&self.to_records())?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(&self.to_records())?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bellwether_frame::Column;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn sample() -> Frame {
        let index = vec![
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        ];
        Frame::new(index)
            .unwrap()
            .with_column(Column::numeric("close", vec![Some(101.5), Some(99.0)]))
            .unwrap()
            .with_column(Column::numeric("volatility", vec![None, Some(0.25)]))
            .unwrap()
            .with_column(Column::text(
                "risk_category",
                vec![Some("Low Risk".to_string()), None],
            ))
            .unwrap()
    }

    #[test]
    fn test_frame_export_csv() {
        let frame = sample();
        let csv = FrameExport::new(&frame)
            .export_to_string(ExportFormat::Csv)
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,close,volatility,risk_category");
        assert_eq!(lines[1], "2024-01-02,101.5,,Low Risk");
        assert_eq!(lines[2], "2024-01-03,99,0.25,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_frame_export_json() {
        let frame = sample();
        let json = FrameExport::new(&frame)
            .export_to_string(ExportFormat::Json)
            .unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["date"], "2024-01-02");
        assert_eq!(parsed[0]["close"], 101.5);
        assert!(parsed[0]["volatility"].is_null());
        assert_eq!(parsed[0]["risk_category"], "Low Risk");
        assert!(parsed[1]["risk_category"].is_null());
    }

    #[test]
    fn test_frame_export_pretty_json() {
        let frame = sample();
        let json = FrameExport::new(&frame)
            .export_to_string(ExportFormat::PrettyJson)
            .unwrap();
        assert!(json.contains("  ")); // Indentation indicates pretty format
        assert!(json.contains("\"volatility\": null"));
    }

    #[test]
    fn test_empty_frame_exports_header_only() {
        let frame = Frame::new(vec![])
            .unwrap()
            .with_column(Column::numeric("close", vec![]))
            .unwrap();
        let csv = FrameExport::new(&frame)
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert_eq!(csv.trim_end(), "date,close");
        assert_eq!(
            FrameExport::new(&frame)
                .export_to_string(ExportFormat::Json)
                .unwrap(),
            "[]"
        );
    }

    #[rstest]
    #[case(ExportFormat::Csv, "csv")]
    #[case(ExportFormat::Json, "json")]
    #[case(ExportFormat::PrettyJson, "json")]
    fn test_export_format_extension(#[case] format: ExportFormat, #[case] extension: &str) {
        assert_eq!(format.extension(), extension);
    }

    #[rstest]
    #[case("out/scores.CSV", Some(ExportFormat::Csv))]
    #[case("scores.json", Some(ExportFormat::Json))]
    #[case("scores.parquet", None)]
    #[case("scores", None)]
    fn test_export_format_from_path(#[case] path: &str, #[case] expected: Option<ExportFormat>) {
        assert_eq!(ExportFormat::from_path(Path::new(path)).ok(), expected);
    }
}
