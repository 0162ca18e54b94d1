//! Integration tests for exporting tables and summaries to disk.

use bellwether_frame::{Column, Frame};
use bellwether_output::{AnomalySummary, ExportFormat, Exporter, FrameExport, RunSummary};
use chrono::NaiveDate;
use std::path::PathBuf;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("bellwether-output-{}-{}", std::process::id(), name))
}

fn labeled_prices() -> Frame {
    let index = (1..=4)
        .map(|d| NaiveDate::from_ymd_opt(2023, 2, d).unwrap())
        .collect();
    Frame::new(index)
        .unwrap()
        .with_column(Column::numeric(
            "close",
            vec![Some(100.0), Some(102.0), Some(150.0), Some(99.0)],
        ))
        .unwrap()
        .with_column(Column::numeric(
            "anomaly",
            vec![None, Some(1.0), Some(-1.0), Some(1.0)],
        ))
        .unwrap()
}

#[test]
fn test_export_frame_to_csv_file() {
    let frame = labeled_prices();
    let path = scratch_path("prices.csv");

    FrameExport::new(&frame)
        .export_to_file(&path, ExportFormat::from_path(&path).unwrap())
        .unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["date", "close", "anomaly"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), frame.height());
    assert_eq!(&rows[0][2], "");
    assert_eq!(&rows[2][2], "-1");

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_export_summary_to_json_file() {
    let frame = labeled_prices();
    let summary = RunSummary::new("anomalies", &frame).with_anomalies(AnomalySummary {
        labeled: 3,
        dates: vec![NaiveDate::from_ymd_opt(2023, 2, 3).unwrap()],
    });
    let path = scratch_path("summary.json");

    summary.export_to_file(&path, ExportFormat::PrettyJson).unwrap();

    let restored: RunSummary =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(restored, summary);

    std::fs::remove_file(&path).unwrap();
}
