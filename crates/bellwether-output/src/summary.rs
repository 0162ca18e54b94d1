//! Run summaries for the terminal.
//!
//! A [`RunSummary`] condenses a result table into a handful of figures: the
//! period covered, per-column statistics, and optionally the anomaly and risk
//! readings a pipeline produced.

use crate::{ExportError, ExportFormat, Exporter};
use bellwether_frame::Frame;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Statistics for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnSummary {
    /// Column name
    pub name: String,

    /// Number of defined cells
    pub defined: usize,

    /// Smallest defined value
    pub min: Option<f64>,

    /// Largest defined value
    pub max: Option<f64>,

    /// Last defined value
    pub latest: Option<f64>,
}

impl ColumnSummary {
    fn from_values(name: &str, values: &[Option<f64>]) -> Self {
        let defined: Vec<f64> = values.iter().flatten().copied().collect();
        Self {
            name: name.to_string(),
            defined: defined.len(),
            min: defined.iter().copied().reduce(f64::min),
            max: defined.iter().copied().reduce(f64::max),
            latest: defined.last().copied(),
        }
    }
}

/// Anomaly detection outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalySummary {
    /// Rows that received a label
    pub labeled: usize,

    /// Dates labeled anomalous
    pub dates: Vec<NaiveDate>,
}

impl AnomalySummary {
    /// Number of anomalous rows
    pub fn count(&self) -> usize {
        self.dates.len()
    }

    /// Share of labeled rows flagged as anomalous
    pub fn rate(&self) -> f64 {
        if self.labeled == 0 {
            return 0.0;
        }
        self.dates.len() as f64 / self.labeled as f64
    }
}

/// Latest risk reading and the category mix over the period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskSnapshot {
    /// Date of the latest score
    pub date: NaiveDate,

    /// Latest risk score
    pub score: f64,

    /// Category of the latest score
    pub category: String,

    /// Rows per category
    pub category_counts: BTreeMap<String, usize>,
}

/// Summary of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Run name, e.g. the subcommand
    pub name: String,

    /// First date of the table
    pub period_start: Option<NaiveDate>,

    /// Last date of the table
    pub period_end: Option<NaiveDate>,

    /// Row count
    pub rows: usize,

    /// Statistics per numeric column
    pub columns: Vec<ColumnSummary>,

    /// Anomaly outcome, for detection runs
    pub anomalies: Option<AnomalySummary>,

    /// Risk reading, for risk runs
    pub risk: Option<RiskSnapshot>,
}

impl RunSummary {
    /// Summarize the numeric columns of `frame`.
    pub fn new(name: impl Into<String>, frame: &Frame) -> Self {
        let columns = frame
            .numeric_column_names()
            .into_iter()
            .filter_map(|n| {
                frame
                    .numeric(n)
                    .ok()
                    .map(|values| ColumnSummary::from_values(n, values))
            })
            .collect();

        Self {
            name: name.into(),
            period_start: frame.index().first().copied(),
            period_end: frame.index().last().copied(),
            rows: frame.height(),
            columns,
            anomalies: None,
            risk: None,
        }
    }

    /// Attach an anomaly outcome.
    pub fn with_anomalies(mut self, anomalies: AnomalySummary) -> Self {
        self.anomalies = Some(anomalies);
        self
    }

    /// Attach a risk reading.
    pub fn with_risk(mut self, risk: RiskSnapshot) -> Self {
        self.risk = Some(risk);
        self
    }

    /// Statistics for a column, if it was summarized
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nRun Summary: {}\n", self.name));
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => {
                output.push_str(&format!("Period: {} to {} ({} rows)\n", start, end, self.rows));
            }
            _ => output.push_str("Period: empty\n"),
        }
        output.push_str(&"=".repeat(72));
        output.push('\n');

        if !self.columns.is_empty() {
            output.push_str(&format!(
                "{:<24} {:>8} {:>12} {:>12} {:>12}\n",
                "Column", "Defined", "Min", "Max", "Latest"
            ));
            output.push_str(&"-".repeat(72));
            output.push('\n');
            for column in &self.columns {
                output.push_str(&format!(
                    "{:<24} {:>8} {:>12} {:>12} {:>12}\n",
                    column.name,
                    column.defined,
                    format_cell(column.min),
                    format_cell(column.max),
                    format_cell(column.latest)
                ));
            }
        }

        if let Some(anomalies) = &self.anomalies {
            output.push_str("\nAnomalies:\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            output.push_str(&format!(
                "  Flagged:                {} of {} labeled rows ({:.1}%)\n",
                anomalies.count(),
                anomalies.labeled,
                anomalies.rate() * 100.0
            ));
            for date in &anomalies.dates {
                output.push_str(&format!("  - {}\n", date));
            }
        }

        if let Some(risk) = &self.risk {
            output.push_str("\nMarket Risk:\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            output.push_str(&format!(
                "  Latest ({}):      {:.2} ({})\n",
                risk.date, risk.score, risk.category
            ));
            for (category, count) in &risk.category_counts {
                output.push_str(&format!("  {:<24}{}\n", format!("{}:", category), count));
            }
        }

        output.push_str(&"=".repeat(72));
        output.push('\n');

        output
    }
}

fn format_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} rows", self.name, self.rows)?;
        if let (Some(start), Some(end)) = (self.period_start, self.period_end) {
            write!(f, " ({} to {})", start, end)?;
        }
        if let Some(anomalies) = &self.anomalies {
            write!(f, ", {} anomalies", anomalies.count())?;
        }
        if let Some(risk) = &self.risk {
            write!(f, ", latest risk {:.2} ({})", risk.score, risk.category)?;
        }
        Ok(())
    }
}

impl Exporter for RunSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for column in &self.columns {
                    wtr.serialize(column)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
