use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{GpRecord, LpRecord};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Flush(String),

    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Registration table being exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportEntity {
    Gp,
    Lp,
}

impl ExportEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportEntity::Gp => "gp",
            ExportEntity::Lp => "lp",
        }
    }
}

impl FromStr for ExportEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gp" => Ok(ExportEntity::Gp),
            "lp" => Ok(ExportEntity::Lp),
            other => Err(format!("unknown export entity: {}", other)),
        }
    }
}

/// A record with a fixed column layout
pub trait CsvRow {
    const HEADER: &'static [&'static str];

    /// Field values in `HEADER` order
    fn fields(&self) -> Vec<String>;
}

impl CsvRow for GpRecord {
    const HEADER: &'static [&'static str] = &[
        "Name",
        "Email",
        "Firm",
        "AUM",
        "Strategies",
        "Fund In Market",
        "Approval",
        "Created At",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.firm.clone(),
            self.aum_bracket.clone(),
            self.strategies.join("; "),
            self.fund_in_market.clone().unwrap_or_default(),
            self.approval.to_string(),
            format_timestamp(self.created_at),
        ]
    }
}

impl CsvRow for LpRecord {
    const HEADER: &'static [&'static str] = &[
        "Name",
        "Email",
        "Organization",
        "Investor Type",
        "Interests",
        "Jurisdiction",
        "Stage",
        "Approval",
        "Created At",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.organization.clone(),
            self.investor_type.clone().unwrap_or_default(),
            self.interests.join("; "),
            self.jurisdiction.clone().unwrap_or_default(),
            self.stage.to_string(),
            self.approval.to_string(),
            format_timestamp(self.created_at),
        ]
    }
}

fn format_timestamp(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map(|t| t.to_rfc3339()).unwrap_or_default()
}

/// Header row, then one comma-joined row per record
///
/// Fields are written verbatim: no quoting and no escaping. A value that
/// contains a comma or newline corrupts its row.
pub fn export_csv<R: CsvRow>(rows: &[R]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(R::HEADER)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// `<entity>-registrations-<YYYY-MM-DD>.csv`
pub fn export_filename(entity: ExportEntity, date: NaiveDate) -> String {
    format!("{}-registrations-{}.csv", entity.as_str(), date.format("%Y-%m-%d"))
}
