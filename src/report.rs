use chrono::{SecondsFormat, TimeZone, Utc};
use ethers::utils::to_checksum;
use log::info;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::InvestorsError;
use crate::types::{InvestorBook, InvestorSummary};
use crate::utils::wei_to_ether_string;

pub const HEADER: [&str; 4] = ["Address", "First payment at", "Invested ETH", "Received tokens"];

/// Where the finished report goes. Without a path the report is printed to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportSink {
    #[default]
    Stdout,
    File(PathBuf),
}

impl ReportSink {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => ReportSink::File(path),
            None => ReportSink::Stdout,
        }
    }

    /// Writes the whole report in one go. A file target is written to a sibling
    /// `.partial` file and renamed into place, so it is never left truncated.
    pub fn publish(&self, contents: &[u8]) -> Result<(), InvestorsError> {
        match self {
            ReportSink::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(contents)?;
                handle.flush()?;
            }
            ReportSink::File(path) => {
                let partial = partial_path(path);
                if let Err(e) = write_and_rename(&partial, path, contents) {
                    let _ = fs::remove_file(&partial);
                    return Err(e.into());
                }
                info!("Report written to {}", path.display());
            }
        }
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn write_and_rename(partial: &Path, target: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(partial)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(partial, target)
}

pub fn format_timestamp(timestamp: u64) -> Result<String, InvestorsError> {
    let seconds = i64::try_from(timestamp).map_err(|_| InvestorsError::InvalidTimestamp(timestamp))?;
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
        .ok_or(InvestorsError::InvalidTimestamp(timestamp))
}

pub fn report_row(summary: &InvestorSummary) -> Result<[String; 4], InvestorsError> {
    Ok([
        to_checksum(&summary.address, None),
        format_timestamp(summary.first_payment_at)?,
        wei_to_ether_string(summary.invested_wei),
        summary.tokens.to_string(),
    ])
}

/// Renders the book as CSV into memory, header first, rows in book order.
pub fn render_report(book: &InvestorBook) -> Result<Vec<u8>, InvestorsError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for summary in book {
        writer.write_record(report_row(summary)?)?;
    }
    writer
        .into_inner()
        .map_err(|e| InvestorsError::Io(e.into_error()))
}

pub fn write_report(book: &InvestorBook, sink: &ReportSink) -> Result<(), InvestorsError> {
    let contents = render_report(book)?;
    sink.publish(&contents)
}
