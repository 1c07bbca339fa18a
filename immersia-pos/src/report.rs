//! Report Aggregator
//!
//! Pre-aggregated summary and transaction list for a date range, plus the
//! spreadsheet export and the printable record table.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use immersia_client::{ApiClient, EXPORT_CONTENT_TYPE, HttpClient};
use shared::models::{ReportSummary, TransactionRecord};

use crate::error::{PosError, PosResult, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive report range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse the two date inputs; `None` until both are filled in
    pub fn from_inputs(start: &str, end: &str) -> Result<Option<Self>, ValidationError> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::new(parse_date(start)?, parse_date(end)?)))
    }

    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// `Report_<start>_to_<end>.xlsx`
    pub fn export_file_name(&self) -> String {
        format!("Report_{}_to_{}.xlsx", self.start_param(), self.end_param())
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// What the report screen renders
///
/// The two halves load independently; a failed half keeps its error and an
/// empty default while the other still renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportView {
    pub summary: ReportSummary,
    pub records: Vec<TransactionRecord>,
    pub summary_error: Option<String>,
    pub records_error: Option<String>,
}

/// Fetch summary and records concurrently
pub async fn load_report<H: HttpClient>(api: &ApiClient<H>, range: &DateRange) -> ReportView {
    let (start, end) = (range.start_param(), range.end_param());
    let (summary, records) = tokio::join!(
        api.report_summary(&start, &end),
        api.transactions(&start, &end)
    );

    let mut view = ReportView::default();
    match summary {
        Ok(summary) => view.summary = summary,
        Err(e) => {
            tracing::error!(%start, %end, "Error fetching report summary: {}", e);
            view.summary_error = Some(PosError::from(e).user_message());
        }
    }
    match records {
        Ok(records) => view.records = records,
        Err(e) => {
            tracing::error!(%start, %end, "Error fetching transaction records: {}", e);
            view.records_error = Some(PosError::from(e).user_message());
        }
    }
    view
}

/// Downloaded spreadsheet, opaque to this crate
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedReport {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedReport {
    /// Write into `dir` under the report's file name
    pub fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), size = self.bytes.len(), "Report exported");
        Ok(path)
    }
}

pub async fn export_report<H: HttpClient>(
    api: &ApiClient<H>,
    range: &DateRange,
) -> PosResult<ExportedReport> {
    let bytes = api
        .export_report(&range.start_param(), &range.end_param())
        .await
        .map_err(|e| {
            tracing::error!("Error exporting records: {}", e);
            PosError::from(e)
        })?;
    Ok(ExportedReport {
        file_name: range.export_file_name(),
        content_type: EXPORT_CONTENT_TYPE,
        bytes,
    })
}

/// Standalone HTML page with only the transaction table
pub fn print_document(records: &[TransactionRecord]) -> String {
    let mut html = String::from("<html><head><title>Report</title></head><body>");
    html.push_str("<table id=\"report-table\"><thead><tr>");
    for heading in ["ID", "Title", "Quantity", "Total Amount", "Customer", "Date"] {
        let _ = write!(html, "<th>{heading}</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for record in records {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(record.id.as_str()),
            escape_html(&record.title),
            record.quantity,
            record.total_amount,
            escape_html(&record.customer_name),
            escape_html(&record.date),
        );
    }
    html.push_str("</tbody></table></body></html>");
    html
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Report screen state: selected range plus the last load
#[derive(Debug)]
pub struct ReportAggregator<H: HttpClient> {
    api: ApiClient<H>,
    range: Option<DateRange>,
    view: ReportView,
}

impl<H: HttpClient> ReportAggregator<H> {
    pub fn new(api: ApiClient<H>) -> Self {
        Self {
            api,
            range: None,
            view: ReportView::default(),
        }
    }

    /// Update the date inputs; loads only once both are present
    ///
    /// Returns whether a load happened. Incomplete inputs forget the previous
    /// range, so export follows what the inputs show.
    pub async fn select_range(&mut self, start: &str, end: &str) -> Result<bool, ValidationError> {
        let Some(range) = DateRange::from_inputs(start, end)? else {
            self.range = None;
            return Ok(false);
        };
        self.view = load_report(&self.api, &range).await;
        self.range = Some(range);
        Ok(true)
    }

    pub fn range(&self) -> Option<&DateRange> {
        self.range.as_ref()
    }

    pub fn view(&self) -> &ReportView {
        &self.view
    }

    pub async fn export(&self) -> PosResult<ExportedReport> {
        let range = self.range.ok_or(ValidationError::Required("Date range"))?;
        export_report(&self.api, &range).await
    }

    pub fn print(&self) -> String {
        print_document(&self.view.records)
    }
}
