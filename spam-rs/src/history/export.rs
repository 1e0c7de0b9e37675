//! CSV export of stored scans and batch reports

use csv::Writer;

use super::types::ScanRecord;
use crate::batch::BatchReport;
use crate::error::{Result, SpamError};
use crate::spam::WordInfluence;

/// Influence entries listed per row of a report export
const TOP_WORDS: usize = 5;

/// Render one scan as a two-line CSV document
pub fn scan_to_csv(scan: &ScanRecord) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Scan ID", "Timestamp", "Prediction", "Confidence", "Email Content"])?;
    let timestamp = scan.timestamp.to_rfc3339();
    let confidence = format!("{:.2}%", scan.result.confidence_percent());
    writer.write_record([
        scan.id.as_str(),
        timestamp.as_str(),
        scan.result.prediction.as_str(),
        confidence.as_str(),
        scan.message.as_str(),
    ])?;
    finish(writer)
}

/// Render a batch report with one row per message
pub fn report_to_csv(report: &BatchReport) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Email", "Prediction", "Confidence (%)", "Top Influential Words"])?;

    for item in &report.results {
        let confidence = format!("{:.2}", item.result.confidence_percent());
        let top_words = format_top_words(item.result.top_words(TOP_WORDS));
        writer.write_record([
            item.full_message.as_str(),
            item.result.prediction.as_str(),
            confidence.as_str(),
            top_words.as_str(),
        ])?;
    }

    finish(writer)
}

/// `word (0.80), other (-0.50)`
pub fn format_top_words(words: &[WordInfluence]) -> String {
    words
        .iter()
        .map(|w| format!("{} ({:.2})", w.term, w.influence))
        .collect::<Vec<_>>()
        .join(", ")
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| SpamError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| SpamError::InvalidInput(e.to_string()))
}
