//! Split uploads into individual messages

use csv::ReaderBuilder;
use tracing::debug;

use super::types::UploadFormat;
use crate::error::{Result, SpamError};

/// Header names recognised as the message column, in priority order
const MESSAGE_COLUMNS: [&str; 4] = ["message", "text", "content", "email"];

/// Extract non-empty messages from an upload
pub fn parse_messages(content: &str, format: UploadFormat) -> Result<Vec<String>> {
    match format {
        UploadFormat::Text => Ok(parse_lines(content)),
        UploadFormat::Csv => parse_csv(content),
    }
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_csv(content: &str) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let column = message_column(headers.iter())
        .ok_or_else(|| SpamError::InvalidInput("no suitable column found for messages".to_string()))?;
    debug!("Using CSV column {} ('{}') for messages", column, &headers[column]);

    let mut messages = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(cell) = record.get(column) {
            if !cell.trim().is_empty() {
                messages.push(cell.to_string());
            }
        }
    }

    Ok(messages)
}

/// Index of the message column: a known name first, else the first
/// column that is not the label.
fn message_column<'a>(headers: impl Iterator<Item = &'a str>) -> Option<usize> {
    let normalized: Vec<String> = headers.map(|h| h.trim().to_ascii_lowercase()).collect();

    MESSAGE_COLUMNS
        .iter()
        .find_map(|name| normalized.iter().position(|h| h == name))
        .or_else(|| normalized.iter().position(|h| h != "label"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_skips_blank_lines() {
        let content = "first message\n\n   \n  second message  \r\nthird\n";
        let messages = parse_messages(content, UploadFormat::Text).unwrap();
        assert_eq!(messages, vec!["first message", "second message", "third"]);
    }

    #[test]
    fn test_csv_prefers_known_column() {
        let content = "label,Text\nspam,Win a FREE prize\nham,\"Meeting moved, see agenda\"\n";
        let messages = parse_messages(content, UploadFormat::Csv).unwrap();
        assert_eq!(messages, vec!["Win a FREE prize", "Meeting moved, see agenda"]);
    }

    #[test]
    fn test_csv_message_beats_email_column() {
        let content = "email,message\nbob@example.com,hello there\n";
        let messages = parse_messages(content, UploadFormat::Csv).unwrap();
        assert_eq!(messages, vec!["hello there"]);
    }

    #[test]
    fn test_csv_falls_back_to_first_non_label_column() {
        let content = "label,body,extra\nham,see you soon,x\nspam,cash now,y\n";
        let messages = parse_messages(content, UploadFormat::Csv).unwrap();
        assert_eq!(messages, vec!["see you soon", "cash now"]);
    }

    #[test]
    fn test_csv_skips_short_and_empty_rows() {
        let content = "label,message\nham\nspam,\nham,kept\n";
        let messages = parse_messages(content, UploadFormat::Csv).unwrap();
        assert_eq!(messages, vec!["kept"]);
    }

    #[test]
    fn test_csv_only_label_column_is_error() {
        let content = "label\nspam\n";
        let result = parse_messages(content, UploadFormat::Csv);
        assert!(matches!(result, Err(SpamError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_upload_has_no_messages() {
        assert!(parse_messages("", UploadFormat::Csv).unwrap().is_empty());
        assert!(parse_messages("\n\n", UploadFormat::Text).unwrap().is_empty());
    }
}
