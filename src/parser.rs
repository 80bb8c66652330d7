use crate::ir::{CalendarSignal, SignalDocument, SignalMonth};
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    Signals(Vec<CalendarSignal>),
    Months { months: Vec<SignalMonth> },
    Month(SignalMonth),
}

/// Parses a signal document. Accepts a bare array of signals, a single
/// `{ name, signals }` month, or `{ months: [...] }`, in JSON or JSON5.
pub fn parse_signals(input: &str) -> Result<SignalDocument> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("signal document is empty"));
    }
    let parsed: DocumentFile = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => json5::from_str(trimmed)
            .map_err(|err| anyhow::anyhow!("invalid signal document: {err}"))?,
    };
    let document = match parsed {
        DocumentFile::Signals(signals) => SignalDocument::single(signals),
        DocumentFile::Months { months } => SignalDocument { months },
        DocumentFile::Month(month) => SignalDocument {
            months: vec![month],
        },
    };
    if document.months.is_empty() {
        return Err(anyhow::anyhow!("signal document has no months"));
    }
    Ok(document)
}
