//! Delimited-text parsing for uploaded files.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use super::error::ImportError;
use super::row::ImportRow;

/// Upload format inferred from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// Comma (or configured) delimited text.
    Delimited,
    /// Tab-separated text.
    TabSeparated,
}

impl UploadFormat {
    /// Infers the format from the extension.
    ///
    /// # Errors
    ///
    /// Spreadsheet and unknown extensions return `UnsupportedFormat`.
    pub fn from_filename(filename: &str) -> Result<Self, ImportError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Delimited),
            "tsv" | "tab" => Ok(Self::TabSeparated),
            _ => Err(ImportError::UnsupportedFormat(if ext.is_empty() {
                filename.to_string()
            } else {
                ext
            })),
        }
    }
}

/// Parses an uploaded file into rows keyed by header.
///
/// Headers and cells are trimmed, a UTF-8 byte-order mark is dropped, and
/// rows with only blank cells are skipped. Short rows are padded with blank
/// cells.
///
/// # Errors
///
/// Fails on unsupported formats, empty input, a missing header row, or
/// malformed delimited text.
pub fn parse_rows(bytes: &[u8], filename: &str, delimiter: u8) -> Result<Vec<ImportRow>, ImportError> {
    let delimiter = match UploadFormat::from_filename(filename)? {
        UploadFormat::Delimited => delimiter,
        UploadFormat::TabSeparated => b'\t',
    };
    let text = std::str::from_utf8(bytes).map_err(|_| ImportError::InvalidEncoding)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(ImportError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row_number = record
            .position()
            .and_then(|p| usize::try_from(p.line()).ok())
            .unwrap_or(rows.len() + 2);
        let row = ImportRow::new(
            row_number,
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.is_empty())
                .map(|(i, h)| (h.clone(), record.get(i).unwrap_or_default().to_string())),
        );
        if !row.is_blank() {
            rows.push(row);
        }
    }

    debug!(filename, rows = rows.len(), columns = headers.len(), "Parsed upload");
    Ok(rows)
}
