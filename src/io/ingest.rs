//! CSV loading.
//!
//! Turns a retail export into an in-memory table of string records. No schema
//! checks happen here; column lookup and typing belong to `normalize`.
//!
//! Exports of this kind are ISO-8859-1 (Latin-1) encoded. Every byte of that
//! encoding maps to the Unicode code point with the same value, so decoding is
//! a per-byte widening and cannot fail.

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;

use crate::error::AppError;

/// Raw tabular contents of a CSV file.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: StringRecord,
    pub records: Vec<StringRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Map of normalized header name -> column index.
    pub fn header_map(&self) -> HashMap<String, usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_header_name(name), idx))
            .collect()
    }
}

/// Read a Latin-1 encoded CSV file.
pub fn load_csv(path: &Path) -> Result<RawTable, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::load(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let table = parse_csv(&decode_latin1(&bytes))
        .map_err(|e| AppError::load(format!("Failed to parse CSV '{}': {e}", path.display())))?;

    log::info!("Loaded {} record(s) from {}", table.len(), path.display());
    Ok(table)
}

/// Parse already-decoded CSV text.
pub fn parse_csv(text: &str) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;

    Ok(RawTable { headers, records })
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode text as Latin-1, replacing characters outside the range with `?`.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

pub(crate) fn normalize_header_name(name: &str) -> String {
    // A UTF-8 BOM read as Latin-1 shows up as three leading characters on the
    // first header; left in place it hides the column from lookups.
    let name = name
        .trim()
        .trim_start_matches("\u{ef}\u{bb}\u{bf}")
        .trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_bytes_decode_to_matching_code_points() {
        // "Café" with é as the single byte 0xE9.
        let bytes = [b'C', b'a', b'f', 0xE9];
        assert_eq!(decode_latin1(&bytes), "Café");
        assert_eq!(encode_latin1("Café"), bytes.to_vec());
    }

    #[test]
    fn non_latin1_characters_encode_as_question_mark() {
        assert_eq!(encode_latin1("a€b"), b"a?b".to_vec());
    }

    #[test]
    fn parse_keeps_columns_as_is() {
        let text = "InvoiceNo,StockCode,Quantity\n536365,85123A,6\n536366,22633,oops\n";
        let table = parse_csv(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(&table.records[1][2], "oops");

        let map = table.header_map();
        assert_eq!(map.get("stockcode"), Some(&1));
    }

    #[test]
    fn bom_prefixed_header_is_still_found() {
        let bytes = b"\xEF\xBB\xBFInvoiceNo,Country\n1,France\n";
        let table = parse_csv(&decode_latin1(bytes)).unwrap();
        assert_eq!(table.header_map().get("invoiceno"), Some(&0));
    }

    #[test]
    fn unreadable_file_is_a_load_error() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Load);
    }
}
