//! CSV parsing for batch import into the lookup store
//!
//! Expected shape: a header row with at least two columns, then one entry per
//! data row with the barcode in the first field and the associated text in
//! the second. Trailing whitespace is stripped from both fields.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::storage::LookupEntry;

/// Read lookup entries from a CSV file.
///
/// A file whose header has fewer than two columns is malformed and fails the
/// whole import. Data rows with an empty barcode are skipped.
pub fn read_entries(path: &Path) -> Result<Vec<LookupEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open CSV file {:?}", path))?;

    let headers = reader.headers().context("failed to read CSV header")?;
    if headers.len() < 2 {
        bail!(
            "CSV header has {} column(s), expected at least 2 (barcode, text)",
            headers.len()
        );
    }

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to read CSV row")?;
        if record.len() < 2 {
            bail!("CSV row {:?} is missing the text column", record);
        }
        let barcode = record[0].trim_end();
        let text = record[1].trim_end();
        if barcode.is_empty() {
            continue;
        }
        entries.push(LookupEntry::new(barcode, text));
    }

    Ok(entries)
}
