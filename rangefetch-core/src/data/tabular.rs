//! Delimited text in and out.
//!
//! Parsing is positional: when the response carries a header row it is
//! skipped, and every remaining record is read in [`Bar::HEADER`] order.

use super::provider::{DataError, FetchError};
use crate::domain::{Bar, Dataset};

/// Parse an export response body.
///
/// An empty body parses to an empty dataset. Anything that is not a
/// well-formed nine-column record (an HTML error page, a throttling notice)
/// is a [`FetchError::Parse`]. When `has_headers` is set, the first line must
/// be exactly [`Bar::HEADER`].
pub fn parse_export(body: &str, has_headers: bool) -> Result<Dataset, FetchError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    if has_headers {
        let header = rdr
            .headers()
            .map_err(|e| FetchError::Parse(format!("header row: {e}")))?;
        if !header.is_empty() && !header.iter().eq(Bar::HEADER) {
            let line = header.iter().collect::<Vec<_>>().join(",");
            return Err(FetchError::Parse(format!("unexpected header row: {line}")));
        }
    }

    let mut bars = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| FetchError::Parse(e.to_string()))?;
        let bar: Bar = record
            .deserialize(None)
            .map_err(|e| FetchError::Parse(format!("record {line}: {e}")))?;
        bars.push(bar);
    }
    Ok(Dataset::new(bars))
}

/// Render a dataset as CSV with the header row, even when it holds no rows.
pub fn write_csv(dataset: &Dataset) -> Result<Vec<u8>, DataError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record(Bar::HEADER)
        .map_err(|e| DataError::Storage(format!("csv header: {e}")))?;
    for bar in dataset.bars() {
        wtr.serialize(bar)
            .map_err(|e| DataError::Storage(format!("csv row: {e}")))?;
    }

    wtr.into_inner()
        .map_err(|e| DataError::Storage(format!("failed to flush CSV writer: {e}")))
}
