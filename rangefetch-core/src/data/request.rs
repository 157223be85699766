//! Export request descriptors.
//!
//! A [`RequestDescriptor`] is everything a transport needs to fetch one
//! sub-range: the symbol, its remote identifier, the dates, the granularity
//! and the formatting switches, already encoded into the export URL.

use super::provider::DataError;
use crate::domain::{DateRange, Granularity, SymbolTable};
use chrono::{Datelike, NaiveDate};
use reqwest::Url;

/// Default export endpoint.
pub const DEFAULT_BASE_URL: &str = "http://export.finam.ru/a";

/// Remote market selector for US equities.
const US_MARKET: &str = "25";

/// Immutable description of one export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    symbol: String,
    identifier: String,
    range: DateRange,
    include_headers: bool,
    file_stem: String,
    url: Url,
}

impl RequestDescriptor {
    /// Encode a request. Pure: no network or filesystem access.
    pub fn new(
        base_url: &Url,
        symbol: &str,
        identifier: &str,
        range: DateRange,
        granularity: Granularity,
        include_headers: bool,
        file_stem: &str,
    ) -> Self {
        let from = range.start();
        let to = range.end();

        let mut url = base_url.clone();
        url.query_pairs_mut()
            .append_pair("market", US_MARKET)
            .append_pair("em", identifier)
            .append_pair("code", &format!("US1.{symbol}"))
            .append_pair("apply", "0")
            .append_pair("df", &from.day().to_string())
            .append_pair("mf", &remote_month(from))
            .append_pair("yf", &from.year().to_string())
            .append_pair("from", "a")
            .append_pair("dt", &to.day().to_string())
            .append_pair("mt", &remote_month(to))
            .append_pair("yt", &to.year().to_string())
            .append_pair("to", "a")
            .append_pair("p", &granularity.period_code().to_string())
            .append_pair("f", file_stem)
            .append_pair("e", ".csv")
            .append_pair("cn", symbol)
            // MM/DD/YY and hh:mm:ss
            .append_pair("dtf", "5")
            .append_pair("tmf", "3")
            // candle times mark the close, in exchange-local time
            .append_pair("MSOR", "1")
            .append_pair("mstimever", "0")
            // comma-separated, no extra record separators
            .append_pair("sep", "1")
            .append_pair("sep2", "1")
            // TICKER, PER, DATE, TIME, OPEN, HIGH, LOW, CLOSE, VOL
            .append_pair("datf", "1")
            .append_pair("at", if include_headers { "1" } else { "0" })
            .append_pair("fsp", "0");

        Self {
            symbol: symbol.to_string(),
            identifier: identifier.to_string(),
            range,
            include_headers,
            file_stem: file_stem.to_string(),
            url,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn include_headers(&self) -> bool {
        self.include_headers
    }

    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Decoded value of one query parameter.
    pub fn param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// The remote numbers months from zero.
fn remote_month(date: NaiveDate) -> String {
    date.month0().to_string()
}

/// Parse the configured endpoint.
pub fn parse_base_url(base_url: &str) -> Result<Url, DataError> {
    Url::parse(base_url)
        .map_err(|e| DataError::Config(format!("invalid base_url '{base_url}': {e}")))
}

/// Build one descriptor per range for `symbol`, oldest first.
///
/// `ranges` is expected newest first, as [`super::partition::partition`]
/// returns it. The symbol is resolved before anything else, so an unknown
/// symbol fails here and never reaches a transport.
pub fn build_requests(
    table: &SymbolTable,
    base_url: &Url,
    symbol: &str,
    ranges: &[DateRange],
    granularity: Granularity,
    include_headers: bool,
) -> Result<Vec<RequestDescriptor>, DataError> {
    let identifier = table.resolve(symbol)?;

    Ok(ranges
        .iter()
        .rev()
        .map(|range| {
            let stem = format!("{symbol}_{}", range.start().format("%y%m%d"));
            RequestDescriptor::new(
                base_url,
                symbol,
                identifier,
                *range,
                granularity,
                include_headers,
                &stem,
            )
        })
        .collect())
}
