use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Ticker ────────────────────────────────────────────────────────────────────

/// One entry of the PSX master symbol list (`/symbols` JSON).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector_name: Option<String>,
    #[serde(default, rename = "isETF")]
    pub is_etf: bool,
    #[serde(default)]
    pub is_debt: bool,
}

// ── Monthly table (raw) ───────────────────────────────────────────────────────

/// One parsed row of the historical table. Date is parsed eagerly; the
/// numeric cells stay raw text until the merge stage coerces them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOhlcvRow {
    pub date: NaiveDate,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

/// The trading table for one (symbol, month) pair. An empty `rows` is a
/// valid result (delisted symbol, no trading days), not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthTable {
    pub rows: Vec<RawOhlcvRow>,
}

impl MonthTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Merged series ─────────────────────────────────────────────────────────────

/// One coerced daily bar. Unparseable numeric text becomes `None` rather
/// than failing the row. Serialized field names carry the canonical
/// title-cased column labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// Date-sorted OHLCV series for one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OhlcvFrame {
    pub bars: Vec<OhlcvBar>,
}

impl OhlcvFrame {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Inclusive window slice, applied after the full merge.
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> OhlcvFrame {
        OhlcvFrame {
            bars: self
                .bars
                .iter()
                .filter(|b| b.date >= start && b.date <= end)
                .cloned()
                .collect(),
        }
    }
}

// ── Multi-symbol result ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFrame {
    pub symbol: String,
    pub frame: OhlcvFrame,
}

/// `Single` for one requested symbol (unkeyed series), `Multi` keyed by
/// symbol in request order otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum StockData {
    Single(OhlcvFrame),
    Multi(Vec<SymbolFrame>),
}

impl StockData {
    /// Total bar count across all contained frames.
    pub fn row_count(&self) -> usize {
        match self {
            StockData::Single(frame) => frame.len(),
            StockData::Multi(frames) => frames.iter().map(|s| s.frame.len()).sum(),
        }
    }
}

// ── Ticker selection ──────────────────────────────────────────────────────────

/// What `stocks` should fetch: one symbol, an explicit list, or the whole
/// non-debt universe.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerSelection {
    One(String),
    Many(Vec<String>),
    All,
}

impl From<&str> for TickerSelection {
    fn from(symbol: &str) -> Self {
        TickerSelection::One(symbol.to_uppercase())
    }
}

impl From<Vec<String>> for TickerSelection {
    fn from(symbols: Vec<String>) -> Self {
        TickerSelection::Many(symbols)
    }
}

// ── Report entries ────────────────────────────────────────────────────────────

/// Where a report entry's content came from. `None` (serialized as `""`)
/// means both PDF and view extraction were unavailable or failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ReportSource {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "View")]
    View,
    #[default]
    #[serde(rename = "")]
    None,
}

/// One scraped announcement or financial report, in listing order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportEntry {
    pub title: String,
    pub date: NaiveDate,
    pub source: ReportSource,
    pub content: String,
}
