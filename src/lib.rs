//! Retrieval client for the PSX data portal: concurrent monthly OHLCV
//! downloads merged into date-sorted series, and paginated company
//! announcement/report scraping with PDF text extraction.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod reports;
pub mod scraper;
pub mod storage;
pub mod transport;
pub mod utils;

pub use self::config::AppConfig;
pub use self::error::{Error, Result};
pub use self::models::{
    OhlcvBar, OhlcvFrame, ReportEntry, ReportSource, StockData, SymbolFrame, Ticker,
    TickerSelection,
};
pub use self::pipeline::PsxReader;
