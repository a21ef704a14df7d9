//! Orchestrator: ties transport → scraper → merge → storage together.
//!
//! `stocks` processes symbols one at a time; parallelism is confined to
//! the month fan-out inside each symbol so total concurrent transport
//! load stays bounded by the configured pool size. `reports` scrapes one
//! company tab, persists the JSON archive, and returns the entries.

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{ReportEntry, StockData, SymbolFrame, Ticker, TickerSelection};
use crate::reports::ReportScraper;
use crate::scraper::{DpsScraper, cleaner, dates};
use crate::storage;
use crate::transport::{HttpTransport, Transport};

pub struct PsxReader {
    config: AppConfig,
    scraper: DpsScraper,
    report_scraper: ReportScraper,
}

impl PsxReader {
    /// Reader over the production HTTP transport.
    pub fn new(config: AppConfig) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.transport)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Reader over a caller-supplied transport.
    pub fn with_transport(config: AppConfig, transport: Arc<dyn Transport>) -> Self {
        let scraper = DpsScraper::new(Arc::clone(&transport), &config);
        let report_scraper = ReportScraper::new(transport, config.reports.clone());
        Self { config, scraper, report_scraper }
    }

    /// PSX master symbol list.
    pub async fn tickers(&self) -> Result<Vec<Ticker>> {
        self.scraper.fetch_tickers().await
    }

    /// OHLCV series for the selected symbols over `[start, end]`.
    ///
    /// One requested symbol returns the unkeyed series; more than one
    /// returns a result keyed by symbol in request order. A failed month
    /// fetch aborts the whole call with no partial output.
    pub async fn stocks(
        &self,
        selection: &TickerSelection,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<StockData> {
        let anchors = dates::month_anchors(start, end)?;
        let symbols = self.resolve_symbols(selection).await?;

        let mut frames = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let tables = self.scraper.fetch_history(&symbol, &anchors).await?;
            let non_empty = tables.iter().filter(|t| !t.is_empty()).count();
            let frame = cleaner::merge_months(tables).slice(start, end);
            info!(
                "{}: {} rows fetched ({} months non-empty)",
                symbol,
                frame.len(),
                non_empty
            );
            frames.push(SymbolFrame { symbol, frame });
        }

        if frames.len() == 1 {
            Ok(StockData::Single(frames.remove(0).frame))
        } else {
            Ok(StockData::Multi(frames))
        }
    }

    /// Scrape one company tab back `years` years, write the JSON archive
    /// under `save_dir`, and return the entries.
    pub async fn reports(
        &self,
        symbol: &str,
        tab_name: &str,
        years: u32,
        save_dir: &Path,
    ) -> Result<Vec<ReportEntry>> {
        let cutoff = dates::years_ago(Utc::now().date_naive(), years);
        let entries = self
            .report_scraper
            .scrape(&self.config.company_url(symbol), tab_name, cutoff)
            .await?;
        storage::save_reports(save_dir, symbol, tab_name, &entries)?;
        Ok(entries)
    }

    async fn resolve_symbols(&self, selection: &TickerSelection) -> Result<Vec<String>> {
        match selection {
            TickerSelection::One(symbol) => Ok(vec![symbol.clone()]),
            TickerSelection::Many(symbols) => Ok(symbols.clone()),
            TickerSelection::All => {
                let universe = self.tickers().await?;
                let symbols: Vec<String> = universe
                    .into_iter()
                    .filter(|t| !t.is_debt)
                    .map(|t| t.symbol)
                    .collect();
                info!("{} non-debt symbols resolved from master list", symbols.len());
                Ok(symbols)
            }
        }
    }
}
