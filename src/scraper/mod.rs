pub mod cleaner;
pub mod dates;
pub mod parsers;

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::models::{MonthTable, Ticker};
use crate::transport::Transport;

// ── dps.psx.com.pk scraper ────────────────────────────────────────────────────

pub struct DpsScraper {
    transport: Arc<dyn Transport>,
    history_url: String,
    symbols_url: String,
    concurrency: usize,
}

impl DpsScraper {
    pub fn new(transport: Arc<dyn Transport>, config: &AppConfig) -> Self {
        Self {
            transport,
            history_url: config.history_url(),
            symbols_url: config.symbols_url(),
            concurrency: config.fetch.concurrency.max(1),
        }
    }

    /// PSX master symbol list.
    pub async fn fetch_tickers(&self) -> Result<Vec<Ticker>> {
        let body = self.transport.get_text(&self.symbols_url).await?;
        let tickers: Vec<Ticker> = serde_json::from_str(&body)?;
        info!("{} symbols in master list", tickers.len());
        Ok(tickers)
    }

    /// Fetch and parse one month table per anchor, fanned out across a
    /// bounded worker pool. Tables come back in completion order, not
    /// anchor order; the merge stage re-sorts.
    ///
    /// A failed month is a hard failure for the whole symbol: the first
    /// task error is returned and dropping the set aborts the remaining
    /// wait. An empty table from a valid response is not an error.
    pub async fn fetch_history(
        &self,
        symbol: &str,
        anchors: &[NaiveDate],
    ) -> Result<Vec<MonthTable>> {
        let sem = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks: JoinSet<Result<MonthTable>> = JoinSet::new();

        for &anchor in anchors {
            let transport = Arc::clone(&self.transport);
            let sem = Arc::clone(&sem);
            let url = self.history_url.clone();
            let symbol = symbol.to_string();

            tasks.spawn(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Task(e.to_string()))?;
                fetch_month(transport.as_ref(), &url, &symbol, anchor).await
            });
        }

        let total = anchors.len();
        let mut tables = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            let table = joined.map_err(|e| Error::Task(e.to_string()))??;
            tables.push(table);
            debug!("{}: {}/{} months downloaded", symbol, tables.len(), total);
        }
        Ok(tables)
    }
}

/// One month's POST + parse. The transport handle is passed in explicitly
/// so every worker task owns its session context.
async fn fetch_month(
    transport: &dyn Transport,
    url: &str,
    symbol: &str,
    anchor: NaiveDate,
) -> Result<MonthTable> {
    let form = vec![
        ("month".to_string(), anchor.month().to_string()),
        ("year".to_string(), anchor.year().to_string()),
        ("symbol".to_string(), symbol.to_string()),
    ];
    let html = transport.post_form(url, &form).await?;
    parsers::parse_month_table(&html)
}
