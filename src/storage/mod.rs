//! On-disk outputs: report JSON archives and OHLCV CSV exports.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::models::{OhlcvBar, ReportEntry, StockData};

/// Canonical column header for OHLCV exports.
const FRAME_HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Write scraped report entries as a pretty-printed UTF-8 JSON array at
/// `{save_dir}/{symbol}_{tab_with_underscores}_reports.json`, creating the
/// directory if absent. Returns the written path.
pub fn save_reports(
    save_dir: &Path,
    symbol: &str,
    tab_name: &str,
    entries: &[ReportEntry],
) -> Result<PathBuf> {
    fs::create_dir_all(save_dir)?;
    let path = save_dir.join(format!(
        "{}_{}_reports.json",
        symbol,
        tab_name.replace(' ', "_")
    ));
    fs::write(&path, serde_json::to_string_pretty(entries)?)?;
    info!("{} entries saved to {:?}", entries.len(), path);
    Ok(path)
}

/// Export fetched OHLCV data as CSV. Multi-symbol results get a leading
/// `Ticker` column; missing numeric values export as empty cells.
pub fn write_stock_csv(path: &Path, data: &StockData) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    match data {
        StockData::Single(frame) => {
            wtr.write_record(FRAME_HEADER)?;
            for bar in &frame.bars {
                wtr.write_record(bar_record(bar, None))?;
            }
        }
        StockData::Multi(frames) => {
            wtr.write_record(std::iter::once("Ticker").chain(FRAME_HEADER))?;
            for sf in frames {
                for bar in &sf.frame.bars {
                    wtr.write_record(bar_record(bar, Some(&sf.symbol)))?;
                }
            }
        }
    }

    wtr.flush()?;
    info!("{} rows exported to {:?}", data.row_count(), path);
    Ok(())
}

fn bar_record(bar: &OhlcvBar, symbol: Option<&str>) -> Vec<String> {
    let mut record = Vec::with_capacity(7);
    if let Some(symbol) = symbol {
        record.push(symbol.to_string());
    }
    record.push(bar.date.to_string());
    for value in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
        record.push(value.map(|v| v.to_string()).unwrap_or_default());
    }
    record
}
