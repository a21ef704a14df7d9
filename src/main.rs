use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use psx_data_reader::models::{ReportSource, StockData, TickerSelection};
use psx_data_reader::{AppConfig, PsxReader, storage, utils};

#[derive(Parser)]
#[command(name = "psx-reader", about = "PSX historical data and report scraper", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print the PSX master symbol list
    Tickers,

    /// Download OHLCV data for one or more symbols
    Stocks {
        /// Comma-separated symbols; omit to fetch every non-debt symbol
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Window start (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        start: NaiveDate,

        /// Window end (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        end: NaiveDate,

        /// Write the result as CSV to this path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Scrape company announcements or financial reports
    Reports {
        /// Company symbol, e.g. OGDC
        symbol: String,

        /// Listing tab to scrape
        #[arg(short, long, default_value = "Financial Results")]
        tab: String,

        /// How many years back to keep
        #[arg(short, long, default_value_t = 5)]
        years: u32,

        /// Directory for the JSON archive
        #[arg(long, default_value = ".")]
        save_dir: PathBuf,
    },
}

fn parse_iso_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date {:?}: {}", s, e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "psx_data_reader=info,warn",
        1 => "psx_data_reader=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;
    let reader = PsxReader::new(config)?;

    match cli.command {
        Command::Tickers => {
            let tickers = reader.tickers().await?;
            println!("{} symbols:", utils::fmt_count(tickers.len()));
            for t in &tickers {
                let flags = match (t.is_debt, t.is_etf) {
                    (true, _) => " [debt]",
                    (_, true) => " [etf]",
                    _ => "",
                };
                println!("  {:<12} {}{}", t.symbol, t.name, flags);
            }
        }

        Command::Stocks { symbols, start, end, out } => {
            let _t = utils::Timer::start("stocks download");
            let selection = if symbols.is_empty() {
                TickerSelection::All
            } else if symbols.len() == 1 {
                TickerSelection::One(symbols[0].to_uppercase())
            } else {
                TickerSelection::Many(symbols.iter().map(|s| s.to_uppercase()).collect())
            };

            let data = reader.stocks(&selection, start, end).await?;
            print_stock_summary(&data);

            if let Some(path) = out {
                storage::write_stock_csv(&path, &data)?;
                println!("written to {:?}", path);
            }
        }

        Command::Reports { symbol, tab, years, save_dir } => {
            let _t = utils::Timer::start("report scrape");
            let symbol = symbol.to_uppercase();
            let entries = reader.reports(&symbol, &tab, years, &save_dir).await?;

            let pdf = entries.iter().filter(|e| e.source == ReportSource::Pdf).count();
            let view = entries.iter().filter(|e| e.source == ReportSource::View).count();
            let empty = entries.len() - pdf - view;
            info!(
                "{}: {} entries ({} PDF, {} view, {} empty)",
                symbol,
                entries.len(),
                pdf,
                view,
                empty
            );
            for e in &entries {
                println!("  {}  {:<40}  [{}]", e.date, e.title, source_label(e.source));
            }
        }
    }

    Ok(())
}

fn source_label(source: ReportSource) -> &'static str {
    match source {
        ReportSource::Pdf => "PDF",
        ReportSource::View => "View",
        ReportSource::None => "-",
    }
}

fn print_stock_summary(data: &StockData) {
    match data {
        StockData::Single(frame) => {
            println!("{} rows", utils::fmt_count(frame.len()));
            for bar in frame.bars.iter().take(5) {
                println!(
                    "  {}  O {:<10} H {:<10} L {:<10} C {:<10} V {}",
                    bar.date,
                    fmt_opt(bar.open),
                    fmt_opt(bar.high),
                    fmt_opt(bar.low),
                    fmt_opt(bar.close),
                    fmt_opt(bar.volume),
                );
            }
            if frame.len() > 5 {
                println!("  …");
            }
        }
        StockData::Multi(frames) => {
            println!(
                "{} symbols, {} rows",
                frames.len(),
                utils::fmt_count(data.row_count())
            );
            for sf in frames {
                println!("  {:<12} {} rows", sf.symbol, sf.frame.len());
            }
        }
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "-".to_string())
}
