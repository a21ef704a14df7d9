use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{MonthTable, RawOhlcvRow};

/// Date format used by the historical table ("Feb 5, 2024").
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// Header labels accepted for the date column. Older pages label it TIME;
/// both resolve to the canonical `Date`.
const DATE_HEADER_ALIASES: &[&str] = &["Date", "TIME"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Text content of one element, trimmed.
pub fn cell_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Historical table ──────────────────────────────────────────────────────────

/// Parse one month's historical table HTML into typed rows.
///
/// Cells are read positionally as {Date, Open, High, Low, Close, Volume};
/// numeric cells stay raw text for the merge stage. Zero data rows is a
/// valid empty table. A malformed date cell fails the whole parse.
pub fn parse_month_table(html: &str) -> Result<MonthTable> {
    let doc = Html::parse_document(html);
    let tr_sel = selector("tr");
    let td_sel = selector("td");

    check_date_header(&doc);

    let mut rows = Vec::new();
    for tr in doc.select(&tr_sel) {
        let cells: Vec<String> = tr.select(&td_sel).map(cell_text).collect();
        // Header and separator rows carry no td cells.
        if cells.is_empty() {
            continue;
        }

        let date = NaiveDate::parse_from_str(&cells[0], DATE_FORMAT)
            .map_err(|_| Error::Parse { value: cells[0].clone() })?;

        rows.push(RawOhlcvRow {
            date,
            open: cell(&cells, 1),
            high: cell(&cells, 2),
            low: cell(&cells, 3),
            close: cell(&cells, 4),
            volume: cell(&cells, 5),
        });
    }

    Ok(MonthTable { rows })
}

fn cell(cells: &[String], idx: usize) -> String {
    cells.get(idx).cloned().unwrap_or_default()
}

/// The date column label drifts between `Date` and the legacy `TIME`.
/// Parsing is positional either way; anything outside the alias table is
/// worth a warning.
fn check_date_header(doc: &Html) {
    let th_sel = selector("th");
    if let Some(th) = doc.select(&th_sel).next() {
        let label = cell_text(th);
        if !label.is_empty()
            && !DATE_HEADER_ALIASES
                .iter()
                .any(|a| a.eq_ignore_ascii_case(&label))
        {
            warn!("unrecognized date column header {:?}", label);
        }
    }
}
