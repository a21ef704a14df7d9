use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};
use crate::scraper::parsers::cell_text;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

// ── Standard announcement pages ───────────────────────────────────────────────

/// One announcement row before content extraction. Hrefs are as found in
/// the markup, possibly relative.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementRow {
    pub title: String,
    pub date_text: String,
    pub pdf_href: Option<String>,
    pub view_href: Option<String>,
}

/// One parsed listing page: rows in markup order plus the pagination href.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementPage {
    pub rows: Vec<AnnouncementRow>,
    pub next_href: Option<String>,
}

/// Extract announcement rows from a listing page.
///
/// The tab's row container is located by the id derived from the tab name
/// with spaces removed ("Financial Results" → `#FinancialResults`),
/// falling back to the whole document. Rows lacking either a `.title` or
/// a `.date` element are skipped.
pub fn parse_announcement_page(html: &str, tab_name: &str) -> AnnouncementPage {
    let doc = Html::parse_document(html);
    let tab_id = tab_name.replace(' ', "");

    let tr_sel = selector("tr");
    let title_sel = selector(".title");
    let date_sel = selector(".date");
    let pdf_sel = selector("a.pdf");
    let view_sel = selector("a.view");
    let next_sel = selector("a.next");

    let container = Selector::parse(&format!("#{}", tab_id))
        .ok()
        .and_then(|sel| doc.select(&sel).next());

    let mut page = AnnouncementPage::default();

    let rows: Vec<ElementRef> = match container {
        Some(el) => el.select(&tr_sel).collect(),
        None => doc.select(&tr_sel).collect(),
    };

    for tr in rows {
        let title = tr.select(&title_sel).next().map(cell_text);
        let date_text = tr.select(&date_sel).next().map(cell_text);
        let (Some(title), Some(date_text)) = (title, date_text) else {
            continue;
        };

        page.rows.push(AnnouncementRow {
            title,
            date_text,
            pdf_href: href(tr.select(&pdf_sel).next()),
            view_href: href(tr.select(&view_sel).next()),
        });
    }

    page.next_href = match container {
        Some(el) => href(el.select(&next_sel).next()),
        None => href(doc.select(&next_sel).next()),
    };

    page
}

// ── Financial-reports table ───────────────────────────────────────────────────

/// One row of the rendered financial-reports table. `link` is the first
/// anchor of the first cell (title, href) when present; the third cell is
/// the comparison date either way.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialReportRow {
    pub date_text: String,
    pub link: Option<(String, String)>,
}

/// Extract rows from the rendered financial-reports page. The container
/// is `#reports`, falling back to the whole document; rows with fewer
/// than three cells are dropped.
pub fn parse_financial_page(html: &str) -> Vec<FinancialReportRow> {
    let doc = Html::parse_document(html);

    let tr_sel = selector("tbody tr");
    let td_sel = selector("td");
    let a_sel = selector("a");
    let container_sel = selector("#reports");

    let container = doc.select(&container_sel).next();
    let rows: Vec<ElementRef> = match container {
        Some(el) => el.select(&tr_sel).collect(),
        None => doc.select(&tr_sel).collect(),
    };

    let mut out = Vec::new();
    for tr in rows {
        let cells: Vec<ElementRef> = tr.select(&td_sel).collect();
        if cells.len() < 3 {
            continue;
        }

        let link = cells[0]
            .select(&a_sel)
            .next()
            .and_then(|a| a.value().attr("href").map(|h| (cell_text(a), h.to_string())));

        out.push(FinancialReportRow {
            date_text: cell_text(cells[2]),
            link,
        });
    }
    out
}

fn href(el: Option<ElementRef>) -> Option<String> {
    el.and_then(|a| a.value().attr("href")).map(|h| h.to_string())
}

// ── Listing dates ─────────────────────────────────────────────────────────────

/// Formats seen across the announcement listings.
const LISTING_DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parse a listing date cell, trying the known formats in order. Failure
/// is fatal to the scrape, matching the historical-table contract.
pub fn parse_report_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    for format in LISTING_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }
    Err(Error::Parse { value: text.to_string() })
}
