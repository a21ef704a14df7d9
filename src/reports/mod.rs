//! Paginated announcement/report scraping.
//!
//! ## Listing modes
//!
//! Standard tabs walk the static announcement pages newest→oldest,
//! following the `next` link until it disappears or an entry falls before
//! the cutoff date. The "Financial Reports" tab is a rendered single-page
//! table of PDF links and never paginates; the cutoff rule is the same.
//! In both modes the cutoff-triggering row is discarded, not included.
//!
//! Content extraction failures never abort a scrape: the entry is kept
//! with empty content and an empty source.

pub mod extract;
pub mod parsers;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ReportsConfig;
use crate::error::Result;
use crate::models::{ReportEntry, ReportSource};
use crate::transport::Transport;

/// Tab served as a rendered PDF-only table rather than paginated
/// announcements.
pub const FINANCIAL_REPORTS_TAB: &str = "Financial Reports";

pub struct ReportScraper {
    transport: Arc<dyn Transport>,
    config: ReportsConfig,
}

impl ReportScraper {
    pub fn new(transport: Arc<dyn Transport>, config: ReportsConfig) -> Self {
        Self { transport, config }
    }

    /// Scrape one company tab, keeping entries dated on or after `cutoff`.
    pub async fn scrape(
        &self,
        company_url: &str,
        tab_name: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<ReportEntry>> {
        let entries = if tab_name == FINANCIAL_REPORTS_TAB {
            self.scrape_financial_reports(company_url, cutoff).await?
        } else {
            self.scrape_announcements(company_url, tab_name, cutoff).await?
        };
        info!("{}: {} entries scraped from {:?}", company_url, entries.len(), tab_name);
        Ok(entries)
    }

    // ── Standard mode ─────────────────────────────────────────────────────────

    async fn scrape_announcements(
        &self,
        company_url: &str,
        tab_name: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<ReportEntry>> {
        let mut results = Vec::new();
        let mut next_url = Some(company_url.to_string());

        while let Some(url) = next_url.take() {
            let html = self.transport.get_text(&url).await?;
            let page = parsers::parse_announcement_page(&html, tab_name);
            debug!("{}: {} rows on page", url, page.rows.len());

            let mut reached_cutoff = false;
            for row in page.rows {
                let when = parsers::parse_report_date(&row.date_text)?;
                if when < cutoff {
                    // The triggering row is discarded along with the rest
                    // of the listing.
                    reached_cutoff = true;
                    break;
                }

                let (content, source) = self
                    .extract_entry(company_url, row.pdf_href.as_deref(), row.view_href.as_deref())
                    .await;
                results.push(ReportEntry { title: row.title, date: when, source, content });
            }

            if reached_cutoff {
                break;
            }
            next_url = page.next_href.map(|h| join_url(company_url, &h));
        }

        Ok(results)
    }

    /// Standard-mode content policy: PDF first, view text as fallback when
    /// the PDF link is missing or its extraction fails, empty otherwise.
    async fn extract_entry(
        &self,
        base: &str,
        pdf_href: Option<&str>,
        view_href: Option<&str>,
    ) -> (String, ReportSource) {
        if let Some(href) = pdf_href {
            let url = join_url(base, href);
            match extract::extract_pdf(self.transport.as_ref(), &url, &self.config).await {
                Ok(text) => return (text, ReportSource::Pdf),
                Err(e) => warn!("PDF extraction failed for {}: {}", url, e),
            }
        }

        if let Some(href) = view_href {
            let url = join_url(base, href);
            match extract::extract_view(self.transport.as_ref(), &url).await {
                Ok(text) => return (text, ReportSource::View),
                Err(e) => warn!("view extraction failed for {}: {}", url, e),
            }
        }

        (String::new(), ReportSource::None)
    }

    // ── Financial-reports mode ────────────────────────────────────────────────

    async fn scrape_financial_reports(
        &self,
        company_url: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<ReportEntry>> {
        let html = self.transport.get_rendered(company_url).await?;
        let rows = parsers::parse_financial_page(&html);
        debug!("{}: {} financial report rows", company_url, rows.len());

        let mut results = Vec::new();
        for row in rows {
            let when = parsers::parse_report_date(&row.date_text)?;
            if when < cutoff {
                break;
            }

            // Linkless rows count for the cutoff but produce no entry.
            let Some((title, href)) = row.link else {
                continue;
            };

            let url = join_url(company_url, &href);
            let (content, source) =
                match extract::extract_pdf(self.transport.as_ref(), &url, &self.config).await {
                    Ok(text) => (text, ReportSource::Pdf),
                    Err(e) => {
                        warn!("PDF extraction failed for {}: {}", url, e);
                        (String::new(), ReportSource::None)
                    }
                };

            results.push(ReportEntry { title, date: when, source, content });
        }

        // This listing provides no pagination links; one page is the whole
        // table.
        Ok(results)
    }
}

/// Resolve a possibly-relative href against the company page URL.
fn join_url(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_hrefs_resolve_against_the_company_page() {
        assert_eq!(
            join_url("https://dps.psx.com.pk/company/OGDC", "/download/q1.pdf"),
            "https://dps.psx.com.pk/download/q1.pdf"
        );
        assert_eq!(
            join_url("https://dps.psx.com.pk/company/OGDC", "https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
    }
}
