//! Guarded content extraction for report entries.
//!
//! The PDF path runs `pdf_extract` on a blocking worker bounded by a
//! wall-clock deadline; some PDFs hang the parser indefinitely. On expiry
//! the worker handle is aborted and a `PdfTimeout` is returned. The abort
//! is best-effort: it bounds the caller's wait, not necessarily the parse
//! itself, which may still run to completion on the blocking pool.

use std::time::Duration;

use scraper::Html;

use crate::config::ReportsConfig;
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::utils::collapse_ws;

/// Download a PDF and extract its text within the configured budget.
pub async fn extract_pdf(
    transport: &dyn Transport,
    url: &str,
    config: &ReportsConfig,
) -> Result<String> {
    let bytes = transport.get_bytes(url).await?;
    let deadline = Duration::from_secs(config.pdf_timeout_secs);

    let parsed = blocking_with_deadline(deadline, move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| Error::Extraction(e.to_string()))
    })
    .await;

    match parsed {
        Some(result) => Ok(truncate_to_budget(result?, config.pdf_max_text_bytes)),
        None => Err(Error::PdfTimeout {
            url: url.to_string(),
            timeout_secs: config.pdf_timeout_secs,
        }),
    }
}

/// Fetch a plain HTML page and return its visible text, whitespace
/// collapsed. Bounded only by the transport timeout.
pub async fn extract_view(transport: &dyn Transport, url: &str) -> Result<String> {
    let html = transport.get_text(url).await?;
    Ok(page_text(&html))
}

/// Strip markup from an HTML document and collapse whitespace.
pub fn page_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let joined = doc.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_ws(&joined)
}

/// Run blocking `work` on a worker task, waiting at most `deadline`.
/// `None` means the deadline expired; the worker was told to abort.
async fn blocking_with_deadline<T, F>(deadline: Duration, work: F) -> Option<Result<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let mut handle = tokio::task::spawn_blocking(work);
    match tokio::time::timeout(deadline, &mut handle).await {
        Ok(joined) => Some(joined.unwrap_or_else(|e| Err(Error::Task(e.to_string())))),
        Err(_) => {
            handle.abort();
            None
        }
    }
}

fn truncate_to_budget(mut text: String, budget: usize) -> String {
    if text.len() > budget {
        let mut end = budget;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}
