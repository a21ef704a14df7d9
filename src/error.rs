use chrono::NaiveDate;

/// Errors surfaced by the library.
///
/// Fetch-side failures (`Transport`, `HttpStatus`, `Parse`) are fatal for
/// the call that produced them. Extraction-side failures (`Extraction`,
/// `PdfTimeout`, `Render`) are caught at the report-entry level and
/// degrade to an empty-content entry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("end date {end} is earlier than start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("unparseable date {value:?} in table row")]
    Parse { value: String },

    #[error("content extraction failed: {0}")]
    Extraction(String),

    #[error("PDF parse timed out after {timeout_secs}s for {url}")]
    PdfTimeout { url: String, timeout_secs: u64 },

    #[error("page render failed: {0}")]
    Render(String),

    #[error("worker task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
