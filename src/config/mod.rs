use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub transport: TransportConfig,
    pub fetch: FetchConfig,
    pub reports: ReportsConfig,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Historical-data fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Worker-pool size for per-month downloads within one symbol.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

/// Report scraping configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportsConfig {
    /// Wall-clock budget for one PDF text extraction.
    #[serde(default = "default_pdf_timeout_secs")]
    pub pdf_timeout_secs: u64,

    /// Cap on extracted PDF text length, in bytes.
    #[serde(default = "default_pdf_max_text_bytes")]
    pub pdf_max_text_bytes: usize,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://dps.psx.com.pk".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "psx-data-reader/0.1 (historical data research)".to_string()
}
fn default_concurrency() -> usize {
    6
}
fn default_pdf_timeout_secs() -> u64 {
    15
}
fn default_pdf_max_text_bytes() -> usize {
    262_144
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("PSX").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|_| AppConfig::default());
        Ok(app_cfg)
    }

    /// URL of the historical-data POST endpoint.
    pub fn history_url(&self) -> String {
        format!("{}/historical", self.transport.base_url.trim_end_matches('/'))
    }

    /// URL of the master symbol-list endpoint.
    pub fn symbols_url(&self) -> String {
        format!("{}/symbols", self.transport.base_url.trim_end_matches('/'))
    }

    /// Announcement/report listing page for one company.
    pub fn company_url(&self, symbol: &str) -> String {
        format!(
            "{}/company/{}",
            self.transport.base_url.trim_end_matches('/'),
            symbol
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig {
                base_url: default_base_url(),
                timeout_secs: default_timeout_secs(),
                user_agent: default_user_agent(),
            },
            fetch: FetchConfig {
                concurrency: default_concurrency(),
            },
            reports: ReportsConfig {
                pdf_timeout_secs: default_pdf_timeout_secs(),
                pdf_max_text_bytes: default_pdf_max_text_bytes(),
            },
        }
    }
}
