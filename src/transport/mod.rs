//! HTTP/browser transport boundary.
//!
//! The scrapers only talk to the [`Transport`] trait so tests can swap in
//! canned pages. [`HttpTransport`] is the production implementation: one
//! `reqwest::Client` (cookies, gzip, fixed timeout) cloned into each
//! concurrent task, plus a headless-browser path for the one listing that
//! needs script execution. No retries at any layer; a failed status
//! surfaces immediately to the caller.

use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use tracing::debug;

use crate::config::TransportConfig;
use crate::error::{Error, Result};

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a page and return its body as text.
    async fn get_text(&self, url: &str) -> Result<String>;

    /// POST a form and return the response body as text.
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String>;

    /// GET a binary resource (PDF download).
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetch a page through a headless browser so scripted content is
    /// present in the returned HTML.
    async fn get_rendered(&self, url: &str) -> Result<String>;
}

// ── reqwest + headless_chrome implementation ─────────────────────────────────

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Transport {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self { client })
    }

    fn check_status(url: &str, status: reqwest::StatusCode) -> Result<()> {
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport { url: url.to_string(), source: e })?;
        Self::check_status(url, resp.status())?;
        resp.text()
            .await
            .map_err(|e| Error::Transport { url: url.to_string(), source: e })
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String> {
        debug!("POST {} ({} fields)", url, form.len());
        let resp = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::Transport { url: url.to_string(), source: e })?;
        Self::check_status(url, resp.status())?;
        resp.text()
            .await
            .map_err(|e| Error::Transport { url: url.to_string(), source: e })
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {} (binary)", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport { url: url.to_string(), source: e })?;
        Self::check_status(url, resp.status())?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport { url: url.to_string(), source: e })?;
        Ok(bytes.to_vec())
    }

    async fn get_rendered(&self, url: &str) -> Result<String> {
        debug!("GET {} (rendered)", url);
        let url = url.to_string();
        // headless_chrome is synchronous; keep it off the async runtime.
        tokio::task::spawn_blocking(move || render_page(&url))
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }
}

fn render_page(url: &str) -> Result<String> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .build()
        .map_err(|e| Error::Render(e.to_string()))?;
    let browser = Browser::new(options).map_err(|e| Error::Render(e.to_string()))?;
    let tab = browser.new_tab().map_err(|e| Error::Render(e.to_string()))?;
    tab.navigate_to(url).map_err(|e| Error::Render(e.to_string()))?;
    tab.wait_until_navigated()
        .map_err(|e| Error::Render(e.to_string()))?;
    tab.get_content().map_err(|e| Error::Render(e.to_string()))
}
