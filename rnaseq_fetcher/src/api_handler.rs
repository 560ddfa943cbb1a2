// src/api_handler.rs

use std::error::Error;
use std::time::Duration;

use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, REFERER};
use tracing::{error, info};

use crate::config::{QueryConfig, SessionConfig};

/// Where raw gene payloads come from. `None` means nothing could be retrieved.
pub trait RecordSource {
    fn fetch(&self, gene: &str, tag: &str) -> Option<String>;
}

/// Blocking HTTP session against the expression database.
///
/// The server only serves `user/{gene}.{tag}` after a search for that gene
/// has run in the same session, so every fetch is preceded by a pre-search.
pub struct APIHandler {
    client: Client,
    base_url: String,
    presearch_timeout: Duration,
    fetch_timeout: Duration,
}

impl APIHandler {
    pub fn new(config: &QueryConfig, session: &SessionConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &session.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("invalid header name {name:?}"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("invalid value for header {name}"))?;
            headers.insert(name, value);
        }
        if !session.cookies.is_empty() {
            headers.insert(COOKIE, HeaderValue::from_str(&session.cookie_header())?);
        }
        // Host is derived from the request URL; Referer follows the database unless overridden.
        if !headers.contains_key(REFERER) {
            let referer = HeaderValue::from_str(&config.db_url)
                .with_context(|| format!("invalid database url {:?}", config.db_url))?;
            headers.insert(REFERER, referer);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("request session initialization failed")?;

        let mut base_url = config.db_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            presearch_timeout: Duration::from_secs(config.presearch_timeout_secs),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        })
    }

    /// Simulate a manual search in the browser so the server caches the gene for this session.
    pub fn pre_search(&self, gene: &str) -> Result<(), Box<dyn Error>> {
        info!("Pre-search for gene {} is started (1/4)", gene);
        let url = format!("{}Search.php", self.base_url);
        let query = format!("{}/0/max////", gene);
        let response = self
            .client
            .get(&url)
            .query(&[("query", query.as_str())])
            .timeout(self.presearch_timeout)
            .send()?;

        if !response.status().is_success() {
            return Err(format!(
                "pre-search for gene {} failed. Status: {}",
                gene,
                response.status()
            )
            .into());
        }
        info!("Pre-search for gene {} is finished (1/4)", gene);
        Ok(())
    }

    pub fn fetch_gene_data(&self, gene: &str, tag: &str) -> Result<String, Box<dyn Error>> {
        info!("Fetching process for gene {} is started (2/4)", gene);
        let url = format!("{}user/{}.{}", self.base_url, gene, tag);
        let response = self.client.get(&url).timeout(self.fetch_timeout).send()?;

        if !response.status().is_success() {
            return Err(format!(
                "data for gene {} cannot be found at {}. Status: {}",
                gene,
                url,
                response.status()
            )
            .into());
        }
        let bytes = response.bytes()?;
        let content = String::from_utf8(bytes.to_vec())?;
        info!("Fetching process for gene {} is finished (2/4)", gene);
        Ok(content)
    }
}

impl RecordSource for APIHandler {
    fn fetch(&self, gene: &str, tag: &str) -> Option<String> {
        let result = self
            .pre_search(gene)
            .and_then(|_| self.fetch_gene_data(gene, tag));
        match result {
            Ok(content) => Some(content),
            Err(e) => {
                error!("Error occurred when fetching data for gene {}: {}", gene, e);
                None
            }
        }
    }
}
