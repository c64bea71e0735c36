use super::types::FeedEntry;
use super::NewsFeed;
use crate::config::FeedConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("rss-affiliate/", env!("CARGO_PKG_VERSION"));

/// RSS/Atom feed fetched over HTTP.
pub struct RssFeed {
    client: Client,
    url: String,
}

impl RssFeed {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build feed HTTP client")?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

/// Parse an RSS/Atom document, keeping the feed's own item order.
pub fn parse_entries(bytes: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = feed_rs::parser::parse(bytes).context("failed to parse RSS/Atom feed")?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            // Summary falls back to the full content body when a feed only ships that.
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();
            FeedEntry {
                title: title.trim().to_string(),
                summary: summary.trim().to_string(),
            }
        })
        .collect();

    Ok(entries)
}

#[async_trait]
impl NewsFeed for RssFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        let resp = self
            .client
            .get(&self.url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .context("feed request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("feed {} returned {}", self.url, status);
        }

        let bytes = resp.bytes().await.context("failed to read feed body")?;
        let entries = parse_entries(&bytes)?;
        tracing::info!(url = %self.url, entries = entries.len(), "feed fetched");
        Ok(entries)
    }
}
