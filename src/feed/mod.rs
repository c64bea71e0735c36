pub mod rss;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::FeedEntry;

/// Source of news entries, newest first.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>>;
}
