pub mod email;

use anyhow::Result;
use async_trait::async_trait;

/// The assembled article handed to the blog inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub category: String,
    /// Image fragment followed by the article body.
    pub html: String,
}

impl Post {
    /// `"{title} #{category}"` so the blog platform tags the post by category.
    pub fn subject(&self) -> String {
        format!("{} #{}", self.title, self.category)
    }
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, post: &Post) -> Result<()>;
}
