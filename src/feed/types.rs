/// One feed item as the pipeline sees it. Provider-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedEntry {
    pub title: String,
    /// Empty when the feed has no summary for this item.
    pub summary: String,
}

impl FeedEntry {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }
}
