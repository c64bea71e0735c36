use serde::Deserialize;
use thiserror::Error;

/// A generated article: blog category plus HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub category: String,
    pub html_body: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("reply contains no JSON object span")]
    NoJsonSpan,
    #[error("reply JSON is invalid: {0}")]
    InvalidJson(String),
}

#[derive(Deserialize)]
struct ArticleReply {
    category: Option<String>,
    #[serde(default)]
    html_body: String,
}

/// Remove the ```json / ``` fences models like to wrap JSON in.
pub fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_string()
}

/// Slice from the first `{` to the last `}` inclusive, dropping any commentary around it.
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Best-effort parse of a model reply into an article.
///
/// A missing or blank `category` becomes `default_category`. A missing
/// `html_body` parses as empty; callers decide what an empty body means.
pub fn extract_article(reply: &str, default_category: &str) -> Result<GenerationResult, ExtractError> {
    let cleaned = strip_code_fences(reply);
    let span = json_span(&cleaned).ok_or(ExtractError::NoJsonSpan)?;
    let parsed: ArticleReply =
        serde_json::from_str(span).map_err(|e| ExtractError::InvalidJson(e.to_string()))?;

    let category = parsed
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default_category.to_string());

    Ok(GenerationResult {
        category,
        html_body: parsed.html_body,
    })
}

/// Model-independent article: the raw summary plus a plain link to the destination.
pub fn fallback_article(summary: &str, destination: &str, category: &str, link_text: &str) -> GenerationResult {
    let mut html_body = String::new();
    if !summary.trim().is_empty() {
        html_body.push_str(&format!("<p>{}</p>", summary));
    }
    html_body.push_str(&format!(r#"<p><a href="{}">{}</a></p>"#, destination, link_text));
    GenerationResult {
        category: category.to_string(),
        html_body,
    }
}
