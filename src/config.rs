use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::engine::resolver::KeywordTable;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub article: ArticleConfig,
    #[serde(default)]
    pub links: KeywordTable,
    /// Role-play directives; one is picked at random per run. Empty disables personas.
    #[serde(default)]
    pub personas: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub url: String,
    #[serde(default = "default_feed_timeout")]
    pub request_timeout_ms: u64,
}

fn default_feed_timeout() -> u64 { 15_000 }

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://lifehacker.com/rss".to_string(),
            request_timeout_ms: default_feed_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub api_base: String,
    pub model: String,
    #[serde(default = "default_model_timeout")]
    pub request_timeout_ms: u64,
    pub temperature: Option<f32>,
}

fn default_model_timeout() -> u64 { 60_000 }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            request_timeout_ms: default_model_timeout(),
            temperature: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    pub base_url: String,
    pub width: u32,
    pub height: u32,
    pub model: String,
    /// Visual-style qualifiers appended to the title in the image prompt.
    pub style: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://image.pollinations.ai/prompt".to_string(),
            width: 1024,
            height: 600,
            model: "flux".to_string(),
            style: ["modern interior design", "cozy home", "bright lighting", "8k"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    #[serde(default = "default_mail_timeout")]
    pub timeout_ms: u64,
}

fn default_mail_timeout() -> u64 { 30_000 }

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            timeout_ms: default_mail_timeout(),
        }
    }
}

/// Wording the generated article must follow.
#[derive(Debug, Deserialize, Clone)]
pub struct ArticleConfig {
    pub language: String,
    pub genre: String,
    /// Phrases the generated title must contain one of.
    pub seo_phrases: Vec<String>,
    /// Category used when the model omits one, and for fallback articles.
    pub default_category: String,
    pub promo_text: String,
    pub button_text: String,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            language: "Traditional Chinese (zh-TW)".to_string(),
            genre: "life wisdom / home storage tips".to_string(),
            seo_phrases: ["收納技巧", "生活智慧", "清潔妙招", "租屋族必看", "好物推薦"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_category: "生活智慧".to_string(),
            promo_text: "💡 租屋族/收納控必備好物 (點此查看)".to_string(),
            button_text: "🏠 質感生活好物 (蝦皮優惠)".to_string(),
        }
    }
}

/// Credentials and addresses supplied by the environment.
#[derive(Clone)]
pub struct Secrets {
    pub model_api_key: String,
    pub mail_user: String,
    pub mail_password: String,
    pub publish_address: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("mail_user", &self.mail_user)
            .field("publish_address", &self.publish_address)
            .finish_non_exhaustive()
    }
}

impl Secrets {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve every secret through `lookup`, failing on the first missing one.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            match lookup(key).map(|v| sanitize_key(&v)) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => anyhow::bail!("missing required environment variable {}", key),
            }
        };
        Ok(Self {
            model_api_key: required("GOOGLE_API_KEY")?,
            mail_user: required("GMAIL_USER")?,
            mail_password: required("GMAIL_APP_PASSWORD")?,
            publish_address: required("BLOGGER_EMAIL")?,
        })
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let content = match std::fs::read_to_string(Path::new(ENV_FILE)) {
            Ok(c) => c,
            Err(_) => return,
        };
        for (key, value) in parse_env_lines(&content) {
            if std::env::var(&key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(content: &str) -> Vec<(String, String)> {
    // Strip BOM if present (common on Windows-created files)
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

/// Strip carriage returns, BOM, and other invisible chars from a secret value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}
