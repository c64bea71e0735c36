use serde::Deserialize;

/// Key that names the fallback destination. Never matched as a keyword.
pub const DEFAULT_KEY: &str = "default";

/// One keyword -> affiliate destination pair.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct KeywordLink {
    pub keyword: String,
    pub url: String,
}

/// Ordered keyword lookup with a guaranteed default destination.
/// Declaration order is scan order: the first keyword found in the text wins.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(from = "RawKeywordTable")]
pub struct KeywordTable {
    default: String,
    keywords: Vec<KeywordLink>,
}

#[derive(Deserialize)]
struct RawKeywordTable {
    default: String,
    #[serde(default)]
    keywords: Vec<KeywordLink>,
}

impl From<RawKeywordTable> for KeywordTable {
    fn from(raw: RawKeywordTable) -> Self {
        Self::new(
            raw.default,
            raw.keywords.into_iter().map(|l| (l.keyword, l.url)),
        )
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new(
            "https://s.shopee.tw/50Rnwvlxuj",
            [
                ("tissue", "https://s.shopee.tw/4q8NkcmbFi"),
                ("clean", "https://s.shopee.tw/4foxYJnEah"),
                ("storage", "https://s.shopee.tw/4VVXM0nrvg"),
                ("kitchen", "https://s.shopee.tw/4LC79hoVGf"),
                ("home", "https://s.shopee.tw/9pX3hrs8IE"),
                ("furniture", "https://s.shopee.tw/9fDdVYsldD"),
            ],
        )
    }
}

impl KeywordTable {
    /// Build a table. Keywords are lower-cased; empty keywords and the
    /// `default` key are dropped since they can never be matched.
    pub fn new<K, U>(default: impl Into<String>, keywords: impl IntoIterator<Item = (K, U)>) -> Self
    where
        K: Into<String>,
        U: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(|(k, u)| KeywordLink {
                keyword: k.into().trim().to_lowercase(),
                url: u.into(),
            })
            .filter(|l| !l.keyword.is_empty() && l.keyword != DEFAULT_KEY)
            .collect();
        Self {
            default: default.into(),
            keywords,
        }
    }

    pub fn default_url(&self) -> &str {
        &self.default
    }

    pub fn keywords(&self) -> &[KeywordLink] {
        &self.keywords
    }

    /// Pick the destination for an entry. See [`resolve`].
    pub fn resolve(&self, title: &str, summary: &str) -> &str {
        resolve(title, summary, self)
    }
}

/// Map an entry's title + summary to an affiliate URL.
///
/// The text is lower-cased and scanned for each keyword as a literal substring,
/// in table order. The first hit wins regardless of where it sits in the text;
/// no hit yields the default URL.
pub fn resolve<'a>(title: &str, summary: &str, table: &'a KeywordTable) -> &'a str {
    let text = format!("{} {}", title, summary).to_lowercase();
    table
        .keywords
        .iter()
        .find(|link| text.contains(link.keyword.as_str()))
        .map_or(table.default.as_str(), |link| link.url.as_str())
}
