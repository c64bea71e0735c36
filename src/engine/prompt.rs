use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::ArticleConfig;

/// Everything the model is asked to do for one entry. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub title: String,
    pub summary: String,
    pub destination: String,
    pub persona: Option<String>,
    pub prompt: String,
}

/// Pick one persona uniformly at random. `None` when the pool is empty.
pub fn choose_persona<'a, R: Rng + ?Sized>(pool: &'a [String], rng: &mut R) -> Option<&'a str> {
    pool.choose(rng).map(String::as_str)
}

/// The closing call-to-action button. The model is told to end with exactly this.
pub fn cta_button(destination: &str, label: &str) -> String {
    format!(
        r#"<br><div style="text-align:center;margin:30px;"><a href="{}" style="background:#ee4d2d;color:white;padding:15px 30px;text-decoration:none;border-radius:50px;font-weight:bold;">{}</a></div>"#,
        destination, label
    )
}

pub fn build_prompt(
    title: &str,
    summary: &str,
    destination: &str,
    persona: Option<&str>,
    article: &ArticleConfig,
) -> GenerationRequest {
    let mut prompt = String::new();

    if let Some(persona) = persona {
        prompt.push_str(&format!("Role: write as {}. Stay in this voice throughout.\n\n", persona));
    }

    prompt.push_str(&format!(
        "Task: rewrite the news item below into a {} article written in {}.\n\n",
        article.genre, article.language
    ));
    prompt.push_str(&format!("[News title] {}\n[News summary] {}\n\n", title, summary));

    prompt.push_str("[Title SEO rules]\n");
    prompt.push_str(&format!(
        "1. The article title MUST contain one of: {}.\n",
        article.seo_phrases.join(", ")
    ));
    prompt.push_str(&format!(
        "2. Example title: \"{}? These 3 tricks make your home feel twice as big\".\n\n",
        title
    ));

    prompt.push_str("[Body structure]\n");
    prompt.push_str("1. Opening: describe the everyday frustration (a messy home, an inconvenience).\n");
    prompt.push_str("2. Solution: explain the technique from the news item.\n");
    prompt.push_str(&format!(
        "3. Mid-article promotion: after the second paragraph insert the sentence \"{}\" as a hyperlink to {}.\n",
        article.promo_text, destination
    ));
    prompt.push_str("4. How-to: a short list of simple steps.\n");
    prompt.push_str("5. Closing: encourage the reader to try it today.\n\n");

    prompt.push_str("[Output format]\n");
    prompt.push_str(&format!(
        "Reply with a single JSON object with exactly two keys: {{\"category\": \"{}\", \"html_body\": \"<HTML content>\"}}.\n",
        article.default_category
    ));
    prompt.push_str("html_body holds raw HTML and must end with this button:\n");
    prompt.push_str(&cta_button(destination, &article.button_text));
    prompt.push('\n');

    GenerationRequest {
        title: title.to_string(),
        summary: summary.to_string(),
        destination: destination.to_string(),
        persona: persona.map(str::to_string),
        prompt,
    }
}
