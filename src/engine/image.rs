use crate::config::ImageConfig;

/// Illustration URL for `title`. `seed` varies the rendering between runs.
pub fn image_url(title: &str, config: &ImageConfig, seed: i64) -> String {
    let mut prompt = title.to_string();
    for qualifier in &config.style {
        prompt.push_str(", ");
        prompt.push_str(qualifier);
    }
    format!(
        "{}/{}?width={}&height={}&nologo=true&seed={}&model={}",
        config.base_url.trim_end_matches('/'),
        urlencoding::encode(&prompt),
        config.width,
        config.height,
        seed,
        config.model,
    )
}

/// Centered, responsive `<img>` for an explicit seed.
pub fn image_fragment_with_seed(title: &str, config: &ImageConfig, seed: i64) -> String {
    format!(
        r#"<div style="text-align:center; margin-bottom:20px;"><img src="{}" style="width:100%; max-width:800px; border-radius:12px;"></div>"#,
        image_url(title, config, seed)
    )
}

/// Image fragment seeded with the current unix time.
pub fn build_image_fragment(title: &str, config: &ImageConfig) -> String {
    image_fragment_with_seed(title, config, chrono::Utc::now().timestamp())
}
