use rand::Rng;
use thiserror::Error;

use crate::config::Config;
use crate::engine::image::build_image_fragment;
use crate::engine::prompt::{build_prompt, choose_persona};
use crate::engine::{generate, ModelUnavailable};
use crate::feed::NewsFeed;
use crate::model::TextModel;
use crate::publish::{Post, Publisher};

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The feed had no entries.
    NoEntries,
    /// Generation produced an empty body; nothing was sent.
    NothingToPublish { title: String },
    Published {
        subject: String,
        destination: String,
        /// The article came from the fallback path, not the model.
        degraded: bool,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("feed fetch failed: {0:#}")]
    Feed(anyhow::Error),
    #[error(transparent)]
    ModelUnavailable(#[from] ModelUnavailable),
    #[error("publish failed: {0:#}")]
    Publish(anyhow::Error),
}

/// One feed entry -> one published post. Holds no state between runs.
pub struct Pipeline<'a> {
    pub config: &'a Config,
    pub feed: &'a dyn NewsFeed,
    pub model: &'a dyn TextModel,
    pub publisher: &'a dyn Publisher,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        feed: &'a dyn NewsFeed,
        model: &'a dyn TextModel,
        publisher: &'a dyn Publisher,
    ) -> Self {
        Self { config, feed, model, publisher }
    }

    /// Run the pipeline once. Every external call is attempted exactly once.
    pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunOutcome, PipelineError> {
        let entries = self.feed.fetch_entries().await.map_err(PipelineError::Feed)?;
        let Some(entry) = entries.into_iter().next() else {
            tracing::info!("feed is empty, nothing to do");
            return Ok(RunOutcome::NoEntries);
        };
        tracing::info!(title = %entry.title, "processing newest entry");

        let destination = self.config.links.resolve(&entry.title, &entry.summary).to_string();
        tracing::info!(destination = %destination, "destination resolved");

        let image = build_image_fragment(&entry.title, &self.config.image);

        let persona = choose_persona(&self.config.personas, rng);
        if let Some(persona) = persona {
            tracing::debug!(persona, "persona chosen");
        }
        let request = build_prompt(
            &entry.title,
            &entry.summary,
            &destination,
            persona,
            &self.config.article,
        );

        let generation = generate(self.model, &request, &self.config.article).await?;
        let degraded = generation.is_fallback();
        tracing::info!(category = %generation.result().category, degraded, "article generated");
        let article = generation.into_result();

        if article.html_body.trim().is_empty() {
            tracing::warn!(title = %entry.title, "generated body is empty, skipping publish");
            return Ok(RunOutcome::NothingToPublish { title: entry.title });
        }

        let post = Post {
            title: entry.title,
            category: article.category,
            html: image + &article.html_body,
        };
        self.publisher.publish(&post).await.map_err(PipelineError::Publish)?;

        Ok(RunOutcome::Published {
            subject: post.subject(),
            destination,
            degraded,
        })
    }
}
