pub mod gemini;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// The model cannot be used at all (bad key, unknown model, no access).
    #[error("generative model unavailable: {0}")]
    Unavailable(String),
    /// A single call failed; the model may work on the next run.
    #[error("model request failed: {0:#}")]
    Request(anyhow::Error),
    #[error("model returned an empty reply")]
    EmptyReply,
}

/// A generative text model: one prompt in, one free-text reply out.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}
