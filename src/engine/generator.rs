use thiserror::Error;

use super::extract::{extract_article, fallback_article, ExtractError, GenerationResult};
use super::prompt::GenerationRequest;
use crate::config::ArticleConfig;
use crate::model::{ModelError, TextModel};

/// Why the generator fell back to the model-independent article.
#[derive(Debug, Error)]
pub enum FallbackReason {
    #[error(transparent)]
    ModelCall(ModelError),
    #[error(transparent)]
    Unparsable(ExtractError),
}

/// Outcome of one generation. Both variants are publishable; `Fallback`
/// marks a degraded article built without the model's help.
#[derive(Debug)]
pub enum Generation {
    Parsed(GenerationResult),
    Fallback {
        result: GenerationResult,
        reason: FallbackReason,
    },
}

impl Generation {
    pub fn result(&self) -> &GenerationResult {
        match self {
            Generation::Parsed(result) | Generation::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> GenerationResult {
        match self {
            Generation::Parsed(result) | Generation::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback { .. })
    }
}

/// The model cannot be used at all. Fatal for the run.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ModelUnavailable(pub String);

/// Call the model once and turn its reply into an article.
///
/// Call failures and unparsable replies are recovered with the fallback
/// article. Only an unusable model is reported as an error.
pub async fn generate(
    model: &dyn TextModel,
    request: &GenerationRequest,
    article: &ArticleConfig,
) -> Result<Generation, ModelUnavailable> {
    let fallback = |reason: FallbackReason| {
        tracing::warn!(reason = %reason, "generation degraded, using fallback article");
        Generation::Fallback {
            result: fallback_article(
                &request.summary,
                &request.destination,
                &article.default_category,
                &article.button_text,
            ),
            reason,
        }
    };

    let reply = match model.complete(&request.prompt).await {
        Ok(reply) => reply,
        Err(ModelError::Unavailable(msg)) => return Err(ModelUnavailable(msg)),
        Err(e) => return Ok(fallback(FallbackReason::ModelCall(e))),
    };

    match extract_article(&reply, &article.default_category) {
        Ok(result) => {
            tracing::debug!(category = %result.category, bytes = result.html_body.len(), "model reply parsed");
            Ok(Generation::Parsed(result))
        }
        Err(e) => Ok(fallback(FallbackReason::Unparsable(e))),
    }
}
