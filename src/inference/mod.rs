pub mod mistral;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use mistral::MistralService;

/// Model the service binds when no stub is injected.
pub const MODEL_ID: &str = "mistralai/Mistral-7B-v0.1";

/// Sampling parameters forwarded to the backend.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    /// Upper bound on newly generated tokens.
    pub max_length: u32,
    pub temperature: f64,
}

/// Single-operation boundary around the inference backend. The real
/// candle backend, a deterministic echo stub and a failure-injecting
/// stub all sit behind this trait.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the backend's raw candidate text. Backends that run the
    /// prompt through the model verbatim echo it at the front of the
    /// result; callers strip it with [`strip_prompt_echo`].
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}

/// Lazily-built singleton around [`MistralService`].
///
/// Construction runs at most once even when several first requests race;
/// a failed construction leaves the cell empty, so the next request tries
/// again instead of pinning a permanent error.
pub struct LazyMistral {
    model_id: String,
    cell: OnceCell<Arc<MistralService>>,
}

impl LazyMistral {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            cell: OnceCell::new(),
        }
    }

    async fn handle(&self) -> Result<&Arc<MistralService>> {
        self.cell
            .get_or_try_init(|| async {
                info!(model = %self.model_id, "loading generation model");
                let service = MistralService::load(&self.model_id).await?;
                Ok(Arc::new(service))
            })
            .await
    }
}

#[async_trait]
impl TextGenerator for LazyMistral {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let service = self.handle().await?;
        service.generate(prompt, params).await
    }
}

/// Best-effort removal of the echoed prompt from the backend output.
///
/// Tokenization can alter whitespace or casing right at the boundary, so
/// a missing prefix is passed through untouched instead of being treated
/// as an error.
pub fn strip_prompt_echo(prompt: &str, text: &str) -> String {
    match text.strip_prefix(prompt) {
        Some(rest) => rest.trim().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::strip_prompt_echo;

    #[test]
    fn strips_exact_prompt_prefix_and_trims() {
        assert_eq!(strip_prompt_echo("Hello", "Hello EXTRA"), "EXTRA");
    }

    #[test]
    fn passes_through_when_prompt_is_not_echoed() {
        assert_eq!(
            strip_prompt_echo("Hello", "hello there EXTRA"),
            "hello there EXTRA"
        );
    }

    #[test]
    fn echo_only_output_becomes_empty() {
        assert_eq!(strip_prompt_echo("Hello", "Hello"), "");
        assert_eq!(strip_prompt_echo("Hello", "Hello   \n"), "");
    }
}
