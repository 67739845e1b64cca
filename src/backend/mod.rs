pub mod openai;

pub use openai::OpenAI;

#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::config::{BackendConfig, NarrationConfig, verbose};
use crate::models::StoryPrompt;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// Produces a single text reply for a prompt.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Completion {
    async fn generate(&self, prompt: StoryPrompt) -> Result<String>;
}

/// Synthesizes speech for a text, returning the encoded audio.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Narration {
    async fn synthesize(&self, text: String) -> Result<Vec<u8>>;
}

pub type ArcCompletion = Arc<dyn Completion + Send + Sync>;
pub type ArcNarration = Arc<dyn Narration + Send + Sync>;

pub fn new_backend(
    backend: &BackendConfig,
    narration: &NarrationConfig,
) -> Result<(ArcCompletion, ArcNarration)> {
    if backend.endpoint.is_empty() {
        eyre::bail!("No backend endpoint configured");
    }

    let openai = Arc::new(OpenAI::from(backend).with_narration(narration));
    if openai.api_key().is_none() {
        log::warn!("No api key configured for {}", openai.endpoint());
    }
    verbose!("  [+] Using backend {} ({})", openai.endpoint(), openai.model());

    let completion: ArcCompletion = openai.clone();
    let narration: ArcNarration = openai;
    Ok((completion, narration))
}
