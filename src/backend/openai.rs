#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;

use crate::backend::{Completion, Narration};
use crate::config::{BackendConfig, NarrationConfig, constants, user_agent};
use crate::models::{StoryPrompt, Turn};
use async_trait::async_trait;
use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, time};
use thiserror::Error;

pub struct OpenAI {
    endpoint: String,
    api_key: Option<String>,
    timeout: Option<time::Duration>,

    model: String,
    temperature: f32,
    max_tokens: usize,

    speech_model: String,
    voice: String,
    audio_format: String,
}

#[async_trait]
impl Completion for OpenAI {
    async fn generate(&self, prompt: StoryPrompt) -> Result<String> {
        if self.model.is_empty() {
            bail!("no model is set");
        }

        let mut messages = vec![MessageRequest {
            role: "system".to_string(),
            content: prompt.instruction().to_string(),
        }];
        messages.extend(prompt.turns().iter().map(MessageRequest::from));

        let completion_req = CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens).filter(|max| *max > 0),
        };

        log::trace!("Sending completion request: {:?}", completion_req);

        let res = self
            .post("/v1/chat/completions")
            .json(&completion_req)
            .send()
            .await
            .wrap_err("sending completion request")?;

        if !res.status().is_success() {
            return Err(error_response(res).await?.into());
        }

        let data = res
            .json::<CompletionResponse>()
            .await
            .wrap_err("parsing completion response")?;

        if let Some(usage) = data.usage.as_ref() {
            log::debug!(
                "Completion {} usage: prompt {}, completion {}, total {}",
                data.id,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let choice = match data.choices.into_iter().next() {
            Some(choice) => choice,
            None => bail!("completion {} has no choices", data.id),
        };

        let reason = choice.finish_reason.unwrap_or_default();
        if reason != "stop" {
            log::warn!("Completion {} finished with reason {:?}", data.id, reason);
        }

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => bail!(
                "completion {} has no content (finish reason: {})",
                data.id,
                reason
            ),
        }
    }
}

#[async_trait]
impl Narration for OpenAI {
    async fn synthesize(&self, text: String) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            bail!("nothing to narrate");
        }

        let speech_req = SpeechRequest {
            model: self.speech_model.clone(),
            voice: self.voice.clone(),
            input: text,
            response_format: self.audio_format.clone(),
        };

        log::trace!(
            "Sending speech request: model {}, voice {}, {} chars",
            speech_req.model,
            speech_req.voice,
            speech_req.input.len()
        );

        let res = self
            .post("/v1/audio/speech")
            .json(&speech_req)
            .send()
            .await
            .wrap_err("sending speech request")?;

        if !res.status().is_success() {
            return Err(error_response(res).await?.into());
        }

        let audio = res.bytes().await.wrap_err("reading speech response")?;
        if audio.is_empty() {
            bail!("speech response is empty");
        }
        log::debug!("Received {} bytes of {} audio", audio.len(), self.audio_format);
        Ok(audio.to_vec())
    }
}

impl From<&BackendConfig> for OpenAI {
    fn from(value: &BackendConfig) -> Self {
        let mut openai = OpenAI::default()
            .with_endpoint(&value.endpoint)
            .with_model(&value.model)
            .with_temperature(value.temperature)
            .with_max_tokens(value.max_tokens);

        if let Some(secs) = value.timeout_secs {
            openai = openai.with_timeout(time::Duration::from_secs(secs as u64));
        }

        openai.api_key = value.resolve_api_key();
        openai
    }
}

impl OpenAI {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_narration(mut self, config: &NarrationConfig) -> Self {
        self.speech_model = config.model.clone();
        self.voice = config.voice.clone();
        self.audio_format = config.format.clone();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut req = reqwest::Client::new()
            .post(format!("{}{}", self.endpoint, path))
            .header("Content-Type", "application/json")
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        if let Some(token) = &self.api_key {
            req = req.bearer_auth(token);
        }
        req
    }
}

impl Default for OpenAI {
    fn default() -> Self {
        Self {
            endpoint: constants::OPENAI_ENDPOINT.to_string(),
            api_key: None,
            timeout: None,
            model: constants::COMPLETION_MODEL.to_string(),
            temperature: constants::TEMPERATURE,
            max_tokens: constants::MAX_OUTPUT_TOKENS,
            speech_model: constants::SPEECH_MODEL.to_string(),
            voice: constants::SPEECH_VOICE.to_string(),
            audio_format: constants::SPEECH_FORMAT.to_string(),
        }
    }
}

async fn error_response(res: reqwest::Response) -> Result<OpenAIError> {
    let http_code = res.status().as_u16();
    let resp = res.text().await.wrap_err("reading error response")?;
    log::error!("Error response: {}", resp);
    let err = serde_json::from_str::<ErrorResponse>(&resp)
        .wrap_err(format!("parsing error response ({}): {}", http_code, resp))?;
    let mut err = err.error;
    err.http_code = http_code;
    Ok(err)
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
struct MessageRequest {
    role: String,
    content: String,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<MessageRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionMessageResponse {
    role: String,
    content: Option<String>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionChoiceResponse {
    message: CompletionMessageResponse,
    finish_reason: Option<String>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    id: String,
    choices: Vec<CompletionChoiceResponse>,
    usage: Option<CompletionUsageResponse>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionUsageResponse {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct SpeechRequest {
    model: String,
    voice: String,
    input: String,
    response_format: String,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: OpenAIError,
}

#[derive(Default, Error, Debug, Serialize, Deserialize)]
pub struct OpenAIError {
    #[serde(skip)]
    pub http_code: u16,
    pub message: String,
    #[serde(rename = "type", default)]
    pub err_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl Display for OpenAIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpenAI error ({}): {}", self.http_code, self.message)
    }
}

impl From<&Turn> for MessageRequest {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role().as_str().to_string(),
            content: turn.content().to_string(),
        }
    }
}
