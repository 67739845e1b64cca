use eyre::{Result, bail};
use serde::{Deserialize, Serialize};

use super::constants::{
    API_KEY_ENV, AUDIO_OUTPUT_DIR, COMPLETION_MODEL, LOG_FILE_PATH, MAX_OUTPUT_TOKENS,
    OPENAI_ENDPOINT, REGENERATE_PROMPT, SPEECH_FORMAT, SPEECH_MODEL, SPEECH_VOICE, SYSTEM_PROMPT,
    TEMPERATURE,
};
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub narration: NarrationConfig,

    #[serde(default)]
    pub story: StoryConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

/// Connection settings of the OpenAI compatible endpoint serving both
/// completions and speech.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BackendConfig {
    #[serde(default = "endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u16>,

    #[serde(default = "completion_model")]
    pub model: String,

    #[serde(default = "temperature")]
    pub temperature: f32,

    #[serde(default = "max_output_tokens")]
    pub max_tokens: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NarrationConfig {
    #[serde(default = "speech_model")]
    pub model: String,

    #[serde(default = "speech_voice")]
    pub voice: String,

    #[serde(default = "speech_format")]
    pub format: String,

    #[serde(default = "audio_output_dir")]
    pub output_dir: String,

    /// Command used to play a narration, invoked with the audio file path
    /// as its last argument.
    #[serde(default)]
    pub player: Option<Vec<String>>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StoryConfig {
    #[serde(default = "system_prompt")]
    pub system_prompt: String,

    #[serde(default = "regenerate_prompt")]
    pub regenerate_prompt: String,
}

impl Configuration {
    /// Reject settings the backend would only fail on later.
    pub fn validate(&self) -> Result<()> {
        if self.backend.endpoint.trim().is_empty() {
            bail!("backend.endpoint must not be empty");
        }
        if self.backend.model.trim().is_empty() {
            bail!("backend.model must not be empty");
        }
        if !(0.0..=2.0).contains(&self.backend.temperature) {
            bail!(
                "backend.temperature must be between 0 and 2, got {}",
                self.backend.temperature
            );
        }
        if self.narration.format.trim().is_empty() {
            bail!("narration.format must not be empty");
        }
        Ok(())
    }
}

impl BackendConfig {
    /// The configured api key, falling back to `OPENAI_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.is_empty())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: LOG_FILE_PATH.to_string(),
            append: false,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: OPENAI_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: None,
            model: COMPLETION_MODEL.to_string(),
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            model: SPEECH_MODEL.to_string(),
            voice: SPEECH_VOICE.to_string(),
            format: SPEECH_FORMAT.to_string(),
            output_dir: AUDIO_OUTPUT_DIR.to_string(),
            player: None,
        }
    }
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            regenerate_prompt: REGENERATE_PROMPT.to_string(),
        }
    }
}
