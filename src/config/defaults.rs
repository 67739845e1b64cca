use super::constants::*;

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn endpoint() -> String {
    OPENAI_ENDPOINT.to_string()
}

pub(crate) fn completion_model() -> String {
    COMPLETION_MODEL.to_string()
}

pub(crate) fn temperature() -> f32 {
    TEMPERATURE
}

pub(crate) fn max_output_tokens() -> usize {
    MAX_OUTPUT_TOKENS
}

pub(crate) fn speech_model() -> String {
    SPEECH_MODEL.to_string()
}

pub(crate) fn speech_voice() -> String {
    SPEECH_VOICE.to_string()
}

pub(crate) fn speech_format() -> String {
    SPEECH_FORMAT.to_string()
}

pub(crate) fn audio_output_dir() -> String {
    AUDIO_OUTPUT_DIR.to_string()
}

pub(crate) fn system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

pub(crate) fn regenerate_prompt() -> String {
    REGENERATE_PROMPT.to_string()
}
