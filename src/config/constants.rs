pub const LOG_FILE_PATH: &str = "/tmp/storyteller.log";

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com";

/// Environment variable consulted when no api key is configured
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const COMPLETION_MODEL: &str = "gpt-4o-mini";

pub const TEMPERATURE: f32 = 0.9;

pub const MAX_OUTPUT_TOKENS: usize = 500;

pub const SPEECH_MODEL: &str = "gpt-4o-mini-tts";

pub const SPEECH_VOICE: &str = "alloy";

pub const SPEECH_FORMAT: &str = "mp3";

pub const AUDIO_OUTPUT_DIR: &str = "/tmp/storyteller";

/// Instruction sent ahead of every new query.
pub const SYSTEM_PROMPT: &str = "You are a warm, imaginative storyteller for children. \
Every response should sound like a story beginning with 'Once upon a time...' \
or 'Long ago in a faraway land...', and should be simple, fun, and educational. \
When the user is not asking for a story, for example a simple 'Hello', talk with them \
like a friendly human instead of telling a story. \
Always reply in the language the user writes in.";

/// Instruction sent when an edited query is regenerated.
pub const REGENERATE_PROMPT: &str = "You are a warm, imaginative storyteller for children. \
Every response should sound like a story beginning with 'Once upon a time...' \
and should be fun, educational, and easy for kids to understand.";
