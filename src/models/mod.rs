pub mod action;
pub mod archive;
pub mod conversation;
pub mod error;
pub mod prompt;
pub mod turn;

pub use action::{Action, Outcome};
pub use archive::{Story, StoryArchive};
pub use conversation::Conversation;
pub use error::{StoryError, StoryResult};
pub use prompt::StoryPrompt;
pub use turn::{Role, Turn};
