#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use super::{
    Role, StoryArchive, StoryPrompt, Turn,
    error::{StoryError, StoryResult},
};

/// The live turn sequence of a session together with its story archive.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
    archive: StoryArchive,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_turns(mut self, turns: Vec<Turn>) -> Self {
        self.turns = turns;
        self
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Replace the content of the user turn at `index` and drop every turn
    /// after it. The conversation is left untouched on error.
    pub fn replace_and_truncate(
        &mut self,
        index: usize,
        new_content: impl Into<String>,
    ) -> StoryResult<()> {
        match self.turns.get_mut(index) {
            Some(turn) if turn.is_user() => turn.set_content(new_content),
            _ => return Err(StoryError::InvalidIndex(index)),
        }
        self.turns.truncate(index + 1);
        Ok(())
    }

    pub fn record_story(&mut self, text: impl Into<String>) {
        let story = self.archive.record(text);
        log::debug!("Recorded story {}", story.id());
    }

    pub fn build_prompt(&self, instruction: &str) -> StoryPrompt {
        StoryPrompt::new(instruction).with_turns(self.turns.clone())
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn archive(&self) -> &StoryArchive {
        &self.archive
    }

    /// Whether the last turn is a user query still waiting for its reply.
    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.turns.last(), Some(turn) if turn.is_user())
    }

    /// Roles must alternate user, assistant, user, ... from the first turn.
    pub fn is_alternating(&self) -> bool {
        self.turns.iter().enumerate().all(|(idx, turn)| {
            let want = if idx % 2 == 0 {
                Role::User
            } else {
                Role::Assistant
            };
            turn.role() == want
        })
    }
}
