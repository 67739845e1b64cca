use super::Turn;

/// Request context handed to the completion service: a system instruction
/// followed by the conversation turns in order.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryPrompt {
    instruction: String,
    turns: Vec<Turn>,
}

impl StoryPrompt {
    pub fn new(instruction: impl Into<String>) -> StoryPrompt {
        StoryPrompt {
            instruction: instruction.into(),
            turns: vec![],
        }
    }

    pub fn with_turns(mut self, turns: Vec<Turn>) -> Self {
        self.turns = turns;
        self
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}
