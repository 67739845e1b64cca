use crate::models::Conversation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(usize),
    Regenerating(usize),
}

/// Which instruction a request was sent with. Kept on the session while the
/// last query has no reply, so a retry asks the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Instruction {
    #[default]
    Story,
    Regenerate,
}

/// Everything a single interactive session owns. Created empty when the
/// session starts and dropped with it.
#[derive(Debug, Default)]
pub struct Session {
    conversation: Conversation,
    state: EditState,
    pending: Option<Instruction>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub(crate) fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: EditState) {
        log::trace!("Edit state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Instruction the unanswered last query failed with, if any.
    pub fn pending(&self) -> Option<Instruction> {
        self.pending
    }

    pub(crate) fn set_pending(&mut self, pending: Option<Instruction>) {
        self.pending = pending;
    }

    /// Index of the user turn being edited, if any.
    pub fn edit_cursor(&self) -> Option<usize> {
        match self.state {
            EditState::Idle => None,
            EditState::Editing(index) | EditState::Regenerating(index) => Some(index),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.edit_cursor().is_some()
    }
}
