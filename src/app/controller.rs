#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

use crate::backend::{ArcCompletion, ArcNarration};
use crate::config::StoryConfig;
use crate::models::{Action, Outcome, StoryError, StoryResult, Turn};

use super::session::{EditState, Instruction, Session};

/// Drives a [`Session`] through user actions. Every operation borrows the
/// session mutably, so requests to the services never overlap.
pub struct Controller {
    completion: ArcCompletion,
    narration: ArcNarration,
    story: StoryConfig,
}

impl Controller {
    pub fn new(completion: ArcCompletion, narration: ArcNarration) -> Self {
        Self {
            completion,
            narration,
            story: StoryConfig::default(),
        }
    }

    pub fn with_story(mut self, story: StoryConfig) -> Self {
        self.story = story;
        self
    }

    pub async fn dispatch(&self, session: &mut Session, action: Action) -> StoryResult<Outcome> {
        log::debug!("Dispatching {:?}", action);
        match action {
            Action::Submit(text) => self.submit(session, text).await.map(Outcome::Reply),
            Action::Edit(index) => self.edit(session, index).map(|_| Outcome::Updated),
            Action::Cancel => self.cancel(session).map(|_| Outcome::Updated),
            Action::Confirm(text) => self.confirm(session, text).await.map(Outcome::Reply),
            Action::Retry => self.retry(session).await.map(Outcome::Reply),
            Action::Listen(index) => self.listen(session, index).await.map(Outcome::Audio),
        }
    }

    pub fn edit(&self, session: &mut Session, index: usize) -> StoryResult<()> {
        if let Some(current) = session.edit_cursor() {
            return Err(StoryError::EditInProgress(current));
        }

        match session.conversation().get(index) {
            Some(turn) if turn.is_user() => {}
            _ => return Err(StoryError::InvalidIndex(index)),
        }

        session.set_state(EditState::Editing(index));
        Ok(())
    }

    pub fn cancel(&self, session: &mut Session) -> StoryResult<()> {
        match session.state() {
            EditState::Editing(_) => {
                session.set_state(EditState::Idle);
                Ok(())
            }
            _ => Err(StoryError::NotEditing),
        }
    }

    /// Commit the edit and regenerate the reply. A failed request does not
    /// restore the truncated turns; the edit stays open so it can be
    /// confirmed again.
    pub async fn confirm(
        &self,
        session: &mut Session,
        new_content: impl Into<String>,
    ) -> StoryResult<String> {
        let index = match session.state() {
            EditState::Editing(index) => index,
            _ => return Err(StoryError::NotEditing),
        };

        session
            .conversation_mut()
            .replace_and_truncate(index, new_content)?;
        session.set_state(EditState::Regenerating(index));

        match self.reply(session, Instruction::Regenerate).await {
            Ok(reply) => {
                session.set_state(EditState::Idle);
                Ok(reply)
            }
            Err(err) => {
                session.set_state(EditState::Editing(index));
                Err(err)
            }
        }
    }

    /// Ask a new query over the whole conversation. A query left without a
    /// reply by an earlier failure is replaced rather than followed.
    pub async fn submit(
        &self,
        session: &mut Session,
        text: impl Into<String>,
    ) -> StoryResult<String> {
        if let Some(current) = session.edit_cursor() {
            return Err(StoryError::EditInProgress(current));
        }

        let conversation = session.conversation_mut();
        if conversation.is_awaiting_reply() {
            let last = conversation.len() - 1;
            conversation.replace_and_truncate(last, text)?;
        } else {
            conversation.append(Turn::user(text));
        }

        self.reply(session, Instruction::Story).await
    }

    /// Ask again for the dangling last query, with the instruction its failed
    /// request carried.
    pub async fn retry(&self, session: &mut Session) -> StoryResult<String> {
        if let Some(current) = session.edit_cursor() {
            return Err(StoryError::EditInProgress(current));
        }
        if !session.conversation().is_awaiting_reply() {
            return Err(StoryError::NothingToRetry);
        }

        let instruction = session.pending().unwrap_or_default();
        self.reply(session, instruction).await
    }

    pub async fn listen(&self, session: &Session, index: usize) -> StoryResult<Vec<u8>> {
        let text = match session.conversation().get(index) {
            Some(turn) if turn.is_assistant() => turn.content().to_string(),
            _ => return Err(StoryError::InvalidIndex(index)),
        };

        log::info!("Narrating turn {}", index);
        self.narration
            .synthesize(text)
            .await
            .map_err(StoryError::ServiceFailure)
    }

    fn instruction(&self, instruction: Instruction) -> &str {
        match instruction {
            Instruction::Story => &self.story.system_prompt,
            Instruction::Regenerate => &self.story.regenerate_prompt,
        }
    }

    async fn reply(&self, session: &mut Session, instruction: Instruction) -> StoryResult<String> {
        let prompt = session
            .conversation()
            .build_prompt(self.instruction(instruction));
        log::info!(
            "Requesting a story over {} turns ({:?})",
            prompt.turns().len(),
            instruction
        );

        let reply = match self.completion.generate(prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                log::error!("Completion failed: {:?}", err);
                session.set_pending(Some(instruction));
                return Err(StoryError::ServiceFailure(err));
            }
        };
        session.set_pending(None);

        let conversation = session.conversation_mut();
        conversation.append(Turn::assistant(reply.clone()));
        conversation.record_story(reply.clone());
        debug_assert!(conversation.is_alternating());
        Ok(reply)
    }
}
