use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoryError {
    #[error("turn {0} does not exist or has the wrong role")]
    InvalidIndex(usize),

    #[error("turn {0} is already being edited")]
    EditInProgress(usize),

    #[error("no edit is in progress")]
    NotEditing,

    #[error("there is no unanswered query to retry")]
    NothingToRetry,

    #[error("service failure: {0}")]
    ServiceFailure(eyre::Report),
}

impl StoryError {
    pub fn is_service_failure(&self) -> bool {
        matches!(self, StoryError::ServiceFailure(_))
    }
}

pub type StoryResult<T> = std::result::Result<T, StoryError>;
