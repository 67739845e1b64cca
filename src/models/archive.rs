/// A reply kept in the archive. Superseded replies stay too.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    id: String,
    text: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl Story {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}

/// Append-only log of every assistant reply produced in the session. It is
/// independent of the live conversation and survives edits.
#[derive(Debug, Clone, Default)]
pub struct StoryArchive {
    stories: Vec<Story>,
}

impl StoryArchive {
    pub fn record(&mut self, text: impl Into<String>) -> &Story {
        self.stories.push(Story::new(text));
        &self.stories[self.stories.len() - 1]
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn last(&self) -> Option<&Story> {
        self.stories.last()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}
