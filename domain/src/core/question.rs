//! Question value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where a question came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    /// Passed directly on the command line
    Cli,
    /// Read from a file via `--file`
    File(PathBuf),
    /// Picked up from the inbox directory
    Inbox(PathBuf),
}

impl std::fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionSource::Cli => write!(f, "cli"),
            QuestionSource::File(path) => write!(f, "{}", path.display()),
            QuestionSource::Inbox(path) => write!(f, "inbox: {}", path.display()),
        }
    }
}

/// A question put to the council (Value Object)
///
/// The input that every panel member answers in round one and that the
/// synthesizer resolves at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
    source: QuestionSource,
}

impl Question {
    /// Create a new question from the command line
    ///
    /// # Panics
    /// Panics if the content is empty or only whitespace
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        assert!(!content.trim().is_empty(), "Question cannot be empty");
        Self {
            content,
            source: QuestionSource::Cli,
        }
    }

    /// Try to create a new question, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self {
                content,
                source: QuestionSource::Cli,
            })
        }
    }

    /// Attach a non-CLI source to this question
    pub fn with_source(mut self, source: QuestionSource) -> Self {
        self.source = source;
        self
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the question source
    pub fn source(&self) -> &QuestionSource {
        &self.source
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl From<&str> for Question {
    fn from(s: &str) -> Self {
        Question::new(s)
    }
}

impl From<String> for Question {
    fn from(s: String) -> Self {
        Question::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::new("Should we adopt event sourcing?");
        assert_eq!(q.content(), "Should we adopt event sourcing?");
        assert_eq!(q.source(), &QuestionSource::Cli);
    }

    #[test]
    fn test_question_from_str() {
        let q: Question = "Should we adopt event sourcing?".into();
        assert_eq!(q.content(), "Should we adopt event sourcing?");
    }

    #[test]
    #[should_panic]
    fn test_empty_question_panics() {
        Question::new("");
    }

    #[test]
    fn test_try_new_empty() {
        assert!(Question::try_new("").is_none());
        assert!(Question::try_new("   ").is_none());
    }

    #[test]
    fn test_file_source_display() {
        let q = Question::new("q").with_source(QuestionSource::File(PathBuf::from("notes/q.md")));
        assert_eq!(q.source().to_string(), "notes/q.md");
    }
}
