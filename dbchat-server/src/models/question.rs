//! Chat question validation

use super::ValidationError;

/// Maximum question length in characters
pub const MAX_QUESTION_LEN: usize = 2000;

/// Phrases answered locally without calling the LLM.
const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "yo",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Validated, trimmed chat question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// # Rules
    /// - Leading/trailing whitespace is dropped
    /// - Must not be empty after trimming
    /// - At most 2000 characters
    ///
    /// # Example
    /// ```
    /// use dbchat_server::models::Question;
    ///
    /// assert!(Question::new("  How many users are there? ").is_ok());
    /// assert!(Question::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "question" });
        }
        if trimmed.chars().count() > MAX_QUESTION_LEN {
            return Err(ValidationError::TooLong {
                field: "question",
                max: MAX_QUESTION_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for bare greetings like "hi" or "Good morning".
    pub fn is_greeting(&self) -> bool {
        let lowered = self.0.to_lowercase();
        GREETINGS.contains(&lowered.as_str())
    }
}

impl AsRef<str> for Question {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_input() {
        let q = Question::new("  count users \n").unwrap();
        assert_eq!(q.as_str(), "count users");
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(
            Question::new(" \t ").unwrap_err(),
            ValidationError::Empty { field: "question" }
        );
    }

    #[test]
    fn max_length() {
        assert!(Question::new(&"a".repeat(MAX_QUESTION_LEN)).is_ok());
        let err = Question::new(&"a".repeat(MAX_QUESTION_LEN + 1)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 2000, .. }));
    }

    #[test]
    fn greetings_detected_case_insensitively() {
        assert!(Question::new("Hello").unwrap().is_greeting());
        assert!(Question::new("  GOOD EVENING ").unwrap().is_greeting());
        assert!(!Question::new("hello, how many users are there?").unwrap().is_greeting());
    }
}
