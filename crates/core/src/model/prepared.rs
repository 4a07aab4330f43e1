use crate::model::question::Question;

/// Attempt-scoped copy of a bank question with its options already shuffled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuestion {
    pub original_index: usize,
    pub question: String,
    pub correct_answer: String,
    pub options: Vec<String>,
}

impl PreparedQuestion {
    /// Build from a bank question, taking the already-shuffled `options`.
    #[must_use]
    pub fn from_source(original_index: usize, source: &Question, options: Vec<String>) -> Self {
        Self {
            original_index,
            question: source.text().to_owned(),
            correct_answer: source.correct_answer().to_owned(),
            options,
        }
    }

    /// Options are compared by value.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// One answered question of a random test, kept for the post-attempt review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub question: PreparedQuestion,
    pub chosen_option: String,
    pub is_correct: bool,
}
