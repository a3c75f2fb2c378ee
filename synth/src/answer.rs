//! Final answer extraction from a finished transcript.
//!
//! The last turn is usually the grader's review. When it is a bare verdict ("YES...",
//! "No, ...") the answer is the turn before it; otherwise the last turn is shown as is.

use std::fmt;

use crate::state::Turn;

/// Heading printed above an answer.
pub const ANSWER_HEADER: &str = "Here's a clear summary of your requests and answers:";

/// Shown when no answer text could be extracted.
pub const NO_ANSWER_MESSAGE: &str =
    "Sorry, no answer could be generated. Try rephrasing your question.";

/// Result of answer extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Trimmed, non-empty answer text.
    Text(String),
    NoAnswer,
}

impl Answer {
    /// Answer text, or the fixed "no answer" message.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(t) => t,
            Self::NoAnswer => NO_ANSWER_MESSAGE,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Picks the answer from the final turns.
pub fn extract_answer(turns: &[Turn]) -> Answer {
    let chosen = match turns {
        [] => return Answer::NoAnswer,
        [only] => only.text.trim(),
        [.., before, last] => {
            let verdict = last.text.trim().to_lowercase();
            if verdict.starts_with("yes") || verdict.starts_with("no") {
                before.text.trim()
            } else {
                last.text.trim()
            }
        }
    };
    if chosen.is_empty() {
        Answer::NoAnswer
    } else {
        Answer::Text(chosen.to_string())
    }
}
