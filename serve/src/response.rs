//! JSON bodies for `/api/ask` and the status code for each run failure.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use synth::{AgentError, AskOutcome, RunError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiAskRequest {
    pub question: String,
    /// Omit to start a new session.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAskResponse {
    pub session_id: String,
    /// Answer text, or the fixed "no answer" message.
    pub answer: String,
    pub answered: bool,
    pub turn_count: usize,
}

impl From<AskOutcome> for ApiAskResponse {
    fn from(outcome: AskOutcome) -> Self {
        Self {
            session_id: outcome.session_id,
            answer: outcome.answer.as_text().to_string(),
            answered: outcome.answer.is_answered(),
            turn_count: outcome.turn_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Blank question → 400; model failure → 502; anything else (store, recursion limit) → 500.
pub(crate) fn status_for(err: &RunError) -> StatusCode {
    match err {
        RunError::EmptyQuestion => StatusCode::BAD_REQUEST,
        RunError::Agent(AgentError::ExecutionFailed(_)) => StatusCode::BAD_GATEWAY,
        RunError::Agent(_)
        | RunError::Checkpoint(_)
        | RunError::Tools(_)
        | RunError::Compilation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
