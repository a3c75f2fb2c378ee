//! Axum router: form page, form post, JSON ask and health check.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use synth::{new_session_id, Answer, ResearchRunner, RunError};
use tracing::warn;

use crate::html::{render_page, PageResult, PageView, EXAMPLE_QUESTION};
use crate::response::{status_for, ApiAskRequest, ApiAskResponse, ErrorBody};

#[derive(Clone)]
struct AppState {
    runner: Arc<ResearchRunner>,
}

#[derive(Debug, Deserialize)]
struct AskForm {
    #[serde(default)]
    question: String,
    #[serde(default)]
    session_id: String,
}

/// Builds the router around a shared runner.
pub fn router(runner: Arc<ResearchRunner>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask_form))
        .route("/api/ask", post(api_ask))
        .route("/health", get(|| async { "ok" }))
        .with_state(AppState { runner })
}

async fn index() -> Html<String> {
    let session_id = new_session_id();
    Html(render_page(&PageView {
        session_id: &session_id,
        question: EXAMPLE_QUESTION,
        result: PageResult::None,
    }))
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

async fn ask_form(State(state): State<AppState>, Form(form): Form<AskForm>) -> Response {
    let requested = non_empty(&form.session_id);
    let (status, session_id, result) = match state.runner.ask(&form.question, requested).await {
        Ok(outcome) => {
            let result = match outcome.answer {
                Answer::Text(text) => PageResult::Answer(text),
                Answer::NoAnswer => PageResult::NoAnswer,
            };
            (StatusCode::OK, outcome.session_id, result)
        }
        Err(RunError::EmptyQuestion) => (
            StatusCode::BAD_REQUEST,
            requested.map(str::to_string).unwrap_or_else(new_session_id),
            PageResult::Error("please enter a question".into()),
        ),
        Err(e) => {
            warn!(error = %e, "form ask failed");
            (
                status_for(&e),
                requested.map(str::to_string).unwrap_or_else(new_session_id),
                PageResult::Error(e.to_string()),
            )
        }
    };
    let page = render_page(&PageView {
        session_id: &session_id,
        question: &form.question,
        result,
    });
    (status, Html(page)).into_response()
}

async fn api_ask(State(state): State<AppState>, Json(req): Json<ApiAskRequest>) -> Response {
    let requested = req.session_id.as_deref().and_then(non_empty);
    match state.runner.ask(&req.question, requested).await {
        Ok(outcome) => Json(ApiAskResponse::from(outcome)).into_response(),
        Err(e) => {
            warn!(error = %e, "api ask failed");
            (
                status_for(&e),
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
