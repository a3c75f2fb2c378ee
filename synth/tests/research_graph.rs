//! End-to-end runs of the research loop with MockLlm: answer paths, tool failures, the loop
//! guard, session resume and failure semantics.

mod common;

use std::sync::Arc;

use common::{call, is_prefix, research_tools};
use async_trait::async_trait;
use synth::memory::{CheckpointListItem, CheckpointMetadata};
use synth::{
    AgentError, Answer, Checkpoint, CheckpointError, Checkpointer, ConversationState,
    LlmResponse, MemorySaver, MockLlm, ResearchRunner, ResearchRunnerOptions, Role, RunError,
    RunnableConfig, ToolRegistry, Turn,
};

async fn runner(llm: MockLlm) -> (ResearchRunner, Arc<MockLlm>) {
    let llm = Arc::new(llm);
    let runner = ResearchRunner::new(
        llm.clone(),
        Arc::new(research_tools()),
        ResearchRunnerOptions::default(),
    )
    .await
    .unwrap();
    (runner, llm)
}

fn roles(state: &ConversationState) -> Vec<Role> {
    state.turns().iter().map(|t| t.role).collect()
}

#[tokio::test]
async fn photosynthesis_answered_without_tools() {
    let body = "Photosynthesis is how plants turn light, water and CO2 into sugar and oxygen.";
    let (runner, llm) = runner(MockLlm::new().then_reply(body).then_reply("Yes")).await;

    let outcome = runner.ask("What is photosynthesis?", None).await.unwrap();

    assert_eq!(outcome.answer, Answer::Text(body.to_string()));
    assert_eq!(outcome.turn_count, 3);
    assert_eq!(llm.call_count(), 2);
    let state = runner.load_session(&outcome.session_id).await.unwrap().unwrap();
    assert_eq!(roles(&state), vec![Role::User, Role::Assistant, Role::Grader]);
}

#[tokio::test]
async fn tool_round_trip_then_final_answer() {
    let llm = MockLlm::new()
        .then_tool_calls(
            "Let me search.",
            vec![call("arxiv_search", r#"{"query":"CRISPR base editing"}"#, "c1")],
        )
        .then_reply("Final answer: base editing avoids double-strand breaks.")
        .then_reply("YES, fully addressed.");
    let (runner, llm) = runner(llm).await;

    let state = runner.invoke("CRISPR advances?", Some("s-tools")).await.unwrap();

    assert_eq!(
        roles(&state),
        vec![
            Role::User,
            Role::Assistant,
            Role::ToolResult,
            Role::Assistant,
            Role::Grader
        ]
    );
    assert_eq!(state.turns()[2].text, "arxiv_search: CRISPR base editing");
    // The second reasoning call saw the tool output.
    let second = &llm.requests()[1];
    assert!(second
        .messages
        .iter()
        .any(|m| m.content().contains("arxiv_search: CRISPR base editing")));
}

#[tokio::test]
async fn failing_tool_does_not_abort_the_run() {
    let llm = MockLlm::new()
        .then_tool_calls("", vec![call("pubmed_search", "CRISPR trials", "c1")])
        .then_reply("No trial data could be retrieved; here is what is known.")
        .then_reply("Yes");
    let (runner, _) = runner(llm).await;

    let state = runner.invoke("Active CRISPR trials?", None).await.unwrap();

    let tool_turn = &state.turns()[2];
    assert_eq!(tool_turn.role, Role::ToolResult);
    assert!(tool_turn.text.contains("service unavailable"));
    assert_eq!(state.turns()[3].role, Role::Assistant);
    assert_eq!(state.last_turn().map(|t| t.role), Some(Role::Grader));
}

#[tokio::test]
async fn unsatisfied_grader_sends_back_to_reasoning() {
    let llm = MockLlm::new()
        .then_reply("Partial answer.")
        .then_reply("No, missing clinical trial data, try pubmed_search next.")
        .then_reply("Complete answer with trials.")
        .then_reply("Yes, complete.");
    let (runner, llm) = runner(llm).await;

    let outcome = runner.ask("q", None).await.unwrap();

    assert_eq!(outcome.answer, Answer::Text("Complete answer with trials.".into()));
    assert_eq!(outcome.turn_count, 5);
    assert_eq!(llm.remaining(), 0);
}

#[tokio::test]
async fn give_up_grader_ends_with_grader_text_as_answer() {
    let llm = MockLlm::new()
        .then_reply("I could not find sources.")
        .then_reply("I don't know.");
    let (runner, _) = runner(llm).await;

    let outcome = runner.ask("q", None).await.unwrap();

    assert_eq!(outcome.answer, Answer::Text("I don't know.".into()));
}

#[tokio::test]
async fn recursion_limit_stops_a_model_that_never_finishes() {
    let llm = MockLlm::new().otherwise(LlmResponse {
        content: "still searching".into(),
        tool_calls: vec![call("arxiv_search", "more", "c")],
        usage: None,
    });
    let options = ResearchRunnerOptions {
        recursion_limit: 9,
        ..Default::default()
    };
    let runner = ResearchRunner::new(Arc::new(llm), Arc::new(research_tools()), options)
        .await
        .unwrap();

    let err = runner.invoke("q", Some("s-endless")).await.unwrap_err();

    assert!(
        matches!(err, RunError::Agent(AgentError::RecursionLimit(9))),
        "{:?}",
        err
    );
    assert!(runner.load_session("s-endless").await.unwrap().is_none());
}

#[tokio::test]
async fn tool_calls_still_run_in_a_long_resumed_session() {
    let mut llm = MockLlm::new();
    for i in 0..7 {
        llm = llm.then_reply(format!("Answer {}.", i)).then_reply("Yes");
    }
    let llm = llm
        .then_tool_calls("", vec![call("arxiv_search", r#"{"query":"prime editing"}"#, "c8")])
        .then_reply("Final answer: found it.")
        .then_reply("Yes, fully addressed.");
    let (runner, _) = runner(llm).await;

    for i in 0..7 {
        runner.ask(&format!("question {}", i), Some("long")).await.unwrap();
    }
    let before = runner.load_session("long").await.unwrap().unwrap();
    assert_eq!(before.turn_count(), 21);

    let outcome = runner.ask("one more", Some("long")).await.unwrap();

    let state = runner.load_session("long").await.unwrap().unwrap();
    assert_eq!(
        roles(&state)[21..],
        [
            Role::User,
            Role::Assistant,
            Role::ToolResult,
            Role::Assistant,
            Role::Grader
        ]
    );
    assert_eq!(state.turns()[23].text, "arxiv_search: prime editing");
    assert_eq!(outcome.answer, Answer::Text("Final answer: found it.".into()));
}

#[tokio::test]
async fn second_question_resumes_the_session() {
    let llm = MockLlm::new()
        .then_reply("First answer.")
        .then_reply("Yes")
        .then_reply("Second answer.")
        .then_reply("Yes");
    let (runner, llm) = runner(llm).await;

    let first = runner.invoke("one", Some("s-resume")).await.unwrap();
    let second = runner.invoke("two", Some("s-resume")).await.unwrap();

    assert!(is_prefix(&first, &second));
    assert_eq!(second.turns()[3], Turn::user("two"));
    // The third model call (second reasoning) saw the first exchange.
    let third = &llm.requests()[2];
    assert!(third.messages.iter().any(|m| m.content() == "First answer."));
}

#[tokio::test]
async fn sessions_are_isolated() {
    let llm = MockLlm::new().otherwise(LlmResponse::text("Yes"));
    let (runner, _) = runner(llm).await;

    runner.invoke("alpha", Some("a")).await.unwrap();
    let b = runner.invoke("beta", Some("b")).await.unwrap();

    assert_eq!(b.turns()[0], Turn::user("beta"));
    assert_eq!(b.session_id(), "b");
}

#[tokio::test]
async fn model_failure_aborts_and_saves_nothing() {
    let checkpointer = Arc::new(MemorySaver::<ConversationState>::new());
    let llm = MockLlm::new()
        .then_reply("First answer.")
        .then_reply("Yes")
        .then_fail("upstream 500");
    let runner = ResearchRunner::new(
        Arc::new(llm),
        Arc::new(ToolRegistry::new()),
        ResearchRunnerOptions {
            checkpointer: Some(checkpointer.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let first = runner.invoke("one", Some("s-fail")).await.unwrap();
    let err = runner.invoke("two", Some("s-fail")).await.unwrap_err();

    assert!(matches!(err, RunError::Agent(_)), "{:?}", err);
    let stored = runner.load_session("s-fail").await.unwrap().unwrap();
    assert_eq!(stored, first);
    let config = synth::RunnableConfig::for_thread("s-fail");
    assert_eq!(checkpointer.list(&config, None, None, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_question_is_rejected_before_any_model_call() {
    let (runner, llm) = runner(MockLlm::with_no_tool_calls("unused")).await;
    let err = runner.invoke("   \n", None).await.unwrap_err();
    assert!(matches!(err, RunError::EmptyQuestion));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn question_is_trimmed() {
    let (runner, _) = runner(MockLlm::with_no_tool_calls("Yes")).await;
    let state = runner.invoke("  What is DNA?  ", None).await.unwrap();
    assert_eq!(state.turns()[0], Turn::user("What is DNA?"));
}

#[tokio::test]
async fn blank_model_answer_gives_no_answer() {
    let (runner, _) = runner(MockLlm::new().then_reply("   ").then_reply("Yes")).await;
    let outcome = runner.ask("q", None).await.unwrap();
    assert_eq!(outcome.answer, Answer::NoAnswer);
    assert!(!outcome.answer.is_answered());
}

#[tokio::test]
async fn concurrent_calls_on_one_session_are_serialized() {
    let llm = MockLlm::new().otherwise(LlmResponse::text("Yes"));
    let (runner, _) = runner(llm).await;
    let runner = Arc::new(runner);

    let a = {
        let r = runner.clone();
        tokio::spawn(async move { r.invoke("first", Some("shared")).await })
    };
    let b = {
        let r = runner.clone();
        tokio::spawn(async move { r.invoke("second", Some("shared")).await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let state = runner.load_session("shared").await.unwrap().unwrap();
    let users = state.turns().iter().filter(|t| t.role == Role::User).count();
    assert_eq!(users, 2);
    assert_eq!(state.turn_count(), 6);
    assert_eq!(runner.active_sessions(), 0);
}

/// Reads nothing and refuses every write.
struct ReadOnlyStore;

#[async_trait]
impl Checkpointer<ConversationState> for ReadOnlyStore {
    async fn put(
        &self,
        _config: &RunnableConfig,
        _checkpoint: &Checkpoint<ConversationState>,
    ) -> Result<String, CheckpointError> {
        Err(CheckpointError::Storage("read-only store".into()))
    }

    async fn get_tuple(
        &self,
        _config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<ConversationState>, CheckpointMetadata)>, CheckpointError> {
        Ok(None)
    }

    async fn list(
        &self,
        _config: &RunnableConfig,
        _limit: Option<usize>,
        _before: Option<&str>,
        _after: Option<&str>,
    ) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn checkpoint_write_failure_is_a_checkpoint_error() {
    let runner = ResearchRunner::new(
        Arc::new(MockLlm::new().then_reply("Answer.").then_reply("Yes")),
        Arc::new(ToolRegistry::new()),
        ResearchRunnerOptions {
            checkpointer: Some(Arc::new(ReadOnlyStore)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = runner.invoke("q", Some("s-ro")).await.unwrap_err();

    assert!(
        matches!(err, RunError::Checkpoint(CheckpointError::Storage(_))),
        "{:?}",
        err
    );
}

#[tokio::test]
async fn session_locks_are_released_after_each_run() {
    let llm = MockLlm::new()
        .then_reply("Answer.")
        .then_reply("Yes")
        .then_fail("upstream 500");
    let (runner, _) = runner(llm).await;

    runner.invoke("one", Some("s-lock")).await.unwrap();
    assert_eq!(runner.active_sessions(), 0);

    runner.invoke("two", Some("s-lock")).await.unwrap_err();
    assert_eq!(runner.active_sessions(), 0);
}
