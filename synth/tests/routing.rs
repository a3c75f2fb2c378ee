//! Continuation and termination rules on hand-built transcripts.

mod common;

use std::sync::Arc;

use common::{call, state_with};
use synth::{
    KeywordVerdict, RoutingConfig, RoutingDecision, Turn, TurnRouter, VerdictPolicy,
};

fn padded(n: usize, last: Turn) -> synth::ConversationState {
    let mut turns: Vec<Turn> = (0..n - 1)
        .map(|i| {
            if i % 2 == 0 {
                Turn::user(format!("q{}", i))
            } else {
                Turn::assistant(format!("thinking {}", i), vec![])
            }
        })
        .collect();
    turns.push(last);
    state_with(turns)
}

#[test]
fn final_marker_routes_to_grading() {
    let s = state_with(vec![Turn::user("q"), Turn::assistant("final answer: X", vec![])]);
    assert_eq!(
        TurnRouter::default().after_reasoning(&s),
        RoutingDecision::ContinueToGrader
    );
}

#[test]
fn final_summary_marker_is_case_insensitive() {
    let s = state_with(vec![
        Turn::user("q"),
        Turn::assistant("Final Summary: two papers agree.", vec![]),
    ]);
    assert_eq!(
        TurnRouter::default().after_reasoning(&s),
        RoutingDecision::ContinueToGrader
    );
}

#[test]
fn tool_calls_route_to_acting() {
    let s = state_with(vec![
        Turn::user("q"),
        Turn::assistant("", vec![call("arxiv_search", "CRISPR", "c1")]),
    ]);
    assert_eq!(
        TurnRouter::default().after_reasoning(&s),
        RoutingDecision::ContinueToTool
    );
}

#[test]
fn prose_without_calls_routes_to_grading() {
    let s = state_with(vec![Turn::user("q"), Turn::assistant("some prose", vec![])]);
    assert!(s.turn_count() <= 20);
    assert_eq!(
        TurnRouter::default().after_reasoning(&s),
        RoutingDecision::ContinueToGrader
    );
}

#[test]
fn empty_transcript_routes_to_grading() {
    let s = state_with(vec![]);
    assert_eq!(
        TurnRouter::default().after_reasoning(&s),
        RoutingDecision::ContinueToGrader
    );
}

#[test]
fn grader_yes_stops() {
    let s = state_with(vec![Turn::user("q"), Turn::grader("Yes, fully addressed.")]);
    assert_eq!(TurnRouter::default().after_grading(&s), RoutingDecision::Stop);
}

#[test]
fn grader_no_routes_back_to_reasoning() {
    let s = state_with(vec![
        Turn::user("q"),
        Turn::grader("No, missing clinical trial data, try pubmed_search next."),
    ]);
    assert_eq!(
        TurnRouter::default().after_grading(&s),
        RoutingDecision::ContinueToReasoning
    );
}

#[test]
fn grader_give_up_stops() {
    let s = state_with(vec![
        Turn::user("q"),
        Turn::grader("Honestly, I don't know where else to look."),
    ]);
    assert_eq!(TurnRouter::default().after_grading(&s), RoutingDecision::Stop);
}

#[test]
fn tool_calls_at_exactly_the_limit_still_act() {
    let s = padded(20, Turn::assistant("", vec![call("arxiv_search", "x", "c")]));
    assert_eq!(s.turn_count(), 20);
    assert_eq!(
        TurnRouter::default().after_reasoning(&s),
        RoutingDecision::ContinueToTool
    );
}

#[test]
fn past_the_limit_tool_calls_still_act() {
    let s = padded(41, Turn::assistant("", vec![call("arxiv_search", "x", "c")]));
    assert_eq!(
        TurnRouter::default().after_reasoning(&s),
        RoutingDecision::ContinueToTool
    );
}

#[test]
fn past_the_limit_prose_goes_to_grading() {
    let s = padded(41, Turn::assistant("more prose", vec![]));
    assert_eq!(
        TurnRouter::default().after_reasoning(&s),
        RoutingDecision::ContinueToGrader
    );
}

#[test]
fn past_the_limit_unsatisfied_grader_stops() {
    let s = padded(21, Turn::grader("No, keep going."));
    assert_eq!(TurnRouter::default().after_grading(&s), RoutingDecision::Stop);
}

#[test]
fn configured_limit_replaces_default() {
    let router = TurnRouter::new(RoutingConfig::default().with_max_turns(3));
    let s = padded(4, Turn::grader("No."));
    assert_eq!(router.after_grading(&s), RoutingDecision::Stop);
    let s = padded(3, Turn::grader("No."));
    assert_eq!(router.after_grading(&s), RoutingDecision::ContinueToReasoning);
}

struct StrictVerdict;

impl VerdictPolicy for StrictVerdict {
    fn is_satisfied(&self, grader_text: &str) -> bool {
        grader_text.trim() == "VERDICT: complete"
    }
}

#[test]
fn custom_verdict_policy_replaces_keywords() {
    let router = TurnRouter::with_verdict(RoutingConfig::default(), Arc::new(StrictVerdict));
    let yes = state_with(vec![Turn::user("q"), Turn::grader("Yes, fully addressed.")]);
    assert_eq!(router.after_grading(&yes), RoutingDecision::ContinueToReasoning);
    let done = state_with(vec![Turn::user("q"), Turn::grader("VERDICT: complete")]);
    assert_eq!(router.after_grading(&done), RoutingDecision::Stop);
}

#[test]
fn keyword_verdict_matches_substrings() {
    let v = KeywordVerdict::default();
    assert!(v.is_satisfied("The answer covers all parts."));
    assert!(v.is_satisfied("It was ADDRESSED."));
    assert!(!v.is_satisfied("No, incomplete."));
}
