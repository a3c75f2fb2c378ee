//! Continuation and termination rules of the research loop.
//!
//! Both rules are pure functions of the conversation state (its turns and their count), so
//! routing can be replayed from any saved transcript.
//!
//! - After reasoning: final marker → grade; tool calls → act; else grade (the loop guard
//!   also leads to grading, so it needs no branch of its own).
//! - After grading: verdict satisfied → stop; loop guard → stop; else reason again.
//!
//! Pending tool calls always run, also in long resumed sessions. A model that never stops
//! requesting tools is bounded by the graph's recursion limit, not by the turn count.

use std::sync::Arc;

use crate::graph::END;
use crate::state::ConversationState;

pub const NODE_REASON: &str = "reason";
pub const NODE_ACT: &str = "act";
pub const NODE_GRADE: &str = "grade";

pub const DEFAULT_MAX_TURNS: usize = 20;
pub const DEFAULT_FINAL_MARKERS: &[&str] = &["final answer:", "final summary:"];
pub const DEFAULT_STOP_KEYWORDS: &[&str] =
    &["yes", "fully", "addressed", "fully answered", "covers all"];
pub const DEFAULT_GIVE_UP_PHRASES: &[&str] = &["i don't know"];

/// Where the loop goes next. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    ContinueToTool,
    ContinueToGrader,
    ContinueToReasoning,
    Stop,
}

impl RoutingDecision {
    /// Graph node id (or `END`) for this decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContinueToTool => NODE_ACT,
            Self::ContinueToGrader => NODE_GRADE,
            Self::ContinueToReasoning => NODE_REASON,
            Self::Stop => END,
        }
    }
}

/// Thresholds and phrase lists used by the rules. Phrases are matched lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Loop guard: once the transcript has more turns than this, the loop winds down.
    pub max_turns: usize,
    /// Markers in an assistant turn that send it straight to grading.
    pub final_markers: Vec<String>,
    /// Grader phrases meaning the answer is complete.
    pub stop_keywords: Vec<String>,
    /// Grader phrases meaning no better answer will come.
    pub give_up_phrases: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            final_markers: owned(DEFAULT_FINAL_MARKERS),
            stop_keywords: owned(DEFAULT_STOP_KEYWORDS),
            give_up_phrases: owned(DEFAULT_GIVE_UP_PHRASES),
        }
    }
}

impl RoutingConfig {
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// Lower-cases and folds typographic apostrophes so "I don’t know" matches "i don't know".
fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(&normalize(n)))
}

/// Decides whether a grader review ends the interaction.
pub trait VerdictPolicy: Send + Sync {
    fn is_satisfied(&self, grader_text: &str) -> bool;
}

/// Substring match on stop keywords and give-up phrases, so "yes" also matches inside
/// "eyes". Use another `VerdictPolicy` for stricter grading.
#[derive(Debug, Clone)]
pub struct KeywordVerdict {
    stop_keywords: Vec<String>,
    give_up_phrases: Vec<String>,
}

impl KeywordVerdict {
    pub fn new(stop_keywords: Vec<String>, give_up_phrases: Vec<String>) -> Self {
        Self {
            stop_keywords,
            give_up_phrases,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.stop_keywords.clone(), config.give_up_phrases.clone())
    }
}

impl Default for KeywordVerdict {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

impl VerdictPolicy for KeywordVerdict {
    fn is_satisfied(&self, grader_text: &str) -> bool {
        let text = normalize(grader_text);
        contains_any(&text, &self.stop_keywords) || contains_any(&text, &self.give_up_phrases)
    }
}

/// Applies the continuation and termination rules.
#[derive(Clone)]
pub struct TurnRouter {
    config: RoutingConfig,
    verdict: Arc<dyn VerdictPolicy>,
}

impl TurnRouter {
    /// Router with the keyword verdict built from `config`.
    pub fn new(config: RoutingConfig) -> Self {
        let verdict = Arc::new(KeywordVerdict::from_config(&config));
        Self { config, verdict }
    }

    pub fn with_verdict(config: RoutingConfig, verdict: Arc<dyn VerdictPolicy>) -> Self {
        Self { config, verdict }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    fn over_limit(&self, state: &ConversationState) -> bool {
        state.turn_count() > self.config.max_turns
    }

    /// Continuation rule, applied to the latest (assistant) turn.
    pub fn after_reasoning(&self, state: &ConversationState) -> RoutingDecision {
        let Some(last) = state.last_turn() else {
            return RoutingDecision::ContinueToGrader;
        };
        if contains_any(&normalize(&last.text), &self.config.final_markers) {
            return RoutingDecision::ContinueToGrader;
        }
        if last.has_tool_calls() {
            return RoutingDecision::ContinueToTool;
        }
        // Past the loop guard or not, a turn without tool calls is graded.
        RoutingDecision::ContinueToGrader
    }

    /// Termination rule, applied to the latest (grader) turn.
    pub fn after_grading(&self, state: &ConversationState) -> RoutingDecision {
        let text = state.last_turn().map(|t| t.text.as_str()).unwrap_or("");
        if self.verdict.is_satisfied(text) {
            return RoutingDecision::Stop;
        }
        if self.over_limit(state) {
            return RoutingDecision::Stop;
        }
        RoutingDecision::ContinueToReasoning
    }
}

impl Default for TurnRouter {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ToolCall, Turn};

    fn call(name: &str) -> ToolCall {
        ToolCall {
            name: name.into(),
            arguments: "{}".into(),
            id: None,
        }
    }

    fn state_with(turns: Vec<Turn>) -> ConversationState {
        let mut s = ConversationState::new("t");
        for t in turns {
            s.push(t);
        }
        s
    }

    #[test]
    fn decision_maps_to_node_ids() {
        assert_eq!(RoutingDecision::ContinueToTool.as_str(), "act");
        assert_eq!(RoutingDecision::ContinueToGrader.as_str(), "grade");
        assert_eq!(RoutingDecision::ContinueToReasoning.as_str(), "reason");
        assert_eq!(RoutingDecision::Stop.as_str(), END);
    }

    #[test]
    fn final_marker_wins_over_tool_calls() {
        let s = state_with(vec![
            Turn::user("q"),
            Turn::assistant("FINAL ANSWER: done", vec![call("arxiv_search")]),
        ]);
        assert_eq!(
            TurnRouter::default().after_reasoning(&s),
            RoutingDecision::ContinueToGrader
        );
    }

    #[test]
    fn curly_apostrophe_give_up_stops() {
        let s = state_with(vec![Turn::user("q"), Turn::grader("I don\u{2019}t know.")]);
        assert_eq!(TurnRouter::default().after_grading(&s), RoutingDecision::Stop);
    }

    #[test]
    fn empty_state_routes_to_grader() {
        let s = ConversationState::new("t");
        assert_eq!(
            TurnRouter::default().after_reasoning(&s),
            RoutingDecision::ContinueToGrader
        );
    }

    struct Never;
    impl VerdictPolicy for Never {
        fn is_satisfied(&self, _: &str) -> bool {
            false
        }
    }

    #[test]
    fn custom_verdict_replaces_keywords() {
        let router = TurnRouter::with_verdict(RoutingConfig::default(), Arc::new(Never));
        let s = state_with(vec![Turn::user("q"), Turn::grader("YES")]);
        assert_eq!(router.after_grading(&s), RoutingDecision::ContinueToReasoning);
    }
}
