//! Output formatting shared by the `synth` binary: answer text, JSON envelopes and tool listings.

use serde::Serialize;
use synth::{AskOutcome, ToolSpec, ANSWER_HEADER};

/// Question from `-m/--message`, else the joined positional words. Blank input gives `None`.
pub fn question_from(message: Option<&str>, rest: &[String]) -> Option<String> {
    let q = match message {
        Some(m) => m.to_string(),
        None => rest.join(" "),
    };
    let q = q.trim();
    (!q.is_empty()).then(|| q.to_string())
}

/// Plain-text rendering: header plus answer, or the "no answer" warning alone.
pub fn render_answer(outcome: &AskOutcome) -> String {
    if outcome.answer.is_answered() {
        format!("{}\n\n{}", ANSWER_HEADER, outcome.answer)
    } else {
        outcome.answer.to_string()
    }
}

/// `--json` output for one interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskJson {
    pub session_id: String,
    pub answer: String,
    pub answered: bool,
    pub turn_count: usize,
}

impl From<&AskOutcome> for AskJson {
    fn from(outcome: &AskOutcome) -> Self {
        Self {
            session_id: outcome.session_id.clone(),
            answer: outcome.answer.as_text().to_string(),
            answered: outcome.answer.is_answered(),
            turn_count: outcome.turn_count,
        }
    }
}

/// One line per tool: `name  description` (first line of the description only).
pub fn render_tools(specs: &[ToolSpec]) -> String {
    let width = specs.iter().map(|s| s.name.len()).max().unwrap_or(0);
    specs
        .iter()
        .map(|s| {
            let desc = s
                .description
                .as_deref()
                .and_then(|d| d.lines().next())
                .unwrap_or("");
            format!("{:width$}  {}", s.name, truncate_message(desc, 100), width = width)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes JSON to stdout; multi-line when `pretty`.
pub fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", s);
    Ok(())
}

/// Truncates `s` to at most `max` chars, ending in `...` when cut. Char-boundary safe.
pub fn truncate_message(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= SUFFIX.len() {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - SUFFIX.len()).collect();
    out.push_str(SUFFIX);
    out
}
