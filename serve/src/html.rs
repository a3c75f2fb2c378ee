//! Server-rendered page for the question form. All user and model text is escaped.

use html_escape::{encode_double_quoted_attribute, encode_text};

use synth::{ANSWER_HEADER, NO_ANSWER_MESSAGE};

pub(crate) const TITLE: &str = "🔬 Scientific Research Synthesizer Agent";
pub(crate) const INTRO: &str = "Ask research-heavy questions, get answers based on academic papers, web search, Wikipedia, code/calculations, and more.";
pub(crate) const EXAMPLE_QUESTION: &str = "Summarize the latest advances in CRISPR gene editing, compare at least two newly published papers’ main findings, and check for active clinical trial studies.";

/// What the area below the form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageResult {
    None,
    Answer(String),
    NoAnswer,
    Error(String),
}

pub(crate) struct PageView<'a> {
    /// Hidden field; follow-up questions continue this session.
    pub session_id: &'a str,
    /// Textarea content.
    pub question: &'a str,
    pub result: PageResult,
}

pub(crate) fn render_page(view: &PageView<'_>) -> String {
    let result = match &view.result {
        PageResult::None => String::new(),
        PageResult::Answer(text) => format!(
            "<section class=\"answer\"><h3>{}</h3><div class=\"text\">{}</div></section>",
            encode_text(ANSWER_HEADER),
            encode_text(text)
        ),
        PageResult::NoAnswer => format!(
            "<section class=\"warning\">{}</section>",
            encode_text(NO_ANSWER_MESSAGE)
        ),
        PageResult::Error(msg) => format!(
            "<section class=\"error\">The research run failed: {}</section>",
            encode_text(msg)
        ),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; }}
textarea {{ width: 100%; min-height: 8rem; }}
.text {{ white-space: pre-wrap; }}
.warning {{ background: #fff4d6; padding: 0.75rem; }}
.error {{ background: #fde2e2; padding: 0.75rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{intro}</p>
<form method="post" action="/ask" onsubmit="this.querySelector('button').textContent='Synthesizing answer...'">
<label for="question">Your research question:</label>
<textarea id="question" name="question">{question}</textarea>
<input type="hidden" name="session_id" value="{session_id}">
<button type="submit">Ask Agent</button>
<a href="/">New session</a>
</form>
{result}
</body>
</html>
"#,
        title = encode_text(TITLE),
        intro = encode_text(INTRO),
        question = encode_text(view.question),
        session_id = encode_double_quoted_attribute(view.session_id),
        result = result,
    )
}
