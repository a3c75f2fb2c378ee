//! Interactive loop: read a question from stdin, answer it, repeat until EOF or quit.
//!
//! All questions share one session so follow-ups see the earlier turns.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use cli::{render_answer, write_json, AskJson};
use synth::{new_session_id, ResearchRunner};

fn is_quit_command(line: &str) -> bool {
    matches!(line.trim(), "quit" | "exit" | "/quit")
}

/// Runs the REPL. A failed question is reported on stderr and the loop continues.
pub async fn run_repl_loop(
    runner: &ResearchRunner,
    session_id: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session_id = session_id.unwrap_or_else(new_session_id);
    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("Session {} (type quit to exit)", session_id);

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match reader.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        eprintln!("Synthesizing answer...");
        match runner.ask(&line, Some(&session_id)).await {
            Ok(outcome) => {
                session_id = outcome.session_id.clone();
                if json {
                    write_json(&AskJson::from(&outcome), false)?;
                } else {
                    println!("{}\n", render_answer(&outcome));
                }
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }
    println!("Bye.");
    Ok(())
}
