//! `synth` binary: ask a research question, chat in a REPL, list tools, or serve HTTP.
//!
//! `synth ask` is the default: the question comes from `-m` or the positional words, and with
//! no question at all the REPL starts.

mod logging;
mod repl;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use cli::{question_from, render_answer, render_tools, write_json, AskJson};
use synth::agent::research::research_tool_registry;
use synth::{build_research_runner, ResearchBuildConfig, ResearchRunner, ToolSource};

#[derive(Parser, Debug)]
#[command(name = "synth")]
#[command(about = "Scientific research synthesizer: answers questions from papers, web search, Wikipedia and code")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// Research question (or pass it as positional words)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: the question when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Continue an existing session
    #[arg(long, global = true, value_name = "ID")]
    session_id: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Keep prompting for follow-up questions in the same session
    #[arg(short, long, global = true)]
    interactive: bool,

    /// Log to stderr (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Ask a question (the default when no subcommand is given)
    Ask(AskArgs),
    /// Serve the web form and JSON API
    Serve(ServeArgs),
    /// List the research tools offered to the model
    Tools,
}

#[derive(clap::Args, Debug, Clone)]
struct AskArgs {
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Listen address
    #[arg(long, value_name = "ADDR", default_value = serve::DEFAULT_ADDR)]
    addr: String,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(1);
}

async fn build_runner(config: &ResearchBuildConfig) -> ResearchRunner {
    build_research_runner(config)
        .await
        .unwrap_or_else(|e| fail(e))
}

async fn list_tools(config: &ResearchBuildConfig, json: bool, pretty: bool) {
    let registry = research_tool_registry(config).unwrap_or_else(|e| fail(e));
    let specs = registry.list_tools().await.unwrap_or_else(|e| fail(e));
    if json {
        write_json(&specs, pretty).unwrap_or_else(|e| fail(e));
    } else {
        println!("{}", render_tools(&specs));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if let Err(e) = config::load_and_apply("synth", None) {
        eprintln!("warning: config not loaded: {}", e);
    }
    let _log_guard = logging::init(args.verbose)?;

    let config = ResearchBuildConfig::from_env().unwrap_or_else(|e| fail(e));

    match args.cmd {
        Some(Command::Tools) => {
            list_tools(&config, args.json, args.pretty).await;
            return Ok(());
        }
        Some(Command::Serve(ref s)) => {
            let runner = build_runner(&config).await;
            if let Err(e) = serve::run_serve(Some(&s.addr), Arc::new(runner)).await {
                fail(e);
            }
            return Ok(());
        }
        Some(Command::Ask(_)) | None => {}
    }

    let question = match args.cmd {
        Some(Command::Ask(ref a)) => question_from(a.message.as_deref(), &a.rest),
        _ => question_from(args.message.as_deref(), &args.rest),
    };
    let runner = build_runner(&config).await;

    let Some(question) = question else {
        return repl::run_repl_loop(&runner, args.session_id, args.json).await;
    };

    let outcome = runner
        .ask(&question, args.session_id.as_deref())
        .await
        .unwrap_or_else(|e| fail(e));
    if args.json {
        write_json(&AskJson::from(&outcome), args.pretty)?;
    } else {
        println!("{}", render_answer(&outcome));
    }

    if args.interactive {
        repl::run_repl_loop(&runner, Some(outcome.session_id), args.json).await?;
    }
    Ok(())
}
