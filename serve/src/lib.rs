//! HTTP front end for the research runner (axum).
//!
//! Serves a question form at `/` and a JSON endpoint at `/api/ask`; both drive the same
//! [`ResearchRunner`](synth::ResearchRunner). Default address `127.0.0.1:8501`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`router`].

mod app;
mod html;
mod response;

use std::sync::Arc;

use synth::ResearchRunner;
use tokio::net::TcpListener;
use tracing::info;

pub use app::router;
pub use response::{ApiAskRequest, ApiAskResponse, ErrorBody};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8501";

pub type ServeError = Box<dyn std::error::Error + Send + Sync>;

/// Serves on an existing listener until Ctrl-C. Tests bind `127.0.0.1:0` and pass it in.
pub async fn run_serve_on_listener(
    listener: TcpListener,
    runner: Arc<ResearchRunner>,
) -> Result<(), ServeError> {
    let addr = listener.local_addr()?;
    info!("research server listening on http://{}", addr);
    axum::serve(listener, router(runner))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    info!("research server stopped");
    Ok(())
}

/// Binds `addr` (default [`DEFAULT_ADDR`]) and serves.
pub async fn run_serve(addr: Option<&str>, runner: Arc<ResearchRunner>) -> Result<(), ServeError> {
    let listener = TcpListener::bind(addr.unwrap_or(DEFAULT_ADDR)).await?;
    run_serve_on_listener(listener, runner).await
}
