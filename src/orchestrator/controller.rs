//! Request dispatcher.
//!
//! Receives requests from the UI thread and runs each one on its own task,
//! posting the outcome back as soon as it resolves.

use crate::app::{perform, Outcome, Request};
use crate::backend::PostRepository;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Perform(Request),
    Quit,
}

/// Dispatch UI requests until the UI quits or hangs up.
///
/// Requests are not serialized and never cancelled: when a newer navigation
/// overtakes an older one, both outcomes are delivered in completion order.
pub(crate) async fn run_controller(
    repo: Arc<dyn PostRepository>,
    outcome_tx: UnboundedSender<Outcome>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            UiCommand::Perform(req) => {
                debug!(?req, "dispatching request");
                let repo = repo.clone();
                let tx = outcome_tx.clone();
                tokio::spawn(async move {
                    let outcome = perform(repo.as_ref(), req).await;
                    // The UI may already be gone; nothing left to render then.
                    let _ = tx.send(outcome);
                });
            }
            UiCommand::Quit => break,
        }
    }
    Ok(())
}
