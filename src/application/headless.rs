#[cfg(test)]
#[path = "headless_test.rs"]
mod tests;

use std::io::Write;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::Role;
use crate::domain::models::SessionUpdate;
use crate::domain::models::TurnStatus;
use crate::domain::services::actions::ActionsService;
use crate::domain::services::SessionController;

fn print_updates<W: Write>(
    updates: &mut mpsc::UnboundedReceiver<SessionUpdate>,
    out: &mut W,
) -> Result<()> {
    while let Ok(update) = updates.try_recv() {
        match update {
            SessionUpdate::Upload(state) => {
                writeln!(out, "{}", state.status_text())?;
            }
            SessionUpdate::Turn(turn) => {
                if turn.is_pending() {
                    continue;
                }

                writeln!(out, "{}: {}", turn.role, turn.text)?;
                if turn.role == Role::Assistant
                    && turn.status == TurnStatus::Resolved
                    && !turn.sources.is_empty()
                {
                    writeln!(out, "Sources:")?;
                    for citation in &turn.sources {
                        writeln!(out, "- {}", citation.label())?;
                    }
                }
            }
        }
    }

    return Ok(());
}

async fn settle(
    session: &mut SessionController,
    events: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    while session.is_busy() {
        match events.recv().await {
            Some(event) => {
                session.handle_event(event);
            }
            None => bail!("Actions worker stopped before the session settled"),
        }
    }

    return Ok(());
}

/// Uploads `file` then asks each question in turn, printing every session
/// update to `out`. Returns `false` when the upload failed and nothing was
/// asked.
pub async fn run<W: Write>(
    backend: BackendBox,
    file: &str,
    questions: Vec<String>,
    out: &mut W,
) -> Result<bool> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let worker = tokio::spawn(async move {
        return ActionsService::start(backend, event_tx, &mut action_rx).await;
    });

    let mut session = SessionController::new(action_tx);
    let mut updates = session.subscribe();

    // Rejections are reflected in the upload state printed below.
    let _ = session.submit(file);
    settle(&mut session, &mut event_rx).await?;
    print_updates(&mut updates, out)?;

    if !session.is_document_ready() {
        worker.abort();
        return Ok(false);
    }

    for question in questions {
        if let Err(err) = session.ask(&question) {
            writeln!(out, "Skipping \"{question}\": {err}")?;
            continue;
        }

        settle(&mut session, &mut event_rx).await?;
        print_updates(&mut updates, out)?;
    }

    worker.abort();
    return Ok(true);
}
