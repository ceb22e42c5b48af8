#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::fs;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::ClientError;
use crate::domain::models::DocumentFile;
use crate::domain::models::DocumentUpload;
use crate::domain::models::Event;
use crate::domain::models::QueryOutcome;
use crate::domain::models::UploadOutcome;
use crate::domain::models::UploadReceipt;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /upload (/u) [PATH] - Uploads a PDF to the backend. Questions unlock once the upload succeeds. Uploading again replaces the current document.
- /quit /exit (/q) - Exit AskMyDocs.
- /help (/h) - Provides this help menu.
- Anything else is sent as a question about the uploaded document.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Cancel the question waiting on an answer if there is one, otherwise exit.
        "#;

    return text.trim().to_string();
}

async fn upload(backend: &BackendBox, file: &DocumentFile) -> Result<UploadReceipt, ClientError> {
    let bytes = fs::read(&file.path).await.map_err(|err| {
        return ClientError::FileRead {
            path: file.path.to_string_lossy().to_string(),
            reason: err.to_string(),
        };
    })?;

    tracing::debug!(
        file_name = file.file_name,
        bytes = bytes.len(),
        "Sending document"
    );

    return backend
        .upload(DocumentUpload {
            file_name: file.file_name.to_string(),
            bytes,
        })
        .await;
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs backend requests for the session. Each request reports back with
    /// exactly one event. Returns once the action channel closes.
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend = Arc::new(backend);

        // Lazy default.
        let mut query_worker: JoinHandle<Result<()>> = tokio::spawn(async {
            return Ok(());
        });

        while let Some(action) = rx.recv().await {
            let worker_tx = tx.clone();
            let worker_backend = backend.clone();

            match action {
                Action::BackendAbort() => {
                    query_worker.abort();
                }
                Action::BackendQuery(question) => {
                    query_worker = tokio::spawn(async move {
                        let result = worker_backend.query(&question.text).await;
                        worker_tx.send(Event::BackendQueryResponse(QueryOutcome {
                            turn_id: question.turn_id,
                            result,
                        }))?;

                        return Ok(());
                    });
                }
                Action::BackendUpload(file) => {
                    tokio::spawn(async move {
                        let result = upload(&worker_backend, &file).await;
                        worker_tx.send(Event::BackendUploadResponse(UploadOutcome {
                            file_name: file.file_name,
                            result,
                        }))?;

                        return Ok::<(), anyhow::Error>(());
                    });
                }
            }
        }

        return Ok(());
    }
}
