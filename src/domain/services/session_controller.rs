#[cfg(test)]
#[path = "session_controller_test.rs"]
mod tests;

use tokio::sync::mpsc;

use super::ConversationManager;
use super::UploadManager;
use crate::domain::models::Action;
use crate::domain::models::ClientError;
use crate::domain::models::ConversationTurn;
use crate::domain::models::DocumentFile;
use crate::domain::models::Event;
use crate::domain::models::QueryOutcome;
use crate::domain::models::SessionUpdate;
use crate::domain::models::UploadOutcome;
use crate::domain::models::UploadState;

/// Composes the upload and conversation managers into one session. The only
/// thing crossing between the two is whether the document is ready.
///
/// Requests leave through the `Action` channel towards the actions worker,
/// and their outcomes come back as `Event`s through `handle_event`. Every
/// transition is published to subscribers.
pub struct SessionController {
    uploads: UploadManager,
    conversation: ConversationManager,
    tx: mpsc::UnboundedSender<Action>,
    subscribers: Vec<mpsc::UnboundedSender<SessionUpdate>>,
}

impl SessionController {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> SessionController {
        return SessionController {
            uploads: UploadManager::default(),
            conversation: ConversationManager::default(),
            tx,
            subscribers: vec![],
        };
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionUpdate> {
        let (tx, rx) = mpsc::unbounded_channel::<SessionUpdate>();
        self.subscribers.push(tx);

        return rx;
    }

    pub fn upload_state(&self) -> &UploadState {
        return self.uploads.state();
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        return self.conversation.turns();
    }

    pub fn is_document_ready(&self) -> bool {
        return self.uploads.is_document_ready();
    }

    pub fn is_uploading(&self) -> bool {
        return self.uploads.is_busy();
    }

    pub fn is_asking(&self) -> bool {
        return self.conversation.is_busy();
    }

    pub fn is_busy(&self) -> bool {
        return self.is_uploading() || self.is_asking();
    }

    pub fn submit(&mut self, path: &str) -> Result<(), ClientError> {
        let res = self.uploads.submit(DocumentFile::new(path));
        if !matches!(res, Err(ClientError::UploadInProgress)) {
            self.publish_upload();
        }

        let file = res?;
        let file_name = file.file_name.to_string();
        if self.tx.send(Action::BackendUpload(file)).is_err() {
            tracing::error!("Actions worker is gone, failing upload");
            self.apply_upload_outcome(UploadOutcome {
                file_name,
                result: Err(ClientError::NetworkFailure(
                    "actions worker stopped".to_string(),
                )),
            });
        }

        return Ok(());
    }

    /// Blank text is a no-op even before the document is ready.
    pub fn ask(&mut self, text: &str) -> Result<(), ClientError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        if !self.is_document_ready() {
            return Err(ClientError::DocumentNotReady);
        }

        let question = match self.conversation.ask(text)? {
            Some(question) => question,
            None => return Ok(()),
        };

        let turn_id = question.turn_id;
        let turns_len = self.conversation.turns().len();
        for turn in self.conversation.turns()[turns_len - 2..].to_vec() {
            self.publish(SessionUpdate::Turn(turn));
        }

        if self.tx.send(Action::BackendQuery(question)).is_err() {
            tracing::error!("Actions worker is gone, failing question");
            self.apply_query_outcome(QueryOutcome {
                turn_id,
                result: Err(ClientError::NetworkFailure(
                    "actions worker stopped".to_string(),
                )),
            });
        }

        return Ok(());
    }

    /// Cancels the pending question and aborts its request.
    pub fn cancel_question(&mut self) -> bool {
        let turn_id = match self.conversation.cancel() {
            Some(turn_id) => turn_id,
            None => return false,
        };

        tracing::info!(turn_id = turn_id, "Question cancelled");
        self.publish_turn(turn_id);
        if let Err(err) = self.tx.send(Action::BackendAbort()) {
            tracing::warn!(turn_id = turn_id, error = ?err, "Actions worker is gone, nothing to abort");
        }

        return true;
    }

    pub fn apply_upload_outcome(&mut self, outcome: UploadOutcome) -> bool {
        if !self.uploads.complete(&outcome.file_name, outcome.result) {
            return false;
        }

        self.publish_upload();
        return true;
    }

    pub fn apply_query_outcome(&mut self, outcome: QueryOutcome) -> bool {
        if !self.conversation.complete(outcome.turn_id, outcome.result) {
            return false;
        }

        self.publish_turn(outcome.turn_id);
        return true;
    }

    /// Applies backend outcomes. Returns `false` for events that carry no
    /// outcome or whose outcome was stale.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::BackendUploadResponse(outcome) => return self.apply_upload_outcome(outcome),
            Event::BackendQueryResponse(outcome) => return self.apply_query_outcome(outcome),
            _ => return false,
        }
    }

    fn publish_upload(&mut self) {
        let state = self.uploads.state().clone();
        self.publish(SessionUpdate::Upload(state));
    }

    fn publish_turn(&mut self, turn_id: u64) {
        if let Some(turn) = self.conversation.turn(turn_id).cloned() {
            self.publish(SessionUpdate::Turn(turn));
        }
    }

    fn publish(&mut self, update: SessionUpdate) {
        self.subscribers
            .retain(|subscriber| return subscriber.send(update.clone()).is_ok());
    }
}
