use super::ConversationTurn;
use super::UploadState;

/// Published by the session controller after every state transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    Upload(UploadState),
    Turn(ConversationTurn),
}
