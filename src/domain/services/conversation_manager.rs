#[cfg(test)]
#[path = "conversation_manager_test.rs"]
mod tests;

use crate::domain::models::Answer;
use crate::domain::models::ClientError;
use crate::domain::models::ConversationTurn;
use crate::domain::models::Question;
use crate::domain::models::Role;

/// Owns the transcript. Turns are only ever appended, and an assistant turn
/// only ever changes while it is pending.
#[derive(Default)]
pub struct ConversationManager {
    turns: Vec<ConversationTurn>,
    last_id: u64,
    pending: Option<u64>,
}

impl ConversationManager {
    pub fn turns(&self) -> &[ConversationTurn] {
        return &self.turns;
    }

    pub fn turn(&self, id: u64) -> Option<&ConversationTurn> {
        return self.turns.iter().find(|turn| return turn.id == id);
    }

    pub fn is_busy(&self) -> bool {
        return self.pending.is_some();
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        return self.last_id;
    }

    /// Appends a user turn and its pending assistant turn, returning the
    /// question the caller must send. Blank text is a no-op and returns
    /// `Ok(None)`. Questions are serialized: asking while another question is
    /// pending is rejected.
    pub fn ask(&mut self, text: &str) -> Result<Option<Question>, ClientError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if let Some(turn_id) = self.pending {
            tracing::warn!(pending_turn_id = turn_id, "Question rejected, another is pending");
            return Err(ClientError::QuestionPending);
        }

        let user_id = self.next_id();
        self.turns.push(ConversationTurn::user(user_id, trimmed));

        let assistant_id = self.next_id();
        self.turns.push(ConversationTurn::pending(assistant_id));
        self.pending = Some(assistant_id);

        tracing::info!(turn_id = assistant_id, "Asking question");

        return Ok(Some(Question {
            turn_id: assistant_id,
            text: trimmed.to_string(),
        }));
    }

    /// Applies the backend outcome to the assistant turn `turn_id`, whatever
    /// its position in the transcript. Returns `false` when there is no such
    /// pending turn, which is the case for stale or duplicate responses.
    pub fn complete(&mut self, turn_id: u64, result: Result<Answer, ClientError>) -> bool {
        let turn = match self
            .turns
            .iter_mut()
            .find(|turn| return turn.id == turn_id && turn.role == Role::Assistant)
        {
            Some(turn) => turn,
            None => {
                tracing::debug!(turn_id = turn_id, "Dropping response for unknown turn");
                return false;
            }
        };

        if !turn.is_pending() {
            tracing::debug!(turn_id = turn_id, "Dropping response for settled turn");
            return false;
        }

        match result {
            Ok(answer) if !answer.text.trim().is_empty() => {
                tracing::info!(
                    turn_id = turn_id,
                    sources = answer.sources.len(),
                    "Question answered"
                );
                turn.resolve(answer);
            }
            Ok(_) => {
                tracing::error!(turn_id = turn_id, "Backend answered with blank text");
                turn.fail(&ClientError::GenericFailure.answer_message());
            }
            Err(err) => {
                tracing::error!(turn_id = turn_id, error = ?err, "Question failed");
                turn.fail(&err.answer_message());
            }
        }

        if self.pending == Some(turn_id) {
            self.pending = None;
        }

        return true;
    }

    /// Errors the pending question, if any, and returns its turn id.
    pub fn cancel(&mut self) -> Option<u64> {
        let turn_id = self.pending?;
        self.complete(turn_id, Err(ClientError::Cancelled));

        return Some(turn_id);
    }
}
