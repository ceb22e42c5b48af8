#[cfg(test)]
#[path = "turn_test.rs"]
mod tests;

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum Role {
    #[strum(serialize = "You")]
    User,
    Assistant,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    Pending,
    Resolved,
    Errored,
}

/// Backend supplied label pointing back into the uploaded document. Both
/// fields are opaque to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Citation {
    pub document: String,
    pub section: String,
}

impl Citation {
    pub fn new(document: &str, section: &str) -> Citation {
        return Citation {
            document: document.to_string(),
            section: section.to_string(),
        };
    }

    pub fn label(&self) -> String {
        return format!("{} - {}", self.document, self.section);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<Citation>,
}

/// A question on its way to the backend, tagged with the assistant turn its
/// answer belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub turn_id: u64,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationTurn {
    pub id: u64,
    pub role: Role,
    pub text: String,
    pub sources: Vec<Citation>,
    pub status: TurnStatus,
}

impl ConversationTurn {
    pub fn user(id: u64, text: &str) -> ConversationTurn {
        return ConversationTurn {
            id,
            role: Role::User,
            text: text.to_string(),
            sources: vec![],
            status: TurnStatus::Resolved,
        };
    }

    pub fn pending(id: u64) -> ConversationTurn {
        return ConversationTurn {
            id,
            role: Role::Assistant,
            text: "".to_string(),
            sources: vec![],
            status: TurnStatus::Pending,
        };
    }

    pub fn is_pending(&self) -> bool {
        return self.status == TurnStatus::Pending;
    }

    pub fn resolve(&mut self, answer: Answer) {
        self.text = answer.text;
        self.sources = answer.sources;
        self.status = TurnStatus::Resolved;
    }

    pub fn fail(&mut self, message: &str) {
        self.text = message.to_string();
        self.sources = vec![];
        self.status = TurnStatus::Errored;
    }
}
