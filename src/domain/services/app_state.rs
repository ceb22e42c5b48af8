#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::BubbleList;
use super::Scroll;
use super::SessionController;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::ClientError;
use crate::domain::models::Event;
use crate::domain::models::Notice;
use crate::domain::models::NoticeType;
use crate::domain::models::SlashCommand;
use crate::domain::models::UploadOutcome;

pub struct AppState {
    pub bubble_list: BubbleList,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub notice: Option<Notice>,
    pub scroll: Scroll,
    pub session: SessionController,
}

impl AppState {
    pub fn from_session(session: SessionController) -> AppState {
        return AppState {
            bubble_list: BubbleList::default(),
            last_known_height: 0,
            last_known_width: 0,
            notice: None,
            scroll: Scroll::default(),
            session,
        };
    }

    /// Checks the backend is reachable, then starts uploading `file` when
    /// one was given on the command line.
    pub async fn new(
        backend: &BackendBox,
        tx: mpsc::UnboundedSender<Action>,
        file: &str,
    ) -> AppState {
        let mut app_state = AppState::from_session(SessionController::new(tx));

        if let Err(err) = backend.health_check().await {
            app_state.notice = Some(Notice::new_with_type(
                NoticeType::Error,
                &format!("The AskMyDocs backend isn't reachable, uploads and questions will fail until it is. Error: {err}"),
            ));
        }

        if !file.trim().is_empty() {
            app_state.upload(file);
        }

        return app_state;
    }

    /// Handles a submitted line from the input box. Returns `true` when the
    /// session should end.
    pub fn handle_input(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        if let Some(command) = SlashCommand::parse(text) {
            if command.is_quit() {
                return true;
            }

            if command.is_help() {
                self.notice = Some(Notice::new(&help_text()));
                return false;
            }

            if command.is_upload() {
                match command.upload_path() {
                    Some(path) => self.upload(&path),
                    None => {
                        self.notice = Some(Notice::new_with_type(
                            NoticeType::Error,
                            "Usage: /upload PATH",
                        ));
                    }
                }
                return false;
            }
        }

        match self.session.ask(text) {
            Ok(()) => self.notice = None,
            Err(err) => {
                self.notice = Some(Notice::new_with_type(NoticeType::Error, &err.to_string()));
            }
        }

        self.sync_dependants();
        self.scroll.last();
        return false;
    }

    fn upload(&mut self, path: &str) {
        match self.session.submit(path) {
            Err(ClientError::UploadInProgress) => {
                self.notice = Some(Notice::new_with_type(
                    NoticeType::Error,
                    &ClientError::UploadInProgress.to_string(),
                ));
            }
            // Any other rejection is already reflected in the upload state.
            _ => self.notice = None,
        }
    }

    /// Cancels the question waiting on an answer. Returns `false` when
    /// nothing was pending.
    pub fn cancel(&mut self) -> bool {
        if !self.session.cancel_question() {
            return false;
        }

        self.notice = Some(Notice::new(&ClientError::Cancelled.to_string()));
        self.sync_dependants();
        return true;
    }

    pub fn handle_backend_event(&mut self, event: Event) {
        let confirmation = match &event {
            Event::BackendUploadResponse(UploadOutcome {
                file_name,
                result: Ok(receipt),
            }) => receipt.chunks.map(|chunks| {
                return format!("{file_name} was split into {chunks} chunks for retrieval.");
            }),
            _ => None,
        };

        if self.session.handle_event(event) {
            if let Some(text) = confirmation {
                self.notice = Some(Notice::new(&text));
            }
            self.sync_dependants();
            self.scroll.last();
        }
    }

    /// Text for the loading panel shown in place of the input box.
    pub fn loading_text(&self) -> Option<String> {
        if self.session.is_asking() {
            return Some("Waiting for an answer... (CTRL+C to cancel)".to_string());
        }

        if self.session.is_uploading() {
            return Some(self.session.upload_state().status_text());
        }

        return None;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_turns(self.session.turns(), self.last_known_width.into());

        self.scroll.set_state(
            self.bubble_list.len().try_into().unwrap_or(u16::MAX),
            self.last_known_height,
        );
    }
}
