#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::path::PathBuf;

use super::Scroll;
use super::Transcript;
use crate::domain::models::Action;
use crate::domain::models::Conversation;
use crate::domain::models::ConversationSummary;
use crate::domain::models::DocumentState;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::Session;
use crate::domain::models::SlashCommand;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

/// What a submitted line of input turned into.
pub enum Submission {
    Exit,
    Pending(Action),
    Handled,
}

/// All mutable state behind the screen. Transitions are plain methods on
/// plain data so every flow can be unit tested without a terminal.
pub struct AppState {
    pub session: Session,
    pub conversation: Conversation,
    pub summaries: Vec<ConversationSummary>,
    pub sidebar_index: usize,
    pub focus: Focus,
    pub document: DocumentState,
    pub pending_delete: Option<String>,
    pub status_line: Option<String>,
    pub waiting_for_backend: bool,
    pub scroll: Scroll,
    pub last_known_width: u16,
    pub last_known_height: u16,
}

impl AppState {
    pub fn new(session: Session) -> AppState {
        return AppState {
            session,
            conversation: Conversation::new(),
            summaries: vec![],
            sidebar_index: 0,
            focus: Focus::Input,
            document: DocumentState::Idle,
            pending_delete: None,
            status_line: None,
            waiting_for_backend: false,
            scroll: Scroll::default(),
            last_known_width: 0,
            last_known_height: 0,
        };
    }

    pub fn set_rect(&mut self, width: u16, height: u16) {
        self.last_known_width = width;
        self.last_known_height = height;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.conversation.messages.push(message);
        self.sync_dependants();
        self.scroll.last();
    }

    /// Applies a worker result. Returns true when the UI loop should exit.
    pub fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::ChatReply(message) => {
                self.waiting_for_backend = false;
                self.add_message(message);
            }
            Event::HistoryLoaded { id, messages } => {
                self.conversation = Conversation::from_history(&id, messages);
                self.status_line = None;
                self.sync_dependants();
                self.scroll.last();
            }
            Event::HistoryFailed(detail) => {
                self.status_line = Some(detail);
            }
            Event::SummariesLoaded(summaries) => {
                self.summaries = summaries;
                self.clamp_sidebar_index();
            }
            Event::ConversationDeleted(id) => {
                self.summaries.retain(|summary| return summary.id != id);
                self.clamp_sidebar_index();
                self.pending_delete = None;
                if self.conversation.id == id {
                    self.start_new_conversation();
                }
                self.status_line = Some("Conversation deleted.".to_string());
            }
            Event::DeleteFailed(detail) => {
                self.pending_delete = None;
                self.status_line = Some(detail);
            }
            Event::DocumentReady {
                filename,
                uploaded_at,
            } => {
                self.document = DocumentState::Active {
                    filename,
                    uploaded_at,
                };
                self.status_line = Some("PDF processed and ready.".to_string());
            }
            Event::DocumentFailed { detail } => {
                self.document = DocumentState::Failed {
                    detail: detail.to_string(),
                };
                self.status_line = Some(detail);
            }
            Event::DocumentCleared => {
                self.document = DocumentState::Idle;
                self.status_line = Some("Document cleared.".to_string());
            }
            Event::DocumentClearFailed { detail } => {
                // Local state stays as-is so it cannot drift from the server.
                self.status_line = Some(detail);
            }
            Event::LoggedOut => {
                return true;
            }
            _ => {}
        }

        return false;
    }

    pub fn handle_submit(&mut self, text: &str) -> Submission {
        if let Some(command) = SlashCommand::parse(text) {
            if command.is_quit() {
                return Submission::Exit;
            }
            if command.is_logout() {
                return Submission::Pending(Action::Logout);
            }
            if command.is_new_conversation() {
                self.start_new_conversation();
                self.status_line = Some("Started a new conversation.".to_string());
                return Submission::Handled;
            }
            if command.is_upload() {
                return self.handle_upload_command(&command.args);
            }
            if command.is_clear_document() {
                return self.handle_clear_command();
            }
            if command.is_help() {
                self.add_message(Message::new(Role::Assistant, &super::actions::help_text()));
                return Submission::Handled;
            }
        }

        if self.waiting_for_backend {
            return Submission::Handled;
        }

        self.add_message(Message::new(Role::User, text));
        self.waiting_for_backend = true;

        return Submission::Pending(Action::SendPrompt {
            conversation_id: self.conversation.id.to_string(),
            text: text.to_string(),
            has_document: self.document.is_active(),
        });
    }

    pub fn start_new_conversation(&mut self) {
        self.conversation = Conversation::new();
        self.sync_dependants();
    }

    pub fn select_next(&mut self) {
        if !self.summaries.is_empty() && self.sidebar_index < self.summaries.len() - 1 {
            self.sidebar_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.sidebar_index = self.sidebar_index.saturating_sub(1);
    }

    pub fn open_selected(&mut self) -> Option<Action> {
        let summary = self.summaries.get(self.sidebar_index)?;
        return Some(Action::LoadHistory(summary.id.to_string()));
    }

    /// First half of the destructive-delete handshake. Nothing is sent to the
    /// server until the user confirms.
    pub fn request_delete(&mut self) {
        if let Some(summary) = self.summaries.get(self.sidebar_index) {
            self.pending_delete = Some(summary.id.to_string());
            self.status_line = Some(format!(
                "Delete '{}'? Press y to confirm, any other key to cancel.",
                summary.title
            ));
        }
    }

    pub fn confirm_delete(&mut self) -> Option<Action> {
        let id = self.pending_delete.take()?;
        return Some(Action::DeleteConversation(id));
    }

    pub fn decline_delete(&mut self) {
        if self.pending_delete.take().is_some() {
            self.status_line = Some("Deletion cancelled.".to_string());
        }
    }

    fn handle_upload_command(&mut self, args: &[String]) -> Submission {
        if args.is_empty() {
            self.status_line = Some("Usage: /upload PATH_TO_PDF".to_string());
            return Submission::Handled;
        }
        if self.document.is_uploading() {
            self.status_line = Some("An upload is already in progress.".to_string());
            return Submission::Handled;
        }

        let path = PathBuf::from(args.join(" "));
        let filename = path
            .file_name()
            .map(|name| return name.to_string_lossy().to_string())
            .unwrap_or_else(|| return args.join(" "));

        self.document = DocumentState::Uploading { filename };
        self.status_line = Some("Uploading and processing PDF...".to_string());
        return Submission::Pending(Action::UploadDocument(path));
    }

    fn handle_clear_command(&mut self) -> Submission {
        match self.document {
            DocumentState::Idle => {
                self.status_line = Some("No document to clear.".to_string());
                return Submission::Handled;
            }
            DocumentState::Uploading { .. } => {
                self.status_line =
                    Some("Wait for the current upload to finish first.".to_string());
                return Submission::Handled;
            }
            _ => {
                return Submission::Pending(Action::ClearDocument);
            }
        }
    }

    fn clamp_sidebar_index(&mut self) {
        if self.summaries.is_empty() {
            self.sidebar_index = 0;
        } else if self.sidebar_index >= self.summaries.len() {
            self.sidebar_index = self.summaries.len() - 1;
        }
    }

    fn sync_dependants(&mut self) {
        let line_count =
            Transcript::line_count(&self.conversation.messages, self.last_known_width);

        // Saturate rather than truncate; a wrapped-around count would break
        // the scroll clamp for very long transcripts.
        self.scroll.set_state(
            u16::try_from(line_count).unwrap_or(u16::MAX),
            self.last_known_height,
        );

        if self.waiting_for_backend {
            self.scroll.last();
        }
    }
}
