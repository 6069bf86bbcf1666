use chrono::DateTime;
use chrono::Local;
use tui_textarea::Input;

use super::ConversationSummary;
use super::Message;

/// Everything the UI loop reacts to: keyboard input muxed in from crossterm,
/// plus completions reported back by the worker task.
pub enum Event {
    // Worker results.
    ChatReply(Message),
    HistoryLoaded {
        id: String,
        messages: Vec<Message>,
    },
    HistoryFailed(String),
    SummariesLoaded(Vec<ConversationSummary>),
    ConversationDeleted(String),
    DeleteFailed(String),
    DocumentReady {
        filename: String,
        uploaded_at: DateTime<Local>,
    },
    DocumentFailed {
        detail: String,
    },
    DocumentCleared,
    DocumentClearFailed {
        detail: String,
    },
    LoggedOut,

    // Terminal input.
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardPaste(String),
    KeyboardTab(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
