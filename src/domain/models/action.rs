use std::path::PathBuf;

/// Requests sent from the UI loop to the worker task. Each one maps to a
/// single server round trip, except `UploadDocument` which also starts the
/// status poller.
pub enum Action {
    SendPrompt {
        conversation_id: String,
        text: String,
        has_document: bool,
    },
    LoadHistory(String),
    RefreshSummaries,
    DeleteConversation(String),
    UploadDocument(PathBuf),
    ClearDocument,
    Logout,
}
