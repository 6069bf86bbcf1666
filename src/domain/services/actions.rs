use anyhow::Result;
use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::credentials::CredentialStore;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::infrastructure::api::reply;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api::ClientError;
use crate::infrastructure::api::TaskStatusProbe;
use crate::infrastructure::api::UploadOutcome;
use crate::infrastructure::api::UploadWatcher;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Starts a new conversation.
- /upload (/u) [PATH_TO_PDF] - Uploads a PDF so answers can draw on it.
- /clear - Discards the uploaded PDF on the server.
- /logout - Ends your session and exits.
- /quit /exit (/q) - Exits without logging out.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Tab - Switch between the message box and the conversation list.
- Up/Down arrow - Scroll the transcript, or move through conversations when the list is focused.
- Enter - Send the message, or open the selected conversation.
- d - Delete the selected conversation (asks for confirmation).
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Exit immediately.
        "#;

    return text.trim().to_string();
}

fn error_message(err: &ClientError) -> Message {
    let text = match err {
        ClientError::Http { status, detail } => {
            format!(
                "Error: {status} - {}",
                detail.as_deref().unwrap_or("no detail provided")
            )
        }
        ClientError::Transport(inner) => format!("Unable to connect to server: {inner}"),
    };

    return Message::new_with_type(Role::Assistant, MessageType::Error, &text);
}

async fn refresh_summaries(client: &ApiClient, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    match client.list_chats().await {
        Ok(summaries) => {
            tx.send(Event::SummariesLoaded(summaries))?;
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to refresh conversation list");
        }
    }

    return Ok(());
}

async fn send_prompt(
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<Event>,
    conversation_id: &str,
    text: &str,
    has_document: bool,
) -> Result<()> {
    match client.send_message(text, conversation_id, has_document).await {
        Ok(chat_reply) => {
            let body = reply::extract_text(&chat_reply.response);
            let annotated = reply::annotate_source(&body, chat_reply.source.as_deref());
            tx.send(Event::ChatReply(Message::new(Role::Assistant, &annotated)))?;

            // The first message in a conversation makes it appear in the
            // sidebar, so the list is refreshed after every reply.
            refresh_summaries(client, tx).await?;
        }
        Err(err) => {
            tracing::error!(error = %err, "send failed");
            tx.send(Event::ChatReply(error_message(&err)))?;
        }
    }

    return Ok(());
}

async fn load_history(
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<Event>,
    conversation_id: &str,
) -> Result<()> {
    match client.chat_history(conversation_id).await {
        Ok(history) => {
            let messages = history
                .iter()
                .map(|entry| {
                    let text = reply::annotate_source(&entry.content, entry.source.as_deref());
                    return Message::new(entry.role, &text);
                })
                .collect::<Vec<Message>>();

            tx.send(Event::HistoryLoaded {
                id: conversation_id.to_string(),
                messages,
            })?;
        }
        Err(err) => {
            tracing::error!(error = %err, "history load failed");
            tx.send(Event::HistoryFailed(
                "Failed to load chat history.".to_string(),
            ))?;
        }
    }

    return Ok(());
}

async fn delete_conversation(
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<Event>,
    conversation_id: &str,
) -> Result<()> {
    match client.delete_chat(conversation_id).await {
        Ok(()) => {
            tx.send(Event::ConversationDeleted(conversation_id.to_string()))?;
        }
        Err(err) => {
            tracing::error!(error = %err, "delete failed");
            tx.send(Event::DeleteFailed("Failed to delete chat.".to_string()))?;
        }
    }

    return Ok(());
}

async fn clear_document(client: &ApiClient, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    match client.logout().await {
        Ok(()) => {
            tx.send(Event::DocumentCleared)?;
        }
        Err(err) => {
            tracing::error!(error = %err, "document clear failed");
            tx.send(Event::DocumentClearFailed {
                detail: "Failed to clear PDF data on server.".to_string(),
            })?;
        }
    }

    return Ok(());
}

fn watch_upload(
    client: ApiClient,
    tx: mpsc::UnboundedSender<Event>,
    task_id: String,
    filename: String,
) -> JoinHandle<()> {
    return tokio::spawn(async move {
        let probe = TaskStatusProbe::new(client, &task_id);
        let outcome = UploadWatcher::default().watch(&probe).await;

        let event = match outcome {
            UploadOutcome::Completed => Event::DocumentReady {
                filename,
                uploaded_at: Local::now(),
            },
            UploadOutcome::Failed { detail } => Event::DocumentFailed { detail },
        };

        if tx.send(event).is_err() {
            tracing::warn!("upload finished after the UI loop shut down");
        }
    });
}

/// Executes UI requests against the server, one at a time, off the render
/// loop. The only concurrent piece is the upload status poller, which runs as
/// its own task so chatting stays responsive while a PDF is ingested.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start<S: CredentialStore>(
        client: ApiClient,
        store: S,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut upload_task: Option<JoinHandle<()>> = None;

        while let Some(action) = rx.recv().await {
            match action {
                Action::SendPrompt {
                    conversation_id,
                    text,
                    has_document,
                } => {
                    send_prompt(&client, &tx, &conversation_id, &text, has_document).await?;
                }
                Action::LoadHistory(conversation_id) => {
                    load_history(&client, &tx, &conversation_id).await?;
                }
                Action::RefreshSummaries => {
                    refresh_summaries(&client, &tx).await?;
                }
                Action::DeleteConversation(conversation_id) => {
                    delete_conversation(&client, &tx, &conversation_id).await?;
                }
                Action::UploadDocument(path) => {
                    // A new upload supersedes any poller still watching the
                    // previous one.
                    if let Some(task) = upload_task.take() {
                        task.abort();
                    }

                    let filename = path
                        .file_name()
                        .map(|name| return name.to_string_lossy().to_string())
                        .unwrap_or_else(|| return path.to_string_lossy().to_string());

                    let bytes = match tokio::fs::read(&path).await {
                        Ok(bytes) => bytes,
                        Err(err) => {
                            tx.send(Event::DocumentFailed {
                                detail: format!("Failed to read {}: {err}", path.display()),
                            })?;
                            continue;
                        }
                    };

                    match client.upload_pdf(&filename, bytes).await {
                        Ok(task_id) => {
                            upload_task =
                                Some(watch_upload(client.clone(), tx.clone(), task_id, filename));
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "upload failed");
                            tx.send(Event::DocumentFailed {
                                detail: format!("Upload failed: {err}"),
                            })?;
                        }
                    }
                }
                Action::ClearDocument => {
                    clear_document(&client, &tx).await?;
                }
                Action::Logout => {
                    if let Err(err) = client.logout().await {
                        tracing::error!(error = %err, "server-side logout failed, clearing local session anyway");
                    }
                    if let Err(err) = store.clear().await {
                        tracing::error!(error = %err, "failed to clear persisted session");
                    }

                    tx.send(Event::LoggedOut)?;
                    break;
                }
            }
        }

        if let Some(task) = upload_task.take() {
            task.abort();
        }

        return Ok(());
    }
}
