use anyhow::Result;

use super::ApiClient;
use super::ChatListResponse;
use super::ChatReply;
use super::ChatSummaryResponse;
use super::ClientError;
use super::HistoryMessage;
use super::HistoryResponse;
use super::LoginResponse;
use super::TaskStatus;
use super::UploadAccepted;
use crate::domain::models::Role;

fn authed(url: String) -> ApiClient {
    return ApiClient::new(&url).with_token("abc");
}

#[tokio::test]
async fn it_registers_an_account() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/register").with_status(201).create();

    let client = ApiClient::new(&server.url());
    let res = client.register("user@example.com", "hunter2").await;

    assert!(res.is_ok());
    mock.assert();
}

#[tokio::test]
async fn it_surfaces_register_detail_on_failure() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/register")
        .with_status(400)
        .with_body(r#"{"detail": "Email already registered"}"#)
        .create();

    let client = ApiClient::new(&server.url());
    let err = client
        .register("user@example.com", "hunter2")
        .await
        .unwrap_err();
    mock.assert();

    match err {
        ClientError::Http { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail, Some("Email already registered".to_string()));
        }
        _ => panic!("Wrong error kind"),
    }
}

#[tokio::test]
async fn it_logs_in_and_returns_a_token() -> Result<()> {
    let body = serde_json::to_string(&LoginResponse {
        access_token: "token123".to_string(),
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/login")
        .with_status(200)
        .with_body(body)
        .create();

    let client = ApiClient::new(&server.url());
    let token = client.login("user@example.com", "hunter2").await?;
    mock.assert();

    assert_eq!(token, "token123");
    return Ok(());
}

#[tokio::test]
async fn it_fails_login_with_detail() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/login")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid credentials"}"#)
        .create();

    let client = ApiClient::new(&server.url());
    let err = client
        .login("user@example.com", "wrong")
        .await
        .unwrap_err();
    mock.assert();

    match err {
        ClientError::Http { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, Some("Invalid credentials".to_string()));
        }
        _ => panic!("Wrong error kind"),
    }
}

#[tokio::test]
async fn it_reports_transport_failures_distinctly() {
    // Nothing listens on port 1.
    let client = ApiClient::new("http://127.0.0.1:1");
    let err = client.logout().await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn it_attaches_the_bearer_token() -> Result<()> {
    let body = serde_json::to_string(&ChatListResponse {
        chats: vec![ChatSummaryResponse {
            chat_id: "chat-1".to_string(),
            title: "Rust questions".to_string(),
        }],
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/list_chats")
        .match_header("Authorization", "Bearer abc")
        .with_status(200)
        .with_body(body)
        .create();

    let client = authed(server.url());
    let summaries = client.list_chats().await?;
    mock.assert();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, "chat-1");
    assert_eq!(summaries[0].title, "Rust questions");
    return Ok(());
}

#[tokio::test]
async fn it_fetches_chat_history_with_sources() -> Result<()> {
    let body = serde_json::to_string(&HistoryResponse {
        messages: vec![
            HistoryMessage {
                role: Role::User,
                content: "What does the paper say?".to_string(),
                source: None,
            },
            HistoryMessage {
                role: Role::Assistant,
                content: "It says hello.".to_string(),
                source: Some("rag".to_string()),
            },
        ],
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/chat_history/chat-1")
        .match_header("Authorization", "Bearer abc")
        .with_status(200)
        .with_body(body)
        .create();

    let client = authed(server.url());
    let messages = client.chat_history("chat-1").await?;
    mock.assert();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].source, Some("rag".to_string()));
    return Ok(());
}

#[tokio::test]
async fn it_deletes_a_chat() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("DELETE", "/chat/chat-1")
        .match_header("Authorization", "Bearer abc")
        .with_status(200)
        .create();

    let client = authed(server.url());
    let res = client.delete_chat("chat-1").await;

    assert!(res.is_ok());
    mock.assert();
}

#[tokio::test]
async fn it_sends_a_message() -> Result<()> {
    let body = serde_json::to_string(&ChatReply {
        response: serde_json::Value::String("Hello back".to_string()),
        source: Some("general".to_string()),
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat")
        .match_header("Authorization", "Bearer abc")
        .match_body(mockito::Matcher::JsonString(
            r#"{"query": "Hello", "chat_id": "chat-1", "has_pdf": true}"#.to_string(),
        ))
        .with_status(200)
        .with_body(body)
        .create();

    let client = authed(server.url());
    let reply = client.send_message("Hello", "chat-1", true).await?;
    mock.assert();

    assert_eq!(
        reply.response,
        serde_json::Value::String("Hello back".to_string())
    );
    assert_eq!(reply.source, Some("general".to_string()));
    return Ok(());
}

#[tokio::test]
async fn it_surfaces_send_failures_with_detail() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat")
        .with_status(500)
        .with_body(r#"{"detail": "Model overloaded"}"#)
        .create();

    let client = authed(server.url());
    let err = client
        .send_message("Hello", "chat-1", false)
        .await
        .unwrap_err();
    mock.assert();

    match err {
        ClientError::Http { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, Some("Model overloaded".to_string()));
        }
        _ => panic!("Wrong error kind"),
    }
}

#[tokio::test]
async fn it_uploads_a_pdf_and_returns_the_task_id() -> Result<()> {
    let body = serde_json::to_string(&UploadAccepted {
        task_id: "task-9".to_string(),
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/upload_pdf")
        .match_header("Authorization", "Bearer abc")
        .match_header(
            "content-type",
            mockito::Matcher::Regex("^multipart/form-data.*".to_string()),
        )
        .with_status(202)
        .with_body(body)
        .create();

    let client = authed(server.url());
    let task_id = client.upload_pdf("paper.pdf", b"%PDF-1.4".to_vec()).await?;
    mock.assert();

    assert_eq!(task_id, "task-9");
    return Ok(());
}

#[tokio::test]
async fn it_rejects_upload_when_not_accepted() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/upload_pdf")
        .with_status(413)
        .with_body(r#"{"detail": "File too large"}"#)
        .create();

    let client = authed(server.url());
    let err = client
        .upload_pdf("paper.pdf", b"%PDF-1.4".to_vec())
        .await
        .unwrap_err();
    mock.assert();

    match err {
        ClientError::Http { status, detail } => {
            assert_eq!(status, 413);
            assert_eq!(detail, Some("File too large".to_string()));
        }
        _ => panic!("Wrong error kind"),
    }
}

#[tokio::test]
async fn it_polls_task_status() -> Result<()> {
    let body = serde_json::to_string(&TaskStatus {
        status: "processing".to_string(),
        message: None,
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/task_status/task-9")
        .match_header("Authorization", "Bearer abc")
        .with_status(200)
        .with_body(body)
        .create();

    let client = authed(server.url());
    let status = client.task_status("task-9").await?;
    mock.assert();

    assert_eq!(status.status, "processing");
    assert_eq!(status.message, None);
    return Ok(());
}
