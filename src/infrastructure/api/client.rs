#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use reqwest::multipart;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use thiserror::Error;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ConversationSummary;
use crate::domain::models::Role;

/// Failures talking to the chatbot service. Transport problems (server
/// unreachable, connection dropped) are kept distinct from responses the
/// server actually produced.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unable to connect to server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {}", .detail.as_deref().unwrap_or("no detail provided"))]
    Http { status: u16, detail: Option<String> },
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatSummaryResponse {
    chat_id: String,
    title: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatListResponse {
    chats: Vec<ChatSummaryResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryResponse {
    messages: Vec<HistoryMessage>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatRequest {
    query: String,
    chat_id: String,
    has_pdf: bool,
}

/// The reply body for a send. `response` is left as raw JSON because the
/// server is inconsistent about returning a plain string versus a structured
/// object; see `reply::extract_text`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UploadAccepted {
    task_id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Thin wrapper over the service's HTTP API. Every request carries the bearer
/// token when one is set; bodies are JSON except the PDF upload, which is
/// multipart form data.
#[derive(Clone)]
pub struct ApiClient {
    url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> ApiClient {
        return ApiClient::new(&Config::get(ConfigKey::ServerUrl));
    }
}

impl ApiClient {
    pub fn new(url: &str) -> ApiClient {
        return ApiClient {
            url: url.trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
        };
    }

    pub fn with_token(mut self, token: &str) -> ApiClient {
        self.token = Some(token.to_string());
        return self;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, format!("{}{path}", self.url));
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        return req;
    }

    async fn error_from(res: reqwest::Response) -> ClientError {
        let status = res.status().as_u16();
        let detail = match res.json::<ErrorDetail>().await {
            Ok(body) => Some(body.detail),
            Err(_) => None,
        };

        return ClientError::Http { status, detail };
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let res = self
            .request(Method::POST, "/register")
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if res.status().as_u16() != 201 {
            return Err(ApiClient::error_from(res).await);
        }

        return Ok(());
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let res = self
            .request(Method::POST, "/login")
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if res.status().as_u16() != 200 {
            return Err(ApiClient::error_from(res).await);
        }

        let body = res.json::<LoginResponse>().await?;
        return Ok(body.access_token);
    }

    /// Invalidates the session server side and discards the uploaded
    /// document. The backend exposes no document-only cleanup, so the clear
    /// action reuses this endpoint as well.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let res = self.request(Method::POST, "/logout").send().await?;

        if !res.status().is_success() {
            return Err(ApiClient::error_from(res).await);
        }

        return Ok(());
    }

    pub async fn list_chats(&self) -> Result<Vec<ConversationSummary>, ClientError> {
        let res = self.request(Method::GET, "/list_chats").send().await?;

        if res.status().as_u16() != 200 {
            return Err(ApiClient::error_from(res).await);
        }

        let body = res.json::<ChatListResponse>().await?;
        let summaries = body
            .chats
            .into_iter()
            .map(|chat| {
                return ConversationSummary {
                    id: chat.chat_id,
                    title: chat.title,
                };
            })
            .collect();

        return Ok(summaries);
    }

    pub async fn chat_history(&self, chat_id: &str) -> Result<Vec<HistoryMessage>, ClientError> {
        let res = self
            .request(Method::GET, &format!("/chat_history/{chat_id}"))
            .send()
            .await?;

        if res.status().as_u16() != 200 {
            return Err(ApiClient::error_from(res).await);
        }

        let body = res.json::<HistoryResponse>().await?;
        return Ok(body.messages);
    }

    pub async fn delete_chat(&self, chat_id: &str) -> Result<(), ClientError> {
        let res = self
            .request(Method::DELETE, &format!("/chat/{chat_id}"))
            .send()
            .await?;

        if res.status().as_u16() != 200 {
            return Err(ApiClient::error_from(res).await);
        }

        return Ok(());
    }

    pub async fn send_message(
        &self,
        query: &str,
        chat_id: &str,
        has_pdf: bool,
    ) -> Result<ChatReply, ClientError> {
        let res = self
            .request(Method::POST, "/chat")
            .json(&ChatRequest {
                query: query.to_string(),
                chat_id: chat_id.to_string(),
                has_pdf,
            })
            .send()
            .await?;

        if res.status().as_u16() != 200 {
            return Err(ApiClient::error_from(res).await);
        }

        let body = res.json::<ChatReply>().await?;
        return Ok(body);
    }

    /// Starts the server-side ingestion job. A 202 with a task id is the only
    /// accepted response; anything else is a failure carrying the server's
    /// detail message.
    pub async fn upload_pdf(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ClientError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .request(Method::POST, "/upload_pdf")
            .multipart(form)
            .send()
            .await?;

        if res.status().as_u16() != 202 {
            return Err(ApiClient::error_from(res).await);
        }

        let body = res.json::<UploadAccepted>().await?;
        return Ok(body.task_id);
    }

    pub async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ClientError> {
        let res = self
            .request(Method::GET, &format!("/task_status/{task_id}"))
            .send()
            .await?;

        if res.status().as_u16() != 200 {
            return Err(ApiClient::error_from(res).await);
        }

        let body = res.json::<TaskStatus>().await?;
        return Ok(body);
    }
}
