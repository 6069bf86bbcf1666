#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;

use super::client::ApiClient;
use super::client::ClientError;
use super::client::TaskStatus;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const MAX_POLL_ATTEMPTS: usize = 180;

const TIMEOUT_MESSAGE: &str = "PDF processing timed out. Please try again.";

/// Seam over the task-status endpoint so the polling loop can run against a
/// scripted fake in tests.
#[async_trait]
pub trait StatusProbe {
    async fn probe(&self) -> Result<TaskStatus, ClientError>;
}

pub struct TaskStatusProbe {
    client: ApiClient,
    task_id: String,
}

impl TaskStatusProbe {
    pub fn new(client: ApiClient, task_id: &str) -> TaskStatusProbe {
        return TaskStatusProbe {
            client,
            task_id: task_id.to_string(),
        };
    }
}

#[async_trait]
impl StatusProbe for TaskStatusProbe {
    async fn probe(&self) -> Result<TaskStatus, ClientError> {
        return self.client.task_status(&self.task_id).await;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Completed,
    Failed { detail: String },
}

/// Drives the ingestion job to a terminal state. Requests are strictly
/// sequential: the next status check is only issued after the previous one
/// resolved and the interval elapsed. Any transport or HTTP failure while
/// polling abandons the task immediately; only `pending`/`processing` keep
/// the loop alive, bounded by the attempt cap.
pub struct UploadWatcher {
    interval: Duration,
    max_attempts: usize,
}

impl Default for UploadWatcher {
    fn default() -> UploadWatcher {
        return UploadWatcher {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        };
    }
}

impl UploadWatcher {
    #[cfg(test)]
    fn with_limits(interval: Duration, max_attempts: usize) -> UploadWatcher {
        return UploadWatcher {
            interval,
            max_attempts,
        };
    }

    pub async fn watch<P: StatusProbe>(&self, probe: &P) -> UploadOutcome {
        let mut attempts = 0;

        loop {
            if attempts >= self.max_attempts {
                tracing::warn!(attempts, "upload status polling exceeded attempt cap");
                return UploadOutcome::Failed {
                    detail: TIMEOUT_MESSAGE.to_string(),
                };
            }

            let status = match probe.probe().await {
                Ok(status) => status,
                Err(err) => {
                    tracing::error!(error = %err, "upload status poll failed");
                    return UploadOutcome::Failed {
                        detail: format!("Failed to check processing status: {err}"),
                    };
                }
            };

            tracing::debug!(status = status.status, "task status");

            match status.status.to_lowercase().as_str() {
                "completed" => {
                    return UploadOutcome::Completed;
                }
                "failed" => {
                    return UploadOutcome::Failed {
                        detail: status
                            .message
                            .unwrap_or_else(|| return "Unknown error".to_string()),
                    };
                }
                "pending" | "processing" => {
                    attempts += 1;
                    tokio::time::sleep(self.interval).await;
                }
                other => {
                    return UploadOutcome::Failed {
                        detail: format!("Unknown status: {other}"),
                    };
                }
            }
        }
    }
}
