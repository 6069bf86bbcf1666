use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::ClientError;
use super::StatusProbe;
use super::TaskStatus;
use super::UploadOutcome;
use super::UploadWatcher;
use super::MAX_POLL_ATTEMPTS;

fn status(value: &str) -> Result<TaskStatus, ClientError> {
    return Ok(TaskStatus {
        status: value.to_string(),
        message: None,
    });
}

struct ScriptedProbe {
    responses: Mutex<VecDeque<Result<TaskStatus, ClientError>>>,
    calls: AtomicUsize,
    in_flight: AtomicBool,
    overlapped: AtomicBool,
}

impl ScriptedProbe {
    fn new(responses: Vec<Result<TaskStatus, ClientError>>) -> ScriptedProbe {
        return ScriptedProbe {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicBool::new(false),
            overlapped: AtomicBool::new(false),
        };
    }

    fn calls(&self) -> usize {
        return self.calls.load(Ordering::SeqCst);
    }
}

#[async_trait]
impl StatusProbe for ScriptedProbe {
    async fn probe(&self) -> Result<TaskStatus, ClientError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);

        // Simulate request latency so overlapping polls would be caught.
        tokio::time::sleep(Duration::from_millis(10)).await;

        self.in_flight.store(false, Ordering::SeqCst);
        return self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| return status("pending"));
    }
}

#[tokio::test(start_paused = true)]
async fn it_completes_after_processing() {
    let mut responses = vec![];
    for _ in 0..5 {
        responses.push(status("processing"));
    }
    responses.push(status("completed"));

    let probe = ScriptedProbe::new(responses);
    let outcome = UploadWatcher::default().watch(&probe).await;

    assert_eq!(outcome, UploadOutcome::Completed);
    assert_eq!(probe.calls(), 6);
    assert!(!probe.overlapped.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn it_times_out_at_the_attempt_cap() {
    let probe = ScriptedProbe::new(vec![]);
    let outcome = UploadWatcher::default().watch(&probe).await;

    assert_eq!(
        outcome,
        UploadOutcome::Failed {
            detail: "PDF processing timed out. Please try again.".to_string()
        }
    );
    assert_eq!(probe.calls(), MAX_POLL_ATTEMPTS);
    assert!(!probe.overlapped.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn it_fails_with_the_server_message() {
    let responses = vec![
        status("pending"),
        Ok(TaskStatus {
            status: "failed".to_string(),
            message: Some("Could not parse PDF".to_string()),
        }),
    ];

    let probe = ScriptedProbe::new(responses);
    let outcome = UploadWatcher::default().watch(&probe).await;

    assert_eq!(
        outcome,
        UploadOutcome::Failed {
            detail: "Could not parse PDF".to_string()
        }
    );
    assert_eq!(probe.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn it_fails_on_unknown_status_values() {
    let probe = ScriptedProbe::new(vec![status("exploded")]);
    let outcome = UploadWatcher::default().watch(&probe).await;

    assert_eq!(
        outcome,
        UploadOutcome::Failed {
            detail: "Unknown status: exploded".to_string()
        }
    );
    assert_eq!(probe.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn it_stops_polling_on_probe_errors() {
    let responses = vec![
        status("processing"),
        Err(ClientError::Http {
            status: 500,
            detail: None,
        }),
    ];

    let probe = ScriptedProbe::new(responses);
    let outcome = UploadWatcher::default().watch(&probe).await;

    match outcome {
        UploadOutcome::Failed { detail } => {
            assert!(detail.starts_with("Failed to check processing status"));
        }
        _ => panic!("Expected a failure outcome"),
    }
    assert_eq!(probe.calls(), 2);
}

#[tokio::test]
async fn it_respects_custom_limits() {
    let watcher = UploadWatcher::with_limits(Duration::from_millis(1), 3);
    let probe = ScriptedProbe::new(vec![]);
    let outcome = watcher.watch(&probe).await;

    assert!(matches!(outcome, UploadOutcome::Failed { .. }));
    assert_eq!(probe.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn it_treats_mixed_case_statuses_as_their_lowercase_form() {
    let probe = ScriptedProbe::new(vec![status("Processing"), status("COMPLETED")]);
    let outcome = UploadWatcher::default().watch(&probe).await;

    assert_eq!(outcome, UploadOutcome::Completed);
    assert_eq!(probe.calls(), 2);
}
