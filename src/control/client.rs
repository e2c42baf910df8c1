//! HTTP transport to the robot server.
//!
//! The session loops run on a single cooperative executor, so a request must
//! never block it. [`RobotClient`] hands every request to a short-lived worker
//! thread running the blocking reqwest client and suspends the calling task on
//! a [`Signal`] until the worker reports back.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use reqwest::blocking::Client;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::{CommandPayload, TeleopConfig};

/// Connection-level failure of a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    Setup(String),
    /// Connection refused, timeout, or a broken response stream.
    Network(String),
    /// The server answered with a non-success status.
    Status(u16),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Setup(msg) => write!(f, "HTTP client setup failed: {}", msg),
            TransportError::Network(msg) => write!(f, "Network error: {}", msg),
            TransportError::Status(code) => write!(f, "Server responded with status {}", code),
        }
    }
}

impl std::error::Error for TransportError {}

/// Request/response access to the robot server.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POST one command and return the raw response body, which may be empty.
    async fn post_command(&self, payload: &CommandPayload) -> Result<String, TransportError>;

    /// GET a binary resource.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// Production transport over reqwest.
pub struct RobotClient {
    client: Client,
    endpoint: String,
}

impl RobotClient {
    /// Create a new RobotClient for the configured endpoint.
    pub fn new(config: &TeleopConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Run `job` on a worker thread and await its result without blocking the executor.
    async fn off_executor<T, F>(&self, job: F) -> Result<T, TransportError>
    where
        T: Send + 'static,
        F: FnOnce(Client) -> Result<T, TransportError> + Send + 'static,
    {
        let done: Arc<Signal<CriticalSectionRawMutex, Result<T, TransportError>>> = Arc::new(Signal::new());
        let completion = done.clone();
        let client = self.client.clone();

        std::thread::Builder::new()
            .name("robot-http".to_string())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| job(client)))
                    .unwrap_or_else(|_| Err(TransportError::Network("request worker panicked".to_string())));
                completion.signal(result);
            })
            .map_err(|e| TransportError::Setup(format!("Failed to spawn request thread: {}", e)))?;

        done.wait().await
    }
}

fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status(status.as_u16()))
    }
}

impl Transport for RobotClient {
    async fn post_command(&self, payload: &CommandPayload) -> Result<String, TransportError> {
        let url = self.endpoint.clone();
        let payload = payload.clone();

        log::debug!("Sending command to {}: {:?}", url, payload);

        self.off_executor(move |client| {
            let response = client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&payload)
                .send()
                .map_err(|e| TransportError::Network(e.to_string()))?;
            check_status(response)?.text().map_err(|e| TransportError::Network(e.to_string()))
        })
        .await
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let url = url.to_string();
        self.off_executor(move |client| {
            let response = client.get(&url).send().map_err(|e| TransportError::Network(e.to_string()))?;
            let bytes = check_status(response)?.bytes().map_err(|e| TransportError::Network(e.to_string()))?;
            Ok(bytes.to_vec())
        })
        .await
    }
}
