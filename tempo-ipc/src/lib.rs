//! Inter-process communication between tempo and tempoctl
//!
//! We use Unix domain sockets for local IPC - they're fast, secure,
//! and perfect for this use case. Messages are newline-delimited JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Commands that tempoctl can send to tempo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    Start { name: String },
    Pause,
    Resume,
    Rename { name: String },
    Complete,
    Status,
    ListCompleted,
}

/// Responses from tempo back to tempoctl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    Ok,
    Status(TaskStatus),
    Completed(Vec<CompletedSummary>),
    Error(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub name: Option<String>,
    pub elapsed_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedSummary {
    pub id: String,
    pub name: String,
    pub duration_seconds: u64,
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection refused - is tempo running?")]
    ConnectionRefused,
}

impl From<std::io::Error> for IpcError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound => {
                IpcError::ConnectionRefused
            }
            _ => IpcError::Io(e),
        }
    }
}

pub const SOCKET_PATH: &str = "/tmp/tempo.sock";

/// Client half of the protocol: send one command, read one response.
pub async fn send_command(cmd: &Command) -> Result<Response, IpcError> {
    let mut stream = UnixStream::connect(SOCKET_PATH).await?;

    let mut msg = serde_json::to_vec(cmd)?;
    msg.push(b'\n');
    stream.write_all(&msg).await?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    let response: Response = serde_json::from_slice(&buf)?;

    Ok(response)
}
