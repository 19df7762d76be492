//! Unix domain socket server for IPC
//!
//! Shares the same `App` as the TUI event loop; each client sends one
//! newline-terminated JSON command and gets one JSON response back.

use crate::app::App;
use anyhow::Result;
use chrono::Local;
use std::sync::{Arc, Mutex};
use tempo_ipc::{Command, Response, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{error, info};

pub async fn start(state: Arc<Mutex<App>>) -> Result<()> {
    // Remove old socket if it exists
    let _ = std::fs::remove_file(SOCKET_PATH);

    let listener = UnixListener::bind(SOCKET_PATH)?;
    info!("IPC server listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, state).await {
                        error!("Error handling client: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}

async fn handle_client(stream: UnixStream, state: Arc<Mutex<App>>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    reader.read_line(&mut line).await?;
    let command: Command = serde_json::from_str(&line)?;

    // The lock is only held while the command is applied, never across an await.
    let response = apply_command(&state, command);

    let response_json = serde_json::to_vec(&response)?;
    writer.write_all(&response_json).await?;

    Ok(())
}

fn apply_command(state: &Arc<Mutex<App>>, command: Command) -> Response {
    let Ok(mut app) = state.lock() else {
        return Response::Error("state lock poisoned".to_string());
    };
    let now = Local::now().timestamp_millis();
    match command {
        Command::Start { name } => match app.start_task(&name, now) {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error(e.to_string()),
        },
        Command::Pause => match app.pause_task(now) {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error(e.to_string()),
        },
        Command::Resume => match app.resume_task(now) {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error(e.to_string()),
        },
        Command::Rename { name } => match app.rename_task(&name) {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error(e.to_string()),
        },
        Command::Complete => match app.complete_task(now) {
            Ok(done) => {
                app.notify_completion(&done);
                Response::Ok
            }
            Err(e) => Response::Error(e.to_string()),
        },
        Command::Status => {
            app.on_tick(now);
            Response::Status(app.status())
        }
        Command::ListCompleted => Response::Completed(app.completed_summaries()),
    }
}
