use crate::events::AppEvent;
use crate::input::KeyCode;
use crate::ring::RingName;
use async_channel::Sender;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/tpie.sock";

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(String),
    #[error("Unknown key '{0}'")]
    UnknownKey(String),
}

/// Parses one protocol line, e.g. `key-down LCtrl` or `preview Main`.
pub fn parse_command(line: &str) -> Result<AppEvent, CommandError> {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    let required = |argument: &str| {
        if argument.is_empty() {
            Err(CommandError::MissingArgument(command.to_string()))
        } else {
            Ok(argument.to_string())
        }
    };
    let key = |argument: &str| {
        required(argument)?
            .parse::<KeyCode>()
            .map_err(|_| CommandError::UnknownKey(argument.to_string()))
    };

    match command {
        "" => Err(CommandError::Empty),
        "key-down" => Ok(AppEvent::KeyDown(key(argument)?)),
        "key-up" => Ok(AppEvent::KeyUp(key(argument)?)),
        "preview" => Ok(AppEvent::Preview(RingName::new(required(argument)?))),
        "end-preview" => Ok(AppEvent::EndPreview(RingName::new(required(argument)?))),
        "rebind" => Ok(AppEvent::Rebind(RingName::new(required(argument)?))),
        "reload" => Ok(AppEvent::Reload),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let (read, mut write) = stream.into_split();
                    let mut lines = BufReader::new(read).lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        let reply = match parse_command(&line) {
                            Ok(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                                "ok\n".to_string()
                            }
                            Err(e) => {
                                log::error!("Bad command '{}': {}", line.trim(), e);
                                format!("error: {}\n", e)
                            }
                        };
                        if write.write_all(reply.as_bytes()).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
