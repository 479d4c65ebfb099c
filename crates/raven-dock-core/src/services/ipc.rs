use async_channel::Sender;
use parking_lot::RwLock;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

use crate::manager::DockStatus;
use crate::messages::{DockCommand, ShellEvent};

/// Status snapshot shared between the GTK loop and the IPC server
pub type SharedStatus = Arc<RwLock<DockStatus>>;

/// Unix socket server for `raven-dock-ctl`: one command line per connection
pub struct IpcServer {
    socket: PathBuf,
    event_tx: Sender<ShellEvent>,
    status: SharedStatus,
}

impl IpcServer {
    pub fn new(socket: PathBuf, event_tx: Sender<ShellEvent>, status: SharedStatus) -> Self {
        Self {
            socket,
            event_tx,
            status,
        }
    }

    /// Answer one request line
    pub async fn respond(&self, line: &str) -> String {
        match line.parse::<DockCommand>() {
            Ok(DockCommand::Status) => {
                let status = self.status.read().clone();
                match serde_json::to_string_pretty(&status) {
                    Ok(json) => json,
                    Err(e) => format!("error: {}", e),
                }
            }
            Ok(cmd) => {
                debug!("IPC command: {}", cmd);
                match self.event_tx.send(ShellEvent::Command(cmd)).await {
                    Ok(()) => "ok".to_string(),
                    Err(_) => "error: dock is shutting down".to_string(),
                }
            }
            Err(e) => format!("error: {}", e),
        }
    }

    async fn handle_client(&self, stream: UnixStream) -> anyhow::Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut line = String::new();
        BufReader::new(reader).read_line(&mut line).await?;

        let mut response = self.respond(line.trim()).await;
        response.push('\n');
        writer.write_all(response.as_bytes()).await?;
        writer.shutdown().await?;
        Ok(())
    }

    /// Run the server (blocks forever)
    pub async fn run(self) -> anyhow::Result<()> {
        // A previous instance that crashed leaves its socket behind
        if self.socket.exists() {
            tokio::fs::remove_file(&self.socket).await?;
        }
        if let Some(parent) = self.socket.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let listener = UnixListener::bind(&self.socket)?;
        info!("IPC server listening on {:?}", self.socket);

        let server = Arc::new(self);
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let server = server.clone();
                    tokio::spawn(async move {
                        if let Err(e) = server.handle_client(stream).await {
                            warn!("IPC client error: {}", e);
                        }
                    });
                }
                Err(e) => error!("IPC accept failed: {}", e),
            }
        }
    }
}

/// Send one command to a running dock and return its reply
pub fn request(socket: &Path, command: &DockCommand) -> anyhow::Result<String> {
    if !socket.exists() {
        anyhow::bail!("raven-dock is not running (socket not found at {:?})", socket);
    }

    let mut stream = std::os::unix::net::UnixStream::connect(socket)?;
    writeln!(stream, "{}", command)?;
    stream.flush()?;

    let mut response = String::new();
    stream.read_to_string(&mut response)?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn server() -> (IpcServer, async_channel::Receiver<ShellEvent>) {
        let (tx, rx) = async_channel::bounded(4);
        let status = SharedStatus::default();
        (IpcServer::new(PathBuf::from("/nonexistent"), tx, status), rx)
    }

    #[test]
    fn commands_are_forwarded() {
        let (server, rx) = server();
        let response = runtime().block_on(server.respond("activate 2"));

        assert_eq!(response, "ok");
        assert!(matches!(
            rx.try_recv(),
            Ok(ShellEvent::Command(DockCommand::Activate(2)))
        ));
    }

    #[test]
    fn status_is_answered_from_snapshot() {
        let (server, rx) = server();
        server.status.write().preferred_monitor = 1;

        let response = runtime().block_on(server.respond("status"));
        let status: DockStatus = serde_json::from_str(&response).unwrap();
        assert_eq!(status.preferred_monitor, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn bad_lines_report_errors() {
        let (server, _rx) = server();
        let response = runtime().block_on(server.respond("jump"));
        assert!(response.starts_with("error: unknown command"));
    }

    #[test]
    fn serves_over_unix_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("dock.sock");
        let (tx, rx) = async_channel::bounded(4);
        let server = IpcServer::new(socket.clone(), tx, SharedStatus::default());

        runtime().block_on(async move {
            tokio::spawn(server.run());
            // Wait for the bind
            for _ in 0..50 {
                if socket.exists() {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }

            let mut stream = UnixStream::connect(&socket).await.unwrap();
            stream.write_all(b"hide 0\n").await.unwrap();
            let mut reply = String::new();
            BufReader::new(stream).read_line(&mut reply).await.unwrap();

            assert_eq!(reply.trim(), "ok");
            assert!(matches!(
                rx.recv().await,
                Ok(ShellEvent::Command(DockCommand::Hide(Some(0))))
            ));

            let client_socket = socket.clone();
            let reply = tokio::task::spawn_blocking(move || {
                request(&client_socket, &DockCommand::Activate(3))
            })
            .await
            .unwrap()
            .unwrap();
            assert_eq!(reply.trim(), "ok");
            assert!(matches!(
                rx.recv().await,
                Ok(ShellEvent::Command(DockCommand::Activate(3)))
            ));
        });
    }

    #[test]
    fn request_without_daemon_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = request(&dir.path().join("missing.sock"), &DockCommand::Status).unwrap_err();
        assert!(err.to_string().contains("not running"));
    }
}
