use crate::config::IpcConfig;
use crate::dock::DockCommand;
use crate::{point, size, Result, COORDINATE_LIMIT};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};

#[derive(Debug, Serialize, Deserialize)]
pub struct IpcMessage {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IpcResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl IpcResponse {
    pub fn ok(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// What a client asked the daemon to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Dock(DockCommand),
    SetPreference { key: String, value: String },
    Status,
    /// Current notes text.
    Notes,
    /// Replace the notes with the given text.
    SaveNotes(String),
    ClearNotes,
    Backup,
    Export(PathBuf),
    Import(PathBuf),
    Quit,
}

/// An action together with the channel its answer goes back on.
#[derive(Debug)]
pub struct Request {
    pub action: Action,
    pub reply: oneshot::Sender<IpcResponse>,
}

fn in_range(value: i32) -> bool {
    (-COORDINATE_LIMIT..=COORDINATE_LIMIT).contains(&value)
}

fn coordinates(command: &str, args: &[String]) -> std::result::Result<(i32, i32), String> {
    match args {
        [a, b, ..] => match (a.parse::<i32>(), b.parse::<i32>()) {
            (Ok(a), Ok(b)) if in_range(a) && in_range(b) => Ok((a, b)),
            (Ok(_), Ok(_)) => Err(format!(
                "{} arguments must lie within -{limit}..={limit}",
                command,
                limit = COORDINATE_LIMIT
            )),
            _ => Err(format!("{} arguments must be integers", command)),
        },
        _ => Err(format!("{} command requires two arguments", command)),
    }
}

/// Translate a wire message into an [`Action`].
pub fn parse_action(message: &IpcMessage) -> std::result::Result<Action, String> {
    let args = &message.args;
    let action = match message.command.as_str() {
        "start" => Action::Dock(DockCommand::Start),
        "toggle" | "toggle-panel" => Action::Dock(DockCommand::TogglePanel),
        "orientation" | "toggle-orientation" => Action::Dock(DockCommand::ToggleOrientation),
        "relayout" => Action::Dock(DockCommand::Relayout),
        "press" => {
            let (x, y) = coordinates("press", args)?;
            Action::Dock(DockCommand::Press(point(x, y)))
        }
        "drag" => {
            let (x, y) = coordinates("drag", args)?;
            Action::Dock(DockCommand::Drag(point(x, y)))
        }
        "release" => {
            let (x, y) = coordinates("release", args)?;
            Action::Dock(DockCommand::Release(point(x, y)))
        }
        "resize" => {
            let (w, h) = coordinates("resize", args)?;
            Action::Dock(DockCommand::ResizePanel(size(w, h)))
        }
        "on-top" => match args.first().map(|a| a.parse::<bool>()) {
            Some(Ok(on_top)) => Action::Dock(DockCommand::SetAlwaysOnTop(on_top)),
            _ => return Err("on-top command requires true or false".to_string()),
        },
        "set" => match args.as_slice() {
            [key, value, ..] => Action::SetPreference {
                key: key.clone(),
                value: value.clone(),
            },
            _ => return Err("set command requires: key value".to_string()),
        },
        "status" => Action::Status,
        "notes" => Action::Notes,
        "save" => match args.first() {
            Some(text) => Action::SaveNotes(text.clone()),
            None => return Err("save command requires the notes text".to_string()),
        },
        "clear" | "new" => Action::ClearNotes,
        "backup" => Action::Backup,
        "export" => match args.first() {
            Some(path) => Action::Export(PathBuf::from(path)),
            None => return Err("export command requires a path".to_string()),
        },
        "import" => match args.first() {
            Some(path) => Action::Import(PathBuf::from(path)),
            None => return Err("import command requires a path".to_string()),
        },
        "quit" | "stop" => Action::Quit,
        other => {
            return Err(format!(
                "Unknown command: '{}'. Use 'help' to see available commands.",
                other
            ))
        }
    };
    Ok(action)
}

pub struct IpcServer {
    config: IpcConfig,
    request_sender: mpsc::Sender<Request>,
}

impl IpcServer {
    pub fn new(config: &IpcConfig, request_sender: mpsc::Sender<Request>) -> Self {
        Self {
            config: config.clone(),
            request_sender,
        }
    }

    pub async fn start(&self) -> Result<()> {
        let socket_path = &self.config.socket_path;

        // Remove a stale socket left by a previous run
        if Path::new(socket_path).exists() {
            std::fs::remove_file(socket_path)?;
        }

        let listener = UnixListener::bind(socket_path)?;
        info!("IPC server listening on {}", socket_path);

        let request_sender = self.request_sender.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _addr)) => {
                        debug!("IPC client connected");
                        let sender = request_sender.clone();
                        tokio::spawn(async move {
                            if let Err(e) = Self::handle_client(stream, sender).await {
                                error!("Error handling IPC client: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting IPC connection: {}", e);
                    }
                }
            }
        });

        Ok(())
    }

    async fn handle_client(stream: UnixStream, request_sender: mpsc::Sender<Request>) -> Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        let client_timeout = Duration::from_secs(30);

        while let Ok(Ok(bytes_read)) = timeout(client_timeout, reader.read_line(&mut line)).await {
            if bytes_read == 0 {
                debug!("IPC client disconnected");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                line.clear();
                continue;
            }

            debug!("Received IPC message: {}", trimmed);

            let response = match serde_json::from_str::<IpcMessage>(trimmed) {
                Ok(message) => Self::process_message(message, &request_sender).await,
                Err(e) => IpcResponse::error(format!("Invalid JSON: {}", e)),
            };

            let response_json = serde_json::to_string(&response)
                .unwrap_or_else(|_| r#"{"success":false,"message":"Internal server error","data":null}"#.to_string());

            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;

            debug!("Sent response: {}", response_json);
            line.clear();
        }

        debug!("IPC client handler finished");
        Ok(())
    }

    async fn process_message(message: IpcMessage, request_sender: &mpsc::Sender<Request>) -> IpcResponse {
        debug!("Processing command: {} with args: {:?}", message.command, message.args);

        match message.command.as_str() {
            "ping" => {
                return IpcResponse::ok(
                    "pong",
                    Some(serde_json::json!({
                        "timestamp": chrono::Utc::now().to_rfc3339(),
                        "version": env!("CARGO_PKG_VERSION")
                    })),
                );
            }
            "help" => return IpcResponse::ok("Available commands", Some(help())),
            _ => {}
        }

        let action = match parse_action(&message) {
            Ok(action) => action,
            Err(e) => return IpcResponse::error(e),
        };

        let (reply, answer) = oneshot::channel();
        if let Err(e) = request_sender.send(Request { action, reply }).await {
            return IpcResponse::error(format!("Failed to send command: {}", e));
        }

        match answer.await {
            Ok(response) => response,
            Err(_) => IpcResponse::error("Dock stopped before answering"),
        }
    }
}

fn help() -> serde_json::Value {
    serde_json::json!({
        "commands": [
            {"name": "start", "args": [], "description": "Show the handle and lay out per preferences"},
            {"name": "toggle", "args": [], "description": "Open or close the note panel"},
            {"name": "orientation", "args": [], "description": "Flip the handle between horizontal and vertical"},
            {"name": "press", "args": ["x", "y"], "description": "Pointer pressed on the handle"},
            {"name": "drag", "args": ["x", "y"], "description": "Pointer moved while pressed"},
            {"name": "release", "args": ["x", "y"], "description": "Pointer released"},
            {"name": "resize", "args": ["width", "height"], "description": "Resize the note panel"},
            {"name": "on-top", "args": ["true|false"], "description": "Keep windows above others"},
            {"name": "relayout", "args": [], "description": "Lay out again against current screen bounds"},
            {"name": "set", "args": ["key", "value"], "description": "Change an appearance preference"},
            {"name": "status", "args": [], "description": "Show dock state"},
            {"name": "notes", "args": [], "description": "Show the current notes"},
            {"name": "save", "args": ["text"], "description": "Replace the notes with text"},
            {"name": "clear", "args": [], "description": "Start a blank note"},
            {"name": "backup", "args": [], "description": "Back up the notes file"},
            {"name": "export", "args": ["path"], "description": "Copy the notes to a file"},
            {"name": "import", "args": ["path"], "description": "Replace the notes with a file"},
            {"name": "ping", "args": [], "description": "Test connection"},
            {"name": "quit", "args": [], "description": "Save the notes and stop the daemon"},
            {"name": "help", "args": [], "description": "Show this help"}
        ]
    })
}

pub struct IpcClient {
    socket_path: String,
}

impl IpcClient {
    pub fn new(socket_path: String) -> Self {
        Self { socket_path }
    }

    pub async fn send_command(&self, command: &str, args: Vec<String>) -> Result<IpcResponse> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (reader, mut writer) = stream.into_split();

        let message = IpcMessage {
            command: command.to_string(),
            args,
        };

        let message_json = serde_json::to_string(&message)?;
        writer.write_all(message_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut response_line = String::new();

        match timeout(Duration::from_secs(10), reader.read_line(&mut response_line)).await {
            Ok(Ok(_)) => {
                let response: IpcResponse = serde_json::from_str(&response_line)?;
                Ok(response)
            }
            Ok(Err(e)) => Err(anyhow::anyhow!("Failed to read response: {}", e)),
            Err(_) => Err(anyhow::anyhow!("Response timeout")),
        }
    }

    pub async fn ping(&self) -> Result<IpcResponse> {
        self.send_command("ping", vec![]).await
    }

    /// Send a command and print the answer. Returns whether it succeeded.
    pub async fn run_command(socket_path: &str, command: &str, args: Vec<String>) -> Result<bool> {
        let client = IpcClient::new(socket_path.to_string());
        let response = client.send_command(command, args).await?;

        if response.success {
            println!("✓ {}", response.message);
            if let Some(data) = response.data {
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
        } else {
            eprintln!("✗ {}", response.message);
        }

        Ok(response.success)
    }

    pub async fn check_connection(socket_path: &str) -> bool {
        let client = IpcClient::new(socket_path.to_string());
        client.ping().await.is_ok()
    }
}
