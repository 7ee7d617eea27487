use clap::{Parser, Subcommand};
use docknotes::config::default_config_path;
use docknotes::display::system_displays;
use docknotes::ipc::IpcClient;
use docknotes::store::FileStore;
use docknotes::{Config, DockApp, Result};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "docknotes")]
#[command(about = "A draggable edge handle with a sticky-note panel")]
struct Cli {
    #[arg(short, long, help = "Configuration file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the dock in the foreground")]
    Start,
    #[command(about = "Stop the running dock")]
    Stop,
    #[command(about = "Show dock status")]
    Status,
    #[command(about = "Check that the dock is running")]
    Ping,
    #[command(about = "Open or close the note panel")]
    Toggle,
    #[command(about = "Flip the handle between horizontal and vertical")]
    Orientation,
    #[command(about = "Press the pointer on the handle", allow_negative_numbers = true)]
    Press { x: i32, y: i32 },
    #[command(about = "Move the pressed pointer", allow_negative_numbers = true)]
    Drag { x: i32, y: i32 },
    #[command(about = "Release the pointer", allow_negative_numbers = true)]
    Release { x: i32, y: i32 },
    #[command(about = "Resize the note panel")]
    Resize { width: i32, height: i32 },
    #[command(about = "Keep the windows above others")]
    OnTop {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    #[command(about = "Lay out again against the current screen bounds")]
    Relayout,
    #[command(about = "Change an appearance preference")]
    Set { key: String, value: String },
    #[command(about = "Show the current notes")]
    Notes,
    #[command(about = "Replace the notes with the given text")]
    Save { text: String },
    #[command(about = "Start a blank note")]
    Clear,
    #[command(about = "Back up the notes file")]
    Backup,
    #[command(about = "Copy the notes to a file")]
    Export { path: PathBuf },
    #[command(about = "Replace the notes with a file")]
    Import { path: PathBuf },
}

impl Commands {
    /// Wire form of a client command.
    fn to_message(&self) -> (&'static str, Vec<String>) {
        match self {
            Commands::Start => ("start", vec![]),
            Commands::Stop => ("quit", vec![]),
            Commands::Status => ("status", vec![]),
            Commands::Ping => ("ping", vec![]),
            Commands::Toggle => ("toggle", vec![]),
            Commands::Orientation => ("orientation", vec![]),
            Commands::Press { x, y } => ("press", vec![x.to_string(), y.to_string()]),
            Commands::Drag { x, y } => ("drag", vec![x.to_string(), y.to_string()]),
            Commands::Release { x, y } => ("release", vec![x.to_string(), y.to_string()]),
            Commands::Resize { width, height } => {
                ("resize", vec![width.to_string(), height.to_string()])
            }
            Commands::OnTop { enabled } => ("on-top", vec![enabled.to_string()]),
            Commands::Relayout => ("relayout", vec![]),
            Commands::Set { key, value } => ("set", vec![key.clone(), value.clone()]),
            Commands::Notes => ("notes", vec![]),
            Commands::Save { text } => ("save", vec![text.clone()]),
            Commands::Clear => ("clear", vec![]),
            Commands::Backup => ("backup", vec![]),
            Commands::Export { path } => ("export", vec![path.display().to_string()]),
            Commands::Import { path } => ("import", vec![path.display().to_string()]),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load(&config_path)?;

    match cli.command {
        Some(Commands::Start) | None => {
            if IpcClient::check_connection(&config.ipc.socket_path).await {
                error!("Dock is already running on {}", config.ipc.socket_path);
                std::process::exit(1);
            }

            info!("Starting docknotes");
            let settings = FileStore::new(config.storage.settings_path(), config.panel.clone());
            let displays = system_displays(&config.display);
            let mut app = DockApp::new(config, displays, Arc::new(settings));

            tokio::select! {
                result = app.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down");
                }
            }
            if app.is_running() {
                app.shutdown().await;
            }
        }
        Some(command) => {
            let (name, args) = command.to_message();
            let succeeded = IpcClient::run_command(&config.ipc.socket_path, name, args)
                .await
                .map_err(|e| anyhow::anyhow!("Is docknotes running? {}", e))?;
            if !succeeded {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
