use docknotes::config::default_config_path;
use docknotes::display::system_displays;
use docknotes::store::FileStore;
use docknotes::{Config, DockApp, Result};
use log::{error, info};
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    info!("Starting docknotes daemon");

    let config = Config::load(default_config_path())?;
    let settings = FileStore::new(config.storage.settings_path(), config.panel.clone());
    let displays = system_displays(&config.display);
    let mut app = DockApp::new(config, displays, Arc::new(settings));

    tokio::select! {
        result = app.run() => {
            if let Err(e) = result {
                error!("Dock error: {}", e);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    if app.is_running() {
        app.shutdown().await;
    }

    Ok(())
}
