use crate::display::BoundsProvider;
use crate::dock::{Dock, DockCommand, Effects};
use crate::ipc::{Action, IpcResponse, IpcServer, Request};
use crate::notes::NotesStore;
use crate::store::{QueuedStore, SettingsStore};
use crate::window::HeadlessWindow;
use crate::{Config, Result};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The daemon: one event loop owning the dock, its windows and the notes.
///
/// Requests arrive from the IPC server over a channel and are handled one
/// at a time, so dock state is never touched concurrently. Preference
/// writes go through a single background writer.
pub struct DockApp {
    dock: Dock,
    notes: NotesStore,
    /// Text the panel's editor shows. Written back on save and on quit.
    notes_text: String,
    writer: QueuedStore,
    handle_window: HeadlessWindow,
    panel_window: HeadlessWindow,
    ipc_server: IpcServer,
    request_rx: mpsc::Receiver<Request>,
    running: bool,
}

impl DockApp {
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: Config,
        displays: Box<dyn BoundsProvider + Send>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::channel(100);

        let writer = QueuedStore::spawn(settings);
        let dock = Dock::new(&config, displays, Arc::new(writer.clone()));
        let handle_window = HeadlessWindow::new(dock.handle().position, dock.handle().size);
        let panel_window = HeadlessWindow::new(dock.panel().position, dock.panel().size);
        let ipc_server = IpcServer::new(&config.ipc, request_tx);

        Self {
            notes: NotesStore::new(&config.storage),
            notes_text: String::new(),
            dock,
            writer,
            handle_window,
            panel_window,
            ipc_server,
            request_rx,
            running: false,
        }
    }

    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Starting dock event loop");

        self.ipc_server.start().await?;
        self.startup();

        while self.running {
            match self.request_rx.recv().await {
                Some(request) => {
                    let response = self.handle_action(request.action);
                    if request.reply.send(response).is_err() {
                        debug!("Client went away before the answer was sent");
                    }
                }
                None => break,
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Load the notes and show the dock.
    pub fn startup(&mut self) {
        match self.notes.load() {
            Ok(text) => {
                info!(
                    "Loaded {} bytes of notes from {:?}",
                    text.len(),
                    self.notes.notes_path()
                );
                self.notes_text = text;
            }
            Err(e) => error!("Failed to load notes: {:#}", e),
        }
        self.running = true;
        self.apply_dock(DockCommand::Start);
    }

    /// Persist the final layout and wait for pending writes to land.
    pub async fn shutdown(&mut self) {
        self.apply_dock(DockCommand::Shutdown);
        if let Err(e) = self.writer.flush().await {
            warn!("Failed to flush preferences on shutdown: {}", e);
        }
        self.running = false;
        info!("Dock stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn notes_text(&self) -> &str {
        &self.notes_text
    }

    fn save_notes(&mut self, text: String) -> IpcResponse {
        match self.notes.save(&text) {
            Ok(()) => {
                let message = format!("Saved {} bytes of notes", text.len());
                self.notes_text = text;
                IpcResponse::ok(message, None)
            }
            Err(e) => IpcResponse::error(format!("Save failed: {:#}", e)),
        }
    }

    fn apply_dock(&mut self, command: DockCommand) -> Effects {
        let effects = self.dock.dispatch(command);
        if effects.is_empty() {
            debug!("{} left both windows unchanged", command.name());
        }
        effects.apply(&mut self.handle_window, &mut self.panel_window);
        effects
    }

    pub fn handle_action(&mut self, action: Action) -> IpcResponse {
        debug!("Handling action: {:?}", action);

        match action {
            Action::Dock(command) => {
                let effects = self.apply_dock(command);
                match serde_json::to_value(&effects) {
                    Ok(data) => IpcResponse::ok(command.name(), Some(data)),
                    Err(e) => IpcResponse::error(format!("Failed to encode effects: {}", e)),
                }
            }
            Action::SetPreference { key, value } => match self.dock.set_preference(&key, &value) {
                Ok(effects) => IpcResponse::ok(
                    format!("{} = {}", key, value),
                    Some(serde_json::json!({ "saved": effects.saved })),
                ),
                Err(e) => IpcResponse::error(e.to_string()),
            },
            Action::Status => self.status(),
            Action::Notes => IpcResponse::ok(
                "Notes",
                Some(serde_json::json!({ "text": self.notes_text })),
            ),
            Action::SaveNotes(text) => self.save_notes(text),
            Action::ClearNotes => self.save_notes(String::new()),
            Action::Backup => match self.notes.backup() {
                Ok(path) => IpcResponse::ok(format!("Backed up to {}", path.display()), None),
                Err(e) => IpcResponse::error(format!("Backup failed: {:#}", e)),
            },
            Action::Export(path) => match self.notes.export_to(&path) {
                Ok(()) => IpcResponse::ok(format!("Exported to {}", path.display()), None),
                Err(e) => IpcResponse::error(format!("Export failed: {:#}", e)),
            },
            Action::Import(path) => match self.notes.import_from(&path) {
                Ok(text) => {
                    let message = format!("Imported {} bytes from {}", text.len(), path.display());
                    self.notes_text = text;
                    IpcResponse::ok(message, None)
                }
                Err(e) => IpcResponse::error(format!("Import failed: {:#}", e)),
            },
            Action::Quit => {
                info!("Quit requested");
                if let Err(e) = self.notes.save(&self.notes_text) {
                    error!("Failed to save notes before quitting: {:#}", e);
                }
                self.running = false;
                IpcResponse::ok("Stopping", None)
            }
        }
    }

    fn status(&self) -> IpcResponse {
        let data = serde_json::json!({
            "handle": self.dock.handle(),
            "panel": self.dock.panel(),
            "dragging": self.dock.is_dragging(),
            "preferences": self.dock.preferences(),
            "notes_file": self.notes.notes_path(),
        });
        IpcResponse::ok("Dock status", Some(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::display::{ScreenBounds, StaticDisplays};
    use crate::store::MemoryStore;
    use crate::{rect, Insets};
    use assert_matches::assert_matches;

    fn app(dir: &tempfile::TempDir, store: MemoryStore) -> DockApp {
        let config = Config {
            storage: StorageConfig {
                data_dir: dir.path().to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        };
        let displays = StaticDisplays::single(ScreenBounds::new(
            rect(0, 0, 1920, 1080),
            Insets::zero(),
        ));
        DockApp::new(config, Box::new(displays), Arc::new(store))
    }

    #[tokio::test]
    async fn startup_shows_handle_and_creates_notes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, MemoryStore::new());
        app.startup();

        assert!(app.is_running());
        assert!(app.handle_window.visible);
        assert_eq!(app.handle_window.position, app.dock().handle().position);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn dock_actions_reach_the_windows() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, MemoryStore::new());
        app.startup();

        let response = app.handle_action(Action::Dock(DockCommand::TogglePanel));
        assert!(response.success);
        assert_eq!(response.message, "toggle_panel");
        assert!(app.panel_window.visible);
        assert_eq!(app.panel_window.position, app.dock().panel().position);
        assert_matches!(response.data, Some(data) if data["panel_visible"] == true);
    }

    #[tokio::test]
    async fn shutdown_flushes_the_final_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let mut app = app(&dir, store.clone());
        app.startup();
        app.handle_action(Action::Dock(DockCommand::ToggleOrientation));
        app.shutdown().await;

        let stored = store.stored().unwrap();
        assert_eq!(stored.orientation, app.dock().handle().orientation);
        assert_eq!(stored.handle_location, Some(app.dock().handle().position));
        assert!(!app.is_running());
    }

    #[tokio::test]
    async fn notes_are_loaded_saved_and_cleared() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "remember the milk").unwrap();
        let mut app = app(&dir, MemoryStore::new());
        app.startup();

        let shown = app.handle_action(Action::Notes);
        assert_matches!(shown.data, Some(data) if data["text"] == "remember the milk");

        let saved = app.handle_action(Action::SaveNotes("call bob\nbuy eggs".into()));
        assert!(saved.success);
        assert_eq!(app.notes_text(), "call bob\nbuy eggs");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "call bob\nbuy eggs"
        );

        assert!(app.handle_action(Action::ClearNotes).success);
        assert_eq!(app.notes_text(), "");
        assert_eq!(std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "");
    }

    #[tokio::test]
    async fn imported_notes_become_current() {
        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming.txt");
        std::fs::write(&incoming, "from elsewhere").unwrap();
        let mut app = app(&dir, MemoryStore::new());
        app.startup();

        assert!(app.handle_action(Action::Import(incoming)).success);
        assert_eq!(app.notes_text(), "from elsewhere");
    }

    #[tokio::test]
    async fn bad_preference_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, MemoryStore::new());
        app.startup();

        let response = app.handle_action(Action::SetPreference {
            key: "wallpaper".into(),
            value: "blue".into(),
        });
        assert!(!response.success);
        assert!(response.message.contains("wallpaper"));
    }

    #[tokio::test]
    async fn quit_saves_notes_and_stops_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, MemoryStore::new());
        app.startup();
        app.handle_action(Action::SaveNotes("keep this".into()));
        std::fs::write(dir.path().join("notes.txt"), "overwritten elsewhere").unwrap();

        let response = app.handle_action(Action::Quit);
        assert!(response.success);
        assert!(!app.is_running());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "keep this"
        );
    }
}
