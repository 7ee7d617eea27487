use crate::config::PanelConfig;
use crate::preferences::Preferences;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed preferences in {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("preference writer has stopped")]
    WriterClosed,
}

/// Durable home of [`Preferences`].
///
/// Failures are reported, never hidden; callers decide whether a failed save
/// matters (the dock logs it and keeps going).
pub trait SettingsStore: Send + Sync {
    /// Stored preferences, or defaults when nothing has been stored yet.
    fn load(&self) -> Result<Preferences, StoreError>;

    fn save(&self, prefs: &Preferences) -> Result<(), StoreError>;
}

/// Preferences as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    panel: PanelConfig,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P, panel: PanelConfig) -> Self {
        Self {
            path: path.into(),
            panel,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<Preferences, StoreError> {
        if !self.path.exists() {
            info!("No preferences at {:?}, using defaults", self.path);
            return Ok(Preferences::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let mut prefs: Preferences =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        prefs.normalize(&self.panel);
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(prefs)?;

        // Write next to the target and rename so a crash mid-write leaves
        // the previous file intact.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store, for tests and for running without a data directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    prefs: Option<Preferences>,
    saves: usize,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(prefs: Preferences) -> Self {
        let store = Self::new();
        store.lock().prefs = Some(prefs);
        store
    }

    /// Make every subsequent save fail.
    pub fn fail_saves(&self, fail: bool) {
        self.lock().fail = fail;
    }

    pub fn saves(&self) -> usize {
        self.lock().saves
    }

    pub fn stored(&self) -> Option<Preferences> {
        self.lock().prefs.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A panic while holding the lock cannot leave the state half-written.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Preferences, StoreError> {
        Ok(self.lock().prefs.clone().unwrap_or_default())
    }

    fn save(&self, prefs: &Preferences) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.fail {
            return Err(StoreError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "save disabled"),
            });
        }
        state.prefs = Some(prefs.clone());
        state.saves += 1;
        Ok(())
    }
}

enum WriterMessage {
    Save(Preferences),
    Flush(oneshot::Sender<()>),
}

/// Hands saves to a single background writer so the caller never blocks on
/// disk. Snapshots are written in the order they were submitted; when
/// several are waiting only the newest is written.
#[derive(Clone)]
pub struct QueuedStore {
    inner: Arc<dyn SettingsStore>,
    tx: mpsc::UnboundedSender<WriterMessage>,
}

impl QueuedStore {
    /// Start the writer task. Must be called from within a tokio runtime.
    pub fn spawn(inner: Arc<dyn SettingsStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run_writer(inner.clone(), rx));
        Self { inner, tx }
    }

    async fn run_writer(
        store: Arc<dyn SettingsStore>,
        mut rx: mpsc::UnboundedReceiver<WriterMessage>,
    ) {
        while let Some(message) = rx.recv().await {
            let mut latest = None;
            let mut waiters = Vec::new();
            let mut next = Some(message);

            // Drain whatever is already queued, keeping only the newest save.
            while let Some(message) = next.take() {
                match message {
                    WriterMessage::Save(prefs) => latest = Some(prefs),
                    WriterMessage::Flush(done) => waiters.push(done),
                }
                next = rx.try_recv().ok();
            }

            if let Some(prefs) = latest {
                let store = store.clone();
                let result = tokio::task::spawn_blocking(move || store.save(&prefs)).await;
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("Failed to save preferences: {}", e),
                    Err(e) => warn!("Preference writer task failed: {}", e),
                }
            }

            for done in waiters {
                let _ = done.send(());
            }
        }
        debug!("Preference writer stopped");
    }

    /// Wait until every save submitted before this call has been written.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriterMessage::Flush(done_tx))
            .map_err(|_| StoreError::WriterClosed)?;
        done_rx.await.map_err(|_| StoreError::WriterClosed)
    }
}

impl SettingsStore for QueuedStore {
    fn load(&self) -> Result<Preferences, StoreError> {
        self.inner.load()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), StoreError> {
        self.tx
            .send(WriterMessage::Save(prefs.clone()))
            .map_err(|_| StoreError::WriterClosed)
    }
}
