use crate::config::StorageConfig;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// The plain-text notes file behind the panel's editor, plus its backups.
#[derive(Debug, Clone)]
pub struct NotesStore {
    notes_path: PathBuf,
    backup_dir: PathBuf,
}

impl NotesStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            notes_path: config.notes_path(),
            backup_dir: config.backup_path(),
        }
    }

    pub fn notes_path(&self) -> &Path {
        &self.notes_path
    }

    fn ensure_dirs(&self) -> Result<()> {
        if let Some(parent) = self.notes_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating notes directory {:?}", parent))?;
        }
        fs::create_dir_all(&self.backup_dir)
            .with_context(|| format!("creating backup directory {:?}", self.backup_dir))?;
        Ok(())
    }

    /// Current notes. Creates an empty notes file on first use.
    pub fn load(&self) -> Result<String> {
        self.ensure_dirs()?;
        if !self.notes_path.exists() {
            fs::write(&self.notes_path, "")
                .with_context(|| format!("creating notes file {:?}", self.notes_path))?;
            return Ok(String::new());
        }
        fs::read_to_string(&self.notes_path)
            .with_context(|| format!("reading notes from {:?}", self.notes_path))
    }

    pub fn save(&self, text: &str) -> Result<()> {
        self.ensure_dirs()?;
        fs::write(&self.notes_path, text)
            .with_context(|| format!("writing notes to {:?}", self.notes_path))?;
        debug!("Saved {} bytes of notes", text.len());
        Ok(())
    }

    /// Copy the notes file to `target`, replacing it if present.
    pub fn export_to(&self, target: &Path) -> Result<()> {
        let text = self.load()?;
        fs::write(target, text).with_context(|| format!("exporting notes to {:?}", target))?;
        info!("Exported notes to {:?}", target);
        Ok(())
    }

    /// Replace the notes with the contents of `source`.
    pub fn import_from(&self, source: &Path) -> Result<String> {
        let text = fs::read_to_string(source)
            .with_context(|| format!("importing notes from {:?}", source))?;
        self.save(&text)?;
        info!("Imported notes from {:?}", source);
        Ok(text)
    }

    /// Copy the notes into the backup directory under a timestamped name.
    pub fn backup(&self) -> Result<PathBuf> {
        self.backup_at(Utc::now())
    }

    pub fn backup_at(&self, when: DateTime<Utc>) -> Result<PathBuf> {
        let text = self.load()?;
        let name = format!("notes-{}.txt", when.format("%Y%m%d-%H%M%S%.3f"));
        let target = self.backup_dir.join(name);
        fs::write(&target, text).with_context(|| format!("writing backup {:?}", target))?;
        info!("Backed up notes to {:?}", target);
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store(dir: &tempfile::TempDir) -> NotesStore {
        NotesStore::new(&StorageConfig {
            data_dir: dir.path().join("docknotes"),
            ..Default::default()
        })
    }

    #[test]
    fn first_load_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let notes = store(&dir);
        assert_eq!(notes.load().unwrap(), "");
        assert!(notes.notes_path().exists());
    }

    #[test]
    fn failed_creation_names_the_notes_file() {
        let dir = tempfile::tempdir().unwrap();
        let notes = store(&dir);
        fs::create_dir_all(dir.path().join("docknotes")).unwrap();
        // Dangling link: the file looks absent but cannot be created.
        std::os::unix::fs::symlink(
            dir.path().join("missing").join("notes.txt"),
            notes.notes_path(),
        )
        .unwrap();

        let err = notes.load().unwrap_err();
        assert!(format!("{:#}", err).contains("creating notes file"));
    }

    #[test]
    fn export_and_import() {
        let dir = tempfile::tempdir().unwrap();
        let notes = store(&dir);
        notes.save("buy milk\ncall bob").unwrap();

        let exported = dir.path().join("export.txt");
        notes.export_to(&exported).unwrap();
        assert_eq!(fs::read_to_string(&exported).unwrap(), "buy milk\ncall bob");

        let incoming = dir.path().join("incoming.txt");
        fs::write(&incoming, "fresh start").unwrap();
        assert_eq!(notes.import_from(&incoming).unwrap(), "fresh start");
        assert_eq!(notes.load().unwrap(), "fresh start");
    }

    #[test]
    fn backup_uses_timestamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let notes = store(&dir);
        notes.save("keep me").unwrap();

        let when = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let path = notes.backup_at(when).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("notes-20240309-140507.000.txt")
        );
        assert_eq!(fs::read_to_string(path).unwrap(), "keep me");
    }
}
