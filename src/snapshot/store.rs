use super::errors::{SnapshotError, SnapshotResult};
use super::types::Snapshot;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const EXTENSION: &str = "yaml";

pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("ufw_rules_{}.{}", now.format(FILE_STAMP_FORMAT), EXTENSION)
}

pub fn organized_file_name(now: DateTime<Local>) -> String {
    format!(
        "ufw_rules_organized_{}.{}",
        now.format(FILE_STAMP_FORMAT),
        EXTENSION
    )
}

/// Directory of snapshot files. Files are only ever added, never removed.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Snapshot files sorted by name (oldest stamp first).
    pub async fn list(&self) -> SnapshotResult<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::io(&self.dir, e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SnapshotError::io(&self.dir, e))?
        {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Like `list`, but an empty directory is an error.
    pub async fn list_required(&self) -> SnapshotResult<Vec<PathBuf>> {
        let files = self.list().await?;
        if files.is_empty() {
            return Err(SnapshotError::NoSnapshots(self.dir.clone()));
        }
        Ok(files)
    }

    /// Accept either a path or a bare file name inside the store.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.exists() || file.is_absolute() {
            file.to_path_buf()
        } else {
            self.dir.join(file)
        }
    }

    pub async fn load(&self, file: &Path) -> SnapshotResult<Snapshot> {
        let path = self.resolve(file);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SnapshotError::NotFound(path))
            }
            Err(e) => return Err(SnapshotError::io(&path, e)),
        };
        Snapshot::from_yaml(&text)
    }

    pub async fn save_export(
        &self,
        snapshot: &Snapshot,
        now: DateTime<Local>,
    ) -> SnapshotResult<PathBuf> {
        self.write(&export_file_name(now), snapshot).await
    }

    pub async fn save_organized(
        &self,
        snapshot: &Snapshot,
        now: DateTime<Local>,
    ) -> SnapshotResult<PathBuf> {
        self.write(&organized_file_name(now), snapshot).await
    }

    // Same-second writes overwrite each other.
    async fn write(&self, name: &str, snapshot: &Snapshot) -> SnapshotResult<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SnapshotError::io(&self.dir, e))?;
        let path = self.dir.join(name);
        let yaml = snapshot.to_yaml()?;
        fs::write(&path, yaml)
            .await
            .map_err(|e| SnapshotError::io(&path, e))?;
        info!("Snapshot written to {}", path.display());
        Ok(path)
    }
}
