use crate::{
    config::PersistenceConfig,
    domain::Board,
    error::Result,
    storage::{decode_snapshot, SnapshotStore},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based snapshot store: one JSON document per storage key
pub struct FileStore {
    root_path: PathBuf,
    key: String,
}

impl FileStore {
    pub const DEFAULT_KEY: &'static str = "kanban-data";

    /// Creates a store writing `<root>/kanban-data.json`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_key(root, Self::DEFAULT_KEY)
    }

    /// Creates a store writing `<root>/<key>.json`
    pub fn with_key(root: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
            key: key.into(),
        }
    }

    /// Creates a store under `root` using the configured storage key
    pub fn from_config(root: impl AsRef<Path>, config: &PersistenceConfig) -> Self {
        Self::with_key(root, config.key.clone())
    }

    pub fn snapshot_file(&self) -> PathBuf {
        self.root_path.join(format!("{}.json", self.key))
    }

    fn temp_file(&self) -> PathBuf {
        self.root_path.join(format!(".{}.json.tmp", self.key))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    async fn load(&self) -> Result<Option<Board>> {
        let file_path = self.snapshot_file();

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        decode_snapshot(&contents).map(Some)
    }

    async fn save(&self, board: &Board) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(board)?;
        // Write aside then rename so a crash never leaves a torn snapshot
        let temp = self.temp_file();
        fs::write(&temp, json).await?;
        fs::rename(&temp, self.snapshot_file()).await?;

        Ok(())
    }
}
