//! One JSON document per event under `{data_dir}/events/`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::EventStore;
use crate::error::{ShevError, ShevResult};
use crate::event::Event;
use crate::id::is_valid_id;

pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    /// Open (creating if needed) the event directory inside `data_dir`.
    pub async fn open(data_dir: &Path) -> ShevResult<Self> {
        let dir = data_dir.join("events");
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            ShevError::Store(format!("Could not create {}: {e}", dir.display()))
        })?;

        tracing::info!(path = %dir.display(), "Opened event store");
        Ok(FsStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn tmp_path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json.tmp"))
    }
}

/// Fill the temp file, then hard-link it to its final name. Linking fails if
/// the name is taken, so a complete document appears at once or not at all.
async fn write_and_link(
    file: &mut tokio::fs::File,
    content: &[u8],
    tmp: &Path,
    path: &Path,
) -> std::io::Result<()> {
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await?;
    tokio::fs::hard_link(tmp, path).await
}

#[async_trait]
impl EventStore for FsStore {
    async fn insert_one(&self, event: &Event) -> ShevResult<()> {
        if !is_valid_id(&event.id) {
            return Err(ShevError::Store(format!("Invalid event id: {}", event.id)));
        }

        let path = self.path_for(&event.id);
        let tmp = self.tmp_path_for(&event.id);
        let content = serde_json::to_vec_pretty(event)?;

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ShevError::DuplicateId(event.id.clone()));
            }
            Err(e) => {
                return Err(ShevError::Store(format!(
                    "Failed to create {}: {e}",
                    tmp.display()
                )));
            }
        };

        let published = write_and_link(&mut file, &content, &tmp, &path).await;
        drop(file);

        // The document is visible only through the link; the temp name never outlives the insert
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            tracing::warn!(path = %tmp.display(), error = %e, "Could not remove temp file");
        }

        match published {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(ShevError::DuplicateId(event.id.clone()))
            }
            Err(e) => Err(ShevError::Store(format!(
                "Failed to write {}: {e}",
                path.display()
            ))),
        }
    }

    async fn find_one(&self, id: &str) -> ShevResult<Option<Event>> {
        if !is_valid_id(id) {
            return Ok(None);
        }

        let path = self.path_for(id);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ShevError::Store(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        let event = serde_json::from_slice(&content)?;
        Ok(Some(event))
    }
}
