use async_trait::async_trait;
use pathways_schema::UserProfile;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

use super::{CredentialStore, Credentials, SessionDocument};
use crate::error::StoreError;

/// Session storage backed by a JSON document on disk.
///
/// Every operation re-reads the file so edits made by another process are picked up. Writes go
/// to a sibling temporary file that is then renamed over the original.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn read_doc(&self) -> Result<SessionDocument, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionDocument::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(SessionDocument::default());
        }
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_doc(&self, doc: &SessionDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), "Session document written");
        Ok(())
    }

    async fn update(&self, edit: impl FnOnce(&mut SessionDocument)) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_doc().await?;
        edit(&mut doc);
        self.write_doc(&doc).await
    }
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn load(&self) -> Result<Option<Credentials>, StoreError> {
        Ok(self.read_doc().await?.credentials())
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.update(|doc| doc.set_credentials(credentials)).await
    }

    async fn load_user(&self) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.read_doc().await?.user())
    }

    async fn save_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        self.update(|doc| doc.set_user(user)).await
    }

    async fn clear_tokens(&self) -> Result<(), StoreError> {
        self.update(SessionDocument::clear_tokens).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.update(SessionDocument::clear).await
    }
}
