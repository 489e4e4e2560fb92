use async_trait::async_trait;
use pathways_schema::UserProfile;
use tokio::sync::RwLock;

use super::{CredentialStore, Credentials, SessionDocument};
use crate::error::StoreError;

/// Process-local session storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: RwLock<SessionDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: &Credentials) -> Self {
        let mut doc = SessionDocument::default();
        doc.set_credentials(credentials);
        Self {
            doc: RwLock::new(doc),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn load(&self) -> Result<Option<Credentials>, StoreError> {
        Ok(self.doc.read().await.credentials())
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.doc.write().await.set_credentials(credentials);
        Ok(())
    }

    async fn load_user(&self) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.doc.read().await.user())
    }

    async fn save_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        self.doc.write().await.set_user(user);
        Ok(())
    }

    async fn clear_tokens(&self) -> Result<(), StoreError> {
        self.doc.write().await.clear_tokens();
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.doc.write().await.clear();
        Ok(())
    }
}
