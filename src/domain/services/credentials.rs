#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;

use std::path;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Session;

/// Persistence seam for the login session, so everything above it can be
/// tested against an in-memory store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>>;
    async fn save(&self, session: &Session) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// JSON file under the user cache directory. Survives restarts until an
/// explicit logout removes it.
pub struct DiskCredentialStore {
    pub file_path: path::PathBuf,
}

impl Default for DiskCredentialStore {
    fn default() -> DiskCredentialStore {
        return DiskCredentialStore::new(path::PathBuf::from(Config::get(ConfigKey::SessionFile)));
    }
}

impl DiskCredentialStore {
    pub fn new(file_path: path::PathBuf) -> DiskCredentialStore {
        return DiskCredentialStore { file_path };
    }
}

#[async_trait]
impl CredentialStore for DiskCredentialStore {
    async fn load(&self) -> Result<Option<Session>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(&self.file_path).await?;
        let session: Session = serde_json::from_str(&payload)?;
        return Ok(Some(session));
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let payload = serde_json::to_string(session)?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    async fn clear(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.file_path).await?;
        return Ok(());
    }
}

/// In-memory store used by tests and anywhere persistence is unwanted.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Session>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<Session>> {
        return Ok(self.slot.lock().unwrap().clone());
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.slot.lock().unwrap() = Some(session.clone());
        return Ok(());
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap() = None;
        return Ok(());
    }
}
