//! Durable, deduplicated list of subscriber addresses.
//!
//! The list lives in a single file holding a JSON array of strings. Every
//! access goes through one async lock, so a read-modify-write in
//! [`SubscriberStore::add_if_absent`] can never interleave with another.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::{domain::SubscriberEmail, error_chain_fmt};

pub struct SubscriberStore {
    path: PathBuf,
    lock: Mutex<()>,
}

/// Whether [`SubscriberStore::add_if_absent`] changed the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

impl SubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every stored address in file order.
    ///
    /// A missing file is created holding an empty list. A file that does not
    /// hold a JSON array of strings is reported as [`StoreError::Corrupt`]
    /// and left as it is.
    #[tracing::instrument(name = "Read all subscribers", skip(self), fields(path = %self.path.display()))]
    pub async fn read_all(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Appends `email` unless the exact same string is already stored.
    #[tracing::instrument(
        name = "Add subscriber if absent",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    pub async fn add_if_absent(&self, email: &SubscriberEmail) -> Result<AddOutcome, StoreError> {
        let _guard = self.lock.lock().await;

        let mut subscribers = self.load().await?;
        if subscribers.iter().any(|s| s == email.as_ref()) {
            tracing::info!("Address is already subscribed.");
            return Ok(AddOutcome::AlreadyPresent);
        }

        subscribers.push(email.as_ref().to_owned());
        self.persist(&subscribers).await?;
        tracing::info!(
            subscriber_count = subscribers.len(),
            "New subscriber has been saved."
        );
        Ok(AddOutcome::Added)
    }

    // Callers must hold `self.lock`.
    async fn load(&self) -> Result<Vec<String>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Subscriber store does not exist yet, creating an empty one.");
                let empty: Vec<String> = Vec::new();
                self.persist(&empty).await?;
                return Ok(empty);
            }
            Err(e) => return Err(StoreError::Io(self.path.clone(), e)),
        };

        serde_json::from_slice(&raw).map_err(|e| StoreError::Corrupt(self.path.clone(), e))
    }

    // Writes to a sibling file first and renames it over the store, so
    // readers see either the old list or the new one.
    // Callers must hold `self.lock`.
    async fn persist(&self, subscribers: &[String]) -> Result<(), StoreError> {
        let io_error = |e| StoreError::Io(self.path.clone(), e);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let contents =
            serde_json::to_vec_pretty(subscribers).map_err(StoreError::Serialization)?;
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, contents)
            .await
            .map_err(io_error)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(io_error)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access the subscriber store at {}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
    #[error("The subscriber store at {} is corrupt", .0.display())]
    Corrupt(PathBuf, #[source] serde_json::Error),
    #[error("Failed to serialize the subscriber list")]
    Serialization(#[source] serde_json::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
