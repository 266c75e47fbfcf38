//! JSON file-backed acme-dns account storage
//!
//! The file maps domain names to accounts:
//!
//! ```json
//! { "example.org": { "fulldomain": "...", "subdomain": "...", "username": "...",
//!                    "password": "...", "server_url": "...", "allowfrom": [] } }
//! ```
//!
//! Writes go to an in-memory cache until [`AccountStore::save`] persists it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use acmedns_core::error::{CoreError, CoreResult};
use acmedns_core::traits::AccountStore;
use acmedns_core::types::Account;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Storage holds credentials; only the owner may read it.
const STORE_FILE_MODE: u32 = 0o600;
const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

type Accounts = BTreeMap<String, Account>;

/// Account store persisted as a single JSON file.
pub struct FileAccountStore {
    path: PathBuf,
    /// Loaded on first access.
    cache: RwLock<Option<Accounts>>,
}

impl FileAccountStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::debug!("Account storage path: {:?}", path);
        Self {
            path,
            cache: RwLock::new(None),
        }
    }

    /// Load accounts from the store file. A missing file is an empty store.
    async fn load_from_store(&self) -> CoreResult<Accounts> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Store file does not exist: {:?}", self.path);
                return Ok(Accounts::new());
            }
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read store file metadata: {e}"
                )))
            }
        };

        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Store file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_STORE_FILE_SIZE
            )));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read store file: {e}")))?;
        if content.trim().is_empty() {
            return Ok(Accounts::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid store format: {e}")))
    }

    /// Run `f` on the loaded cache.
    async fn with_cache<T>(&self, f: impl FnOnce(&mut Accounts) -> T) -> CoreResult<T> {
        let mut cache = self.cache.write().await;
        if cache.is_none() {
            *cache = Some(self.load_from_store().await?);
        }
        let accounts = cache
            .as_mut()
            .ok_or_else(|| CoreError::StorageError("Failed to load accounts cache".to_string()))?;
        Ok(f(accounts))
    }

    async fn write_file(&self, content: &[u8]) -> std::io::Result<()> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(STORE_FILE_MODE);

        let mut file = options.open(&self.path).await?;
        file.write_all(content).await?;
        file.flush().await?;

        // The creation mode does not apply to files that already existed.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(STORE_FILE_MODE))
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for FileAccountStore {
    async fn fetch(&self, domain: &str) -> CoreResult<Option<Account>> {
        self.with_cache(|accounts| accounts.get(domain).cloned()).await
    }

    async fn fetch_all(&self) -> CoreResult<BTreeMap<String, Account>> {
        self.with_cache(|accounts| accounts.clone()).await
    }

    async fn put(&self, domain: &str, account: Account) -> CoreResult<()> {
        self.with_cache(|accounts| {
            accounts.insert(domain.to_string(), account);
        })
        .await
    }

    async fn save(&self) -> CoreResult<()> {
        let content = self
            .with_cache(|accounts| serde_json::to_vec_pretty(accounts))
            .await??;

        self.write_file(&content)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write store file: {e}")))?;
        tracing::debug!("Saved account storage to {:?}", self.path);
        Ok(())
    }
}
