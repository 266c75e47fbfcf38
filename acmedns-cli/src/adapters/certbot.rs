//! Certbot integration
//!
//! Accounts are read from `<config root>/accounts/**/regr.json`. When running
//! as a `--manual-auth-hook`, Certbot passes the validation through the
//! `CERTBOT_VALIDATION` and `CERTBOT_DOMAIN` environment variables.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use acmedns_core::error::{CoreError, CoreResult};
use acmedns_core::traits::AcmeClientScanner;
use acmedns_core::types::AcmeAccount;
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_CONFIG_ROOT: &str = "/etc/letsencrypt";
const ACCOUNT_FILE_NAME: &str = "regr.json";
const CLIENT_NAME: &str = "Certbot";

const VALIDATION_ENV: &str = "CERTBOT_VALIDATION";
const DOMAIN_ENV: &str = "CERTBOT_DOMAIN";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// `regr.json`, reduced to the fields we read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CertbotRegistration {
    uri: String,
    body: CertbotRegistrationBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CertbotRegistrationBody {
    contact: Vec<String>,
}

/// Scanner for a Certbot installation.
pub struct CertbotScanner {
    config_root: PathBuf,
    env: EnvLookup,
}

impl CertbotScanner {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config_root(DEFAULT_CONFIG_ROOT)
    }

    #[must_use]
    pub fn with_config_root(config_root: impl Into<PathBuf>) -> Self {
        Self {
            config_root: config_root.into(),
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replace the process environment as the source of hook variables.
    #[cfg(test)]
    #[must_use]
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Parse one Certbot account file.
    async fn parse_account_file(&self, path: &Path) -> CoreResult<AcmeAccount> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let registration: CertbotRegistration = serde_json::from_str(&content).map_err(|e| {
            CoreError::SerializationError(format!("Invalid account file {}: {e}", path.display()))
        })?;

        Ok(AcmeAccount {
            uri: registration.uri,
            contact: registration.body.contact.into_iter().next().unwrap_or_default(),
            file_path: path.display().to_string(),
            client: CLIENT_NAME.to_string(),
        })
    }

    /// All `regr.json` files below `root`, in a stable order.
    async fn account_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if entry.file_name() == ACCOUNT_FILE_NAME {
                    files.push(entry.path());
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

impl Default for CertbotScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AcmeClientScanner for CertbotScanner {
    fn name(&self) -> &str {
        CLIENT_NAME
    }

    async fn found(&self) -> bool {
        tokio::fs::metadata(&self.config_root).await.is_ok()
    }

    async fn find_accounts(&self) -> CoreResult<Vec<AcmeAccount>> {
        let root = self.config_root.join("accounts");
        let files = Self::account_files(&root).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to scan {}: {e}", root.display()))
        })?;

        let mut accounts = Vec::with_capacity(files.len());
        for file in files {
            tracing::debug!("Reading Certbot account file {:?}", file);
            accounts.push(self.parse_account_file(&file).await?);
        }
        Ok(accounts)
    }

    async fn find_validation_token(&self) -> CoreResult<String> {
        Ok((self.env)(VALIDATION_ENV).unwrap_or_default())
    }

    async fn find_validation_domain(&self) -> CoreResult<String> {
        Ok((self.env)(DOMAIN_ENV).unwrap_or_default())
    }
}
