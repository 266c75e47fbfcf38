//! Platform adapters for the command line client
//!
//! Trait implementations that bridge the core services with the local system:
//! - **`FileAccountStore`**: acme-dns accounts in a JSON file, written with mode `0600`.
//! - **`CertbotScanner`**: Certbot accounts and manual-auth hook variables.

mod certbot;
mod file_account_store;

pub use certbot::CertbotScanner;
pub use file_account_store::FileAccountStore;
