//! # acmedns-provider
//!
//! Client for the [acme-dns](https://github.com/joohoi/acme-dns) REST API.
//!
//! | Endpoint | Method | Purpose |
//! |----------|--------|---------|
//! | `/register` | [`RegistrationClient::register_account`] | Create a delegation account |
//! | `/update` | [`RegistrationClient::update_txt_record`] | Publish a DNS-01 validation token |
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)* — Use rustls.
//! - **`native-tls`** — Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acmedns_provider::{AcmeDnsClient, RegistrationClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AcmeDnsClient::new()?;
//!     let account = client
//!         .register_account("https://auth.acme-dns.io", &["192.168.100.1/24".to_string()])
//!         .await?;
//!     println!("CNAME target: {}", account.full_domain);
//!
//!     client.update_txt_record(&account, "___validation_token_received_from_the_ca___").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], an alias for
//! `std::result::Result<T, ProviderError>`. Use
//! [`ProviderError::is_expected`] to tell operator mistakes (rejected
//! credentials, bad parameters) from infrastructure failures.

mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};
pub use providers::AcmeDnsClient;
pub use traits::RegistrationClient;
pub use types::Account;
