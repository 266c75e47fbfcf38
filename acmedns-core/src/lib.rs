//! acme-dns client core library
//!
//! Reconciles stored acme-dns accounts with live DNS state:
//! - Configuration checks (CNAME delegation, CAA policy)
//! - Account registration with the public instance guard
//! - Delegation listing and the ACME client validation hook
//! - Change monitors that wait for zone edits to propagate
//!
//! Storage, the acme-dns HTTP client and local ACME client discovery are
//! abstracted through traits; the binary injects the implementations.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{AccountStore, AcmeClientRegistry, AcmeClientScanner, RegistrationClient};
