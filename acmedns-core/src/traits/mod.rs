//! Collaborator trait definitions

mod account_store;
mod acme_client;

pub use account_store::AccountStore;
pub use acme_client::{AcmeClientRegistry, AcmeClientScanner};
pub use acmedns_provider::RegistrationClient;
