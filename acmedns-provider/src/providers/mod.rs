//! acme-dns API implementation

mod acmedns;

pub use acmedns::AcmeDnsClient;
