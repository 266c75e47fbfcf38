//! Utility modules.

pub mod domain;

pub use domain::{normalize_domain, parse_domain_list};
