//! Bare invocation: Certbot manual-auth hook

use std::sync::Arc;

use acmedns_core::services::{ServiceContext, ValidationService};
use acmedns_core::CoreError;

use crate::output::print_error;

/// Publish the running validation's token. Returns whether it succeeded.
pub async fn run(ctx: &Arc<ServiceContext>) -> bool {
    match ValidationService::new(ctx.clone()).validate().await {
        Ok(domain) => {
            tracing::info!("Validation token updated for {domain}");
            true
        }
        Err(CoreError::ValidationError(e)) => {
            // Not running as a hook; the caller prints usage.
            tracing::debug!("{e}");
            false
        }
        Err(e @ CoreError::AccountNotFound(_)) => {
            print_error(&format!("{e}. Validation failed."), 0);
            false
        }
        Err(e) => {
            print_error(&format!("Validation failed: {e}"), 0);
            false
        }
    }
}
