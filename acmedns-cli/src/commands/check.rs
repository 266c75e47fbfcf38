//! `check`: print the configuration state of registered domains

use std::sync::Arc;

use acmedns_core::services::{ConfigurationService, ServiceContext};
use acmedns_core::types::ConfigurationState;

use super::wizard;
use crate::output::{print_error, print_info, print_success, print_verbose, print_warning, yes_no};

/// With `strict`, a lookup failure other than a missing record fails the run
/// before anything is printed.
pub async fn run(ctx: &Arc<ServiceContext>, requested: &[String], strict: bool) -> anyhow::Result<()> {
    let service = ConfigurationService::new(ctx.clone());
    let states = if strict {
        service.check_strict(requested).await?
    } else {
        service.check(requested).await?
    };
    if states.is_empty() {
        println!("No acme-dns accounts were found on this system.");
    }

    for state in &states {
        println!("Checking acme-dns configuration for domain {}", state.domain);
        print_account_info(ctx, state).await?;
        print_caa_results(state);
        print_diagnostics(ctx.config.verbose || ctx.config.debug, state);
    }
    Ok(())
}

/// Account and CNAME status, offering the CNAME wizard when the record is missing.
pub async fn print_account_info(
    ctx: &Arc<ServiceContext>,
    state: &ConfigurationState,
) -> anyhow::Result<()> {
    let Some(account) = state.account.as_ref().filter(|_| state.has_acmedns_account()) else {
        print_error("No acme-dns account registered", 1);
        return Ok(());
    };

    print_success("Registered acme-dns account found!", 1);
    if state.correct_cname() {
        print_success("CNAME record found and set up correctly!", 1);
    } else if state.cname.has_cname {
        print_error(
            &format!(
                "CNAME record found, but it's pointing to a wrong domain. expected: {}, found: {}",
                account.full_domain, state.cname.target
            ),
            1,
        );
        print_info(&expected_cname_hint(&state.domain, &account.full_domain), 1);
    } else {
        print_error("No CNAME record found", 1);
        print_info(&expected_cname_hint(&state.domain, &account.full_domain), 1);
        if yes_no(
            "Do you want to set up the CNAME record now and have acme-dns-client monitor the change?",
            false,
        ) {
            wizard::cname_setup(ctx, &state.domain, &account.full_domain).await?;
        }
    }
    Ok(())
}

fn expected_cname_hint(domain: &str, target: &str) -> String {
    format!(
        "A correctly set up CNAME record should look like the following:\n    _acme-challenge.{domain}.    IN      CNAME   {target}."
    )
}

pub fn print_caa_results(state: &ConfigurationState) {
    if state.has_caa() {
        print_success("CAA record found!", 1);
    } else {
        print_warning("No CAA record found", 1);
    }
    if state.has_account_uri() {
        print_success("CAA AccountURI found!", 1);
    } else {
        print_warning("No CAA AccountURI found", 1);
    }
}

/// Lookup failures other than absent records, and CAA parameters that did not parse.
fn print_diagnostics(verbose: bool, state: &ConfigurationState) {
    for failure in state.failures() {
        print_warning(&failure.message, 1);
    }
    for error in state.caa_field_errors() {
        print_verbose(verbose, error, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_cname_hint() {
        let hint = expected_cname_hint("example.org", "d420c923.auth.example.com");
        assert!(hint.ends_with("_acme-challenge.example.org.    IN      CNAME   d420c923.auth.example.com."));
    }
}
