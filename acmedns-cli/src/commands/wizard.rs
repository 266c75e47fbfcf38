//! Interactive CNAME and CAA setup with change monitoring

use std::future::Future;
use std::sync::Arc;

use acmedns_core::services::{ConfigurationService, MonitorOutcome, MonitorService, ServiceContext};
use anyhow::bail;

use crate::output::{print_error, print_info, print_success, print_verbose, yes_no, CountdownObserver};

const CNAME_INFO: &str = "
To finalize the setup, you need to create a CNAME record pointing from _acme-challenge.{domain}
to the newly created acme-dns domain {target}

A correctly set up CNAME record should look like the following:

_acme-challenge.{domain}.     IN      CNAME   {target}.
";

const CAA_SETTINGS: &str = "Please copy the CAA record information for the ACME account you are using and add it to your
domain's DNS zone. CAA record with \"issue\" tag is used for exact domain names and \"issuewild\" for wildcard certificates.
You can add either or both of them based on your needs.

acme-dns-client will now proceed to check for the CAA records every 15 seconds and will continue after they're added
";

const CAA_INFO_ACCOUNT_NOTFOUND: &str = "Could not find ACME accounts created by supported ACME clients on the system. Please add a CAA
record manually. For this you are going to need to look into how your client stores the ACME account URI, modify the
example CAA record below accordingly and add it to your DNS zone:
---------------------------

{domain}.         IN    CAA    0 issue \"letsencrypt.org; validationmethods=dns-01; accounturi=https://acme-v01.api.letsencrypt.org/acme/reg/ACCOUNTUID\"
{domain}.         IN    CAA    0 issuewild \"letsencrypt.org; validationmethods=dns-01; accounturi=https://acme-v01.api.letsencrypt.org/acme/reg/ACCOUNTUID\"

---------------------------
";

const SEPARATOR: &str = "    -----------------------------------------------";

/// Instructions for pointing `_acme-challenge.<domain>` at `target`.
pub fn cname_info(domain: &str, target: &str) -> String {
    CNAME_INFO
        .replace("{domain}", domain)
        .replace("{target}", target)
}

/// Template CAA records for a domain without discoverable ACME accounts.
pub fn caa_template(domain: &str) -> String {
    CAA_INFO_ACCOUNT_NOTFOUND.replace("{domain}", domain)
}

/// Zone file lines for a CAA property value.
pub fn caa_record_lines(domain: &str, value: &str) -> [String; 2] {
    [
        format!("{domain}.             IN    CAA    0 issue \"{value}\""),
        format!("{domain}.             IN    CAA    0 issuewild \"{value}\""),
    ]
}

/// Run a monitor until it finishes or the operator presses Ctrl-C.
async fn until_interrupted(monitor: impl Future<Output = MonitorOutcome>) -> anyhow::Result<MonitorOutcome> {
    tokio::select! {
        outcome = monitor => Ok(outcome),
        signal = tokio::signal::ctrl_c() => {
            signal?;
            eprintln!();
            bail!("Interrupted while waiting for DNS changes");
        }
    }
}

/// Show the CNAME instructions and wait for the record to appear.
pub async fn cname_setup(ctx: &Arc<ServiceContext>, domain: &str, target: &str) -> anyhow::Result<bool> {
    println!("{}", cname_info(domain, target));
    tracing::debug!("Starting DNS monitoring for CNAME changes");
    println!("Waiting for CNAME record to be set up for domain {domain}");
    println!("Querying the authoritative nameserver every 15 seconds.\n");

    let observer = CountdownObserver::new(ctx.config.verbose || ctx.config.debug);
    let monitor = MonitorService::new(ctx.clone());
    match until_interrupted(monitor.wait_for_cname(domain, target, &observer)).await? {
        MonitorOutcome::Satisfied { .. } => {
            print_success("CNAME record is now correctly set up!", 0);
            Ok(true)
        }
        MonitorOutcome::Failed(e) => {
            print_error(
                &format!("Caught an error while trying to query for CNAME record: {e}"),
                0,
            );
            Ok(false)
        }
    }
}

/// Suggest CAA records for the local ACME accounts and wait for one to appear.
pub async fn caa_setup(ctx: &Arc<ServiceContext>, domain: &str) -> anyhow::Result<bool> {
    let verbose = ctx.config.verbose || ctx.config.debug;
    let suggestions = ConfigurationService::new(ctx.clone()).caa_suggestions().await;

    if suggestions.is_empty() {
        print!("{}", caa_template(domain));
        if yes_no("Do you want acme-dns-client to monitor for CAA record change?", false) {
            return caa_monitor(ctx, domain).await;
        }
        println!(
            "After creation, check the configuration for the domain {domain} by issuing the following command:\n    acme-dns-client check -d {domain}"
        );
        return Ok(false);
    }

    print_info(
        &format!("Found a total of {} ACME account(s) on this system:", suggestions.len()),
        0,
    );
    for suggestion in &suggestions {
        let account = &suggestion.account;
        println!("  [{}] URI: {}", account.client, account.uri);
        print_verbose(verbose, &format!("Contact: {}", account.contact), 2);
        print_verbose(verbose, &format!("Filepath: {}", account.file_path), 2);
        if let Some(value) = &suggestion.value {
            println!("  CAA record info:\n{SEPARATOR}\n");
            for line in caa_record_lines(domain, value) {
                println!("    {line}");
            }
            println!();
        }
        println!("{SEPARATOR}");
    }
    print!("{CAA_SETTINGS}");
    caa_monitor(ctx, domain).await
}

async fn caa_monitor(ctx: &Arc<ServiceContext>, domain: &str) -> anyhow::Result<bool> {
    println!("Waiting for CAA record to be created for domain {domain}");
    println!("Querying the authoritative nameserver every 15 seconds.\n");

    let observer = CountdownObserver::new(ctx.config.verbose || ctx.config.debug);
    let monitor = MonitorService::new(ctx.clone());
    match until_interrupted(monitor.wait_for_caa(domain, &observer)).await? {
        MonitorOutcome::Satisfied { .. } => {
            print_success("Record found!", 0);
            Ok(true)
        }
        MonitorOutcome::Failed(e) => {
            print_error(
                &format!("Caught an error while trying to query for CAA record: {e}"),
                0,
            );
            Ok(false)
        }
    }
}
