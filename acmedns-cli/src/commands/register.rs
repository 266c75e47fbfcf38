//! `register`: create an acme-dns account and guide through the DNS setup

use std::sync::Arc;

use acmedns_core::services::{RegistrationOutcome, RegistrationService, ServiceContext};
use acmedns_core::types::{Account, ConfigurationState};

use super::wizard;
use crate::output::{print_success, print_verbose, print_warning, yes_no};

const CHECK_INFO: &str = "
After setting up the CNAME record to your main DNS zone, you can use acme-dns-client to check the configuration.
This can be done by issuing command:
  acme-dns-client check -d {domain}
";

const PUBLIC_INSTANCE_WARNING: &str = "You are about to register an account to a public acme-dns instance.
It's important to understand that using a third-party hosted acme-dns instance will authorize the acme-dns instance owner
to request and validate certificates for your domain on your behalf. While the domain name is not known to acme-dns, it's
trivial to deduct via correlation analysis with Certificate Transparency logs.

This issue can be mitigated in the future through CA's implementing support for ACME-CAA accounturi (RFC 8657), and
acme-dns-client will suggest you to set it up already. This is however optional.

In case this is intentional, and you understand the associated risks, re-run acme-dns-client with argument \"--dangerous\"
to suppress this warning.
";

const CAA_INFO: &str = "
A CAA record allows you to control additional certificate issuance safeguards. The currently supported
version allows the domain owner to control which certificate authorities are allowed to issue certificates for the domain in question.
The certificate authorities MUST check and respect the CAA records in the validation process.

There's also a standard (RFC 8657) that extends the CAA record to limit the issuance of certificates to a specific validation
method and/or to a specific ACME account. While they can be tested using staging environment of Let's Encrypt for example,
they're not enabled in the production yet. It is still be worthwhile to configure them so you'll be protected when the feature gets enabled.
";

pub async fn run(ctx: &Arc<ServiceContext>, domain: &str) -> anyhow::Result<()> {
    let verbose = ctx.config.verbose || ctx.config.debug;
    let outcome = RegistrationService::new(ctx.clone()).register(domain).await?;

    let state = match outcome {
        RegistrationOutcome::Refused(_) => {
            print_warning(PUBLIC_INSTANCE_WARNING, 0);
            return Ok(());
        }
        RegistrationOutcome::AlreadyRegistered(state) => {
            print_warning(
                &format!("Acme-dns account already registered for domain {}", state.domain),
                0,
            );
            state
        }
        RegistrationOutcome::Registered(state) => {
            print_success(
                &format!(
                    "New acme-dns account for domain {} successfully registered!\n",
                    state.domain
                ),
                0,
            );
            state
        }
    };

    guide_cname_setup(ctx, &state, verbose).await?;
    guide_caa_setup(ctx, &state).await?;
    Ok(())
}

async fn guide_cname_setup(
    ctx: &Arc<ServiceContext>,
    state: &ConfigurationState,
    verbose: bool,
) -> anyhow::Result<()> {
    if state.correct_cname() {
        print_success(
            "CNAME record seems to already be set up correctly, you are good to go",
            0,
        );
        return Ok(());
    }
    let Some(account) = &state.account else {
        return Ok(());
    };

    if yes_no(
        "Do you want acme-dns-client to monitor the CNAME record change?",
        true,
    ) {
        wizard::cname_setup(ctx, &state.domain, &account.full_domain).await?;
    } else {
        print_registration_info(&state.domain, account, verbose);
        println!("{}", CHECK_INFO.replace("{domain}", &state.domain));
    }
    Ok(())
}

async fn guide_caa_setup(ctx: &Arc<ServiceContext>, state: &ConfigurationState) -> anyhow::Result<()> {
    let verbose = ctx.config.verbose || ctx.config.debug;
    let question = if state.has_caa() {
        print_verbose(verbose, "CAA record for the domain exists", 0);
        if state.has_account_uri() {
            print_verbose(verbose, "CAA accounturi for the domain exists", 0);
            return Ok(());
        }
        "Do you wish to set up a CAA record with accounturi now?"
    } else {
        "Do you wish to set up a CAA record now?"
    };

    print!("{CAA_INFO}");
    if yes_no(question, false) {
        wizard::caa_setup(ctx, &state.domain).await?;
    }
    Ok(())
}

fn print_registration_info(domain: &str, account: &Account, verbose: bool) {
    println!("Domain:         {}", account.full_domain);
    print_verbose(verbose, &format!("Username:   {}", account.username), 0);
    print_verbose(verbose, &format!("Password:   {}", account.password), 0);
    println!("{}", wizard::cname_info(domain, &account.full_domain));
}
