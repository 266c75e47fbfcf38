//! `list`: stored accounts grouped by delegation status

use std::sync::Arc;

use acmedns_core::services::{DelegationCheck, DelegationStatus, ListService, ServiceContext};

use crate::output::{print_error, print_success, print_warning};

/// Domains grouped for printing.
#[derive(Debug, Default, PartialEq, Eq)]
struct Grouped {
    working: Vec<String>,
    errored: Vec<String>,
    dysfunctional: Vec<String>,
}

fn group(checks: &[DelegationCheck]) -> Grouped {
    let mut grouped = Grouped::default();
    for check in checks {
        match &check.status {
            DelegationStatus::Working => grouped.working.push(check.domain.clone()),
            DelegationStatus::Errored(e) => grouped.errored.push(format!("{} ({e})", check.domain)),
            DelegationStatus::Dysfunctional { .. } => {
                grouped.dysfunctional.push(check.domain.clone());
            }
        }
    }
    grouped
}

pub async fn run(ctx: &Arc<ServiceContext>) -> anyhow::Result<()> {
    let checks = ListService::new(ctx.clone()).list().await?;
    if checks.is_empty() {
        println!("No acme-dns accounts were found on this system.");
        return Ok(());
    }
    println!(
        "Number of acme-dns accounts found on this system: {}\nPerforming CNAME checks...\n",
        checks.len()
    );

    let grouped = group(&checks);
    if !grouped.working.is_empty() {
        println!("Working:");
        for domain in &grouped.working {
            print_success(domain, 0);
        }
        println!();
    }
    if !grouped.errored.is_empty() {
        println!("Error:");
        for line in &grouped.errored {
            print_error(line, 0);
        }
        println!();
    }
    if !grouped.dysfunctional.is_empty() {
        println!("Dysfunctional:");
        for domain in &grouped.dysfunctional {
            print_warning(domain, 0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use acmedns_core::types::Account;

    fn check(domain: &str, status: DelegationStatus) -> DelegationCheck {
        DelegationCheck {
            domain: domain.to_string(),
            account: Account::default(),
            status,
        }
    }

    #[test]
    fn test_group() {
        let grouped = group(&[
            check("a.example.org", DelegationStatus::Working),
            check(
                "b.example.org",
                DelegationStatus::Dysfunctional {
                    target: "elsewhere.example.net.".to_string(),
                },
            ),
            check(
                "c.example.org",
                DelegationStatus::Errored("No CNAME record found".to_string()),
            ),
        ]);
        assert_eq!(grouped.working, vec!["a.example.org"]);
        assert_eq!(grouped.dysfunctional, vec!["b.example.org"]);
        assert_eq!(grouped.errored, vec!["c.example.org (No CNAME record found)"]);
    }
}
