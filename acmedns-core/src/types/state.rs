//! Reconciled view of a domain's delegation setup.

use serde::Serialize;

use acmedns_dns::{CaaRecord, CnameRecord, DnsError};

use super::Account;
use crate::error::{CoreError, CoreResult};

/// Which part of the reconciliation produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSource {
    Cname,
    Caa,
    Account,
}

/// A sub-query failure that reconciliation swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub source: DiagnosticSource,
    pub message: String,
    /// The failure was only a "record absent" sentinel.
    pub not_found: bool,
}

impl Diagnostic {
    pub(crate) fn from_dns(source: DiagnosticSource, err: &DnsError) -> Self {
        Self {
            source,
            message: err.to_string(),
            not_found: err.is_not_found(),
        }
    }

    pub(crate) fn from_core(source: DiagnosticSource, err: &CoreError) -> Self {
        Self {
            source,
            message: err.to_string(),
            not_found: false,
        }
    }
}

/// Everything known about one domain's acme-dns setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationState {
    pub domain: String,
    /// Stored acme-dns account, if any.
    pub account: Option<Account>,
    pub cname: CnameRecord,
    pub caa: Vec<CaaRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConfigurationState {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn has_acmedns_account(&self) -> bool {
        self.account
            .as_ref()
            .is_some_and(|a| !a.full_domain.is_empty())
    }

    /// An account is on file and the CNAME points at its delegation target.
    pub fn correct_cname(&self) -> bool {
        match &self.account {
            Some(account) if !account.full_domain.is_empty() => {
                self.cname.correct_target(&account.full_domain)
            }
            _ => false,
        }
    }

    pub fn has_caa(&self) -> bool {
        self.caa.iter().any(CaaRecord::is_set)
    }

    pub fn has_account_uri(&self) -> bool {
        self.caa.iter().any(CaaRecord::has_account_uri)
    }

    /// CAA parameter parse errors of all records.
    pub fn caa_field_errors(&self) -> impl Iterator<Item = &str> {
        self.caa
            .iter()
            .flat_map(|r| r.field_errors.iter().map(String::as_str))
    }

    /// Diagnostics that are real failures rather than absent records.
    pub fn failures(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.not_found)
    }

    /// Fail if any sub-query failed for a reason other than an absent record.
    pub fn into_strict(self) -> CoreResult<Self> {
        if let Some(d) = self.failures().next() {
            return Err(CoreError::Reconciliation {
                domain: self.domain.clone(),
                detail: d.message.clone(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use acmedns_dns::parse_caa_record;

    fn account(full_domain: &str) -> Account {
        Account {
            full_domain: full_domain.to_string(),
            ..Account::default()
        }
    }

    #[test]
    fn correct_cname_requires_account() {
        let mut state = ConfigurationState::new("example.org");
        state.cname = CnameRecord::found("_acme-challenge.example.org.", "foo.auth.example.com.");
        assert!(!state.correct_cname());

        state.account = Some(account(""));
        assert!(!state.correct_cname());
        assert!(!state.has_acmedns_account());

        state.account = Some(account("foo.auth.example.com"));
        assert!(state.has_acmedns_account());
        assert!(state.correct_cname());
    }

    #[test]
    fn correct_cname_false_for_wrong_target() {
        let mut state = ConfigurationState::new("example.org");
        state.account = Some(account("foo.auth.example.com"));
        state.cname = CnameRecord::found("_acme-challenge.example.org.", "bar.auth.example.com.");
        assert!(!state.correct_cname());
    }

    #[test]
    fn caa_predicates() {
        let mut state = ConfigurationState::new("example.org");
        assert!(!state.has_caa());

        state.caa = vec![
            parse_caa_record(false, "issue", b"letsencrypt.org; bogus").unwrap(),
            parse_caa_record(false, "issuewild", b"letsencrypt.org; accounturi=https://x/y")
                .unwrap(),
        ];
        assert!(state.has_caa());
        assert!(state.has_account_uri());
        assert_eq!(
            state.caa_field_errors().collect::<Vec<_>>(),
            vec!["Could not parse CAA field: bogus"]
        );
    }

    #[test]
    fn strict_ignores_not_found() {
        let mut state = ConfigurationState::new("example.org");
        state.diagnostics.push(Diagnostic::from_dns(
            DiagnosticSource::Cname,
            &DnsError::CnameNotFound("_acme-challenge.example.org.".into()),
        ));
        assert!(state.clone().into_strict().is_ok());

        state.diagnostics.push(Diagnostic::from_dns(
            DiagnosticSource::Caa,
            &DnsError::InvalidCaaRecord("bad".into()),
        ));
        let err = state.into_strict().unwrap_err();
        assert!(matches!(err, CoreError::Reconciliation { ref domain, .. } if domain == "example.org"));
    }
}
