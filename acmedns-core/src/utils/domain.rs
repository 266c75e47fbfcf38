//! Operator domain input normalization.

/// Normalize a domain given by the operator.
///
/// Trims whitespace, drops a leading `*.` (wildcard certificates validate on
/// the same `_acme-challenge` name) and a trailing dot. Idempotent.
pub fn normalize_domain(input: &str) -> String {
    let domain = input.trim();
    let domain = domain.strip_prefix("*.").unwrap_or(domain);
    domain.trim_end_matches('.').to_string()
}

/// Split a comma separated domain list, normalizing each entry and dropping
/// empty ones.
pub fn parse_domain_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(normalize_domain)
        .filter(|d| !d.is_empty())
        .collect()
}
