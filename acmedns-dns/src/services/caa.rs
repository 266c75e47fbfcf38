//! CAA record lookup and RFC 8657 parameter parsing.
//!
//! Value grammar handled here:
//!
//! ```text
//! <issuer-domain>[; key1=value1][; key2=value2]...
//! ```
//!
//! Only the `validationmethods` and `accounturi` parameters are interpreted.

use crate::error::{DnsError, DnsResult};
use crate::types::{fqdn, CaaRecord, NameServer, QueryType, RawRecord};

use super::resolver::DnsTransport;

const TAG_ISSUE: &str = "issue";
const TAG_ISSUEWILD: &str = "issuewild";

/// Query and parse the CAA records of `domain` at `server`.
///
/// A record that cannot be parsed fails the whole call.
pub(crate) async fn get_caa(
    transport: &dyn DnsTransport,
    server: &NameServer,
    domain: &str,
) -> DnsResult<Vec<CaaRecord>> {
    let name = fqdn(domain);
    let answers = transport.exchange(server, &name, QueryType::Caa).await?;

    let mut records = Vec::with_capacity(answers.len());
    for answer in answers {
        match answer {
            RawRecord::Caa {
                issuer_critical,
                tag,
                value,
            } => records.push(parse_caa_record(issuer_critical, &tag, &value)?),
            other => {
                return Err(DnsError::UnexpectedRecordType {
                    expected: QueryType::Caa.to_string(),
                    found: other.type_name().to_string(),
                    domain: name,
                })
            }
        }
    }

    if records.is_empty() {
        return Err(DnsError::CaaNotFound(name));
    }
    Ok(records)
}

/// Parse one CAA answer.
///
/// Tags other than `issue`/`issuewild` produce an unset record. Malformed
/// parameters are collected in [`CaaRecord::field_errors`] and skipped.
pub fn parse_caa_record(issuer_critical: bool, tag: &str, value: &[u8]) -> DnsResult<CaaRecord> {
    let value = std::str::from_utf8(value).map_err(|e| {
        DnsError::InvalidCaaRecord(format!("{tag} value is not valid UTF-8: {e}"))
    })?;

    let tag_lower = tag.to_ascii_lowercase();
    if tag_lower != TAG_ISSUE && tag_lower != TAG_ISSUEWILD {
        log::debug!("Ignoring CAA record with tag {tag}");
        return Ok(CaaRecord::default());
    }

    let mut record = parse_caa_value(value);
    record.tag = tag_lower;
    record.data = format!(
        "{} {} \"{}\"",
        if issuer_critical { 128 } else { 0 },
        record.tag,
        value
    );
    for error in &record.field_errors {
        log::debug!("{error}");
    }
    Ok(record)
}

/// Parse the value of an `issue`/`issuewild` property.
///
/// Leaves `tag` and `data` empty.
pub fn parse_caa_value(value: &str) -> CaaRecord {
    let mut fields = value.split(';');
    let mut record = CaaRecord {
        issuer: fields.next().unwrap_or_default().trim().to_string(),
        ..CaaRecord::default()
    };

    for field in fields {
        let Some((key, param)) = parse_caa_field(field) else {
            record
                .field_errors
                .push(format!("Could not parse CAA field: {}", field.trim()));
            continue;
        };
        match key.to_ascii_lowercase().as_str() {
            "validationmethods" => record.validation_methods = parse_validation_methods(param),
            "accounturi" => record.account_uri = param.to_string(),
            _ => {}
        }
    }
    record
}

/// Split a `key=value` parameter on its first `=`.
fn parse_caa_field(field: &str) -> Option<(&str, &str)> {
    let (key, value) = field.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

fn parse_validation_methods(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}
