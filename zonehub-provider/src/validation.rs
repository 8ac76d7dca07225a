//! Record and domain validators.
//!
//! Every check here is pure and runs before a request is built, so a value
//! that fails validation never reaches the network.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{ProviderError, Result};
use crate::types::{DnsRecordType, RecordRequest};

/// Longest accepted domain name, without the trailing dot.
pub const MAX_DOMAIN_LEN: usize = 253;
/// Longest accepted label (and subdomain).
pub const MAX_LABEL_LEN: usize = 63;
/// Accepted TTL range in seconds.
pub const TTL_RANGE: std::ops::RangeInclusive<u32> = 1..=604_800;
/// Longest accepted single TXT string.
pub const MAX_TXT_LEN: usize = 255;

const CAA_TAGS: &[&str] = &["issue", "issuewild", "iodef"];
const RESERVED_SUBDOMAINS: &[&str] = &["localhost", "broadcasthost"];
const TXT_DANGEROUS_PATTERNS: &[&str] =
    &["<script", "javascript:", "vbscript:", "onload=", "onerror="];

/// Switches that relax the default grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Accept private, loopback and link-local IPv4 addresses in A records.
    pub allow_private_ips: bool,
}

/// Validate a zone or host name.
///
/// A single trailing dot is stripped before the labels are checked.
pub fn validate_domain_name(domain: &str) -> Result<()> {
    check_domain_name(domain, "domain")
}

fn check_domain_name(domain: &str, field: &str) -> Result<()> {
    let name = domain.strip_suffix('.').unwrap_or(domain);
    if name.is_empty() {
        return Err(ProviderError::validation(field, "must not be empty"));
    }
    if name.len() > MAX_DOMAIN_LEN {
        return Err(ProviderError::validation(
            field,
            format!(
                "exceeds maximum length of {MAX_DOMAIN_LEN} characters (got {})",
                name.len()
            ),
        ));
    }
    for label in name.split('.') {
        check_label(label).map_err(|detail| {
            ProviderError::validation(field, format!("{detail} in '{domain}'"))
        })?;
    }
    Ok(())
}

fn check_label(label: &str) -> std::result::Result<(), String> {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(format!(
            "label '{label}' must be 1-{MAX_LABEL_LEN} characters"
        ));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(format!("label '{label}' must not start or end with a hyphen"));
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(format!("label '{label}' contains invalid characters"));
    }
    Ok(())
}

/// Validate a relative record name.
///
/// Accepts `@` (zone apex) and `*` (wildcard) as whole values; anything else
/// must be a single label of `[a-zA-Z0-9_-]`.
pub fn validate_subdomain(subdomain: &str) -> Result<()> {
    if subdomain == "@" || subdomain == "*" {
        return Ok(());
    }
    if subdomain.is_empty() {
        return Err(ProviderError::validation("subdomain", "must not be empty"));
    }
    if subdomain.len() > MAX_LABEL_LEN {
        return Err(ProviderError::validation(
            "subdomain",
            format!("exceeds maximum length of {MAX_LABEL_LEN} characters"),
        ));
    }
    if !subdomain
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(ProviderError::validation(
            "subdomain",
            "may only contain letters, digits, '_' and '-'",
        ));
    }
    if subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(ProviderError::validation(
            "subdomain",
            "must not start or end with a hyphen",
        ));
    }
    if RESERVED_SUBDOMAINS
        .iter()
        .any(|r| subdomain.eq_ignore_ascii_case(r))
    {
        return Err(ProviderError::validation(
            "subdomain",
            format!("'{subdomain}' is reserved"),
        ));
    }
    Ok(())
}

/// Validate a TTL in seconds.
pub fn validate_ttl(ttl: u32) -> Result<()> {
    if TTL_RANGE.contains(&ttl) {
        Ok(())
    } else {
        Err(ProviderError::validation(
            "ttl",
            format!(
                "must be between {} and {} (got {ttl})",
                TTL_RANGE.start(),
                TTL_RANGE.end()
            ),
        ))
    }
}

/// Validate a record value against the grammar of its type.
pub fn validate_record_value(
    record_type: DnsRecordType,
    value: &str,
    options: ValidationOptions,
) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProviderError::validation("value", "must not be empty"));
    }
    match record_type {
        DnsRecordType::A => validate_ipv4(value, options),
        DnsRecordType::Aaaa => validate_ipv6(value),
        DnsRecordType::Cname | DnsRecordType::Ns | DnsRecordType::Ptr => {
            check_domain_name(value, "value")
        }
        DnsRecordType::Mx => validate_mx(value),
        DnsRecordType::Srv => validate_srv(value),
        DnsRecordType::Txt => validate_txt(value),
        DnsRecordType::Caa => validate_caa(value),
    }
}

/// Validate every field of a create/update request.
///
/// A TTL of `0` is checked after substituting the type's default.
pub fn validate_record(request: &RecordRequest, options: ValidationOptions) -> Result<()> {
    validate_domain_name(&request.domain)?;
    validate_subdomain(&request.subdomain)?;
    validate_record_value(request.record_type, &request.value, options)?;
    validate_ttl(request.effective_ttl())
}

fn validate_ipv4(value: &str, options: ValidationOptions) -> Result<()> {
    // Ipv4Addr rejects octets above 255 and leading zeros
    let ip: Ipv4Addr = value.parse().map_err(|_| {
        ProviderError::validation("value", format!("'{value}' is not a valid IPv4 address"))
    })?;
    if is_reserved_ipv4(ip) {
        return Err(ProviderError::validation(
            "value",
            format!("{ip} is a reserved address"),
        ));
    }
    if !options.allow_private_ips && is_private_ipv4(ip) {
        return Err(ProviderError::validation(
            "value",
            format!("{ip} is a private network address"),
        ));
    }
    Ok(())
}

fn is_reserved_ipv4(ip: Ipv4Addr) -> bool {
    ip.octets()[0] == 0 || ip.is_multicast() || ip.octets()[0] >= 240
}

fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_private() || ip.is_loopback() || ip.is_link_local()
}

fn validate_ipv6(value: &str) -> Result<()> {
    let colons = value.bytes().filter(|&b| b == b':').count();
    let charset_ok = value.bytes().all(|b| b.is_ascii_hexdigit() || b == b':');
    if !charset_ok || !(2..=7).contains(&colons) || value.parse::<Ipv6Addr>().is_err() {
        return Err(ProviderError::validation(
            "value",
            format!("'{value}' is not a valid IPv6 address"),
        ));
    }
    Ok(())
}

/// Parse an unsigned decimal field, rejecting signs and out-of-range values.
fn parse_u16_field(token: &str, what: &str, min: u16) -> Result<u16> {
    let parsed = if token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse::<u16>().ok()
    } else {
        None
    };
    match parsed {
        Some(n) if n >= min => Ok(n),
        _ => Err(ProviderError::validation(
            "value",
            format!("{what} must be an integer in [{min}, 65535] (got '{token}')"),
        )),
    }
}

fn validate_mx(value: &str) -> Result<()> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let [priority, exchange] = tokens.as_slice() else {
        return Err(ProviderError::validation(
            "value",
            "MX value must be '<priority> <exchange>'",
        ));
    };
    parse_u16_field(priority, "MX priority", 0)?;
    check_domain_name(exchange, "value")
}

fn validate_srv(value: &str) -> Result<()> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let [priority, weight, port, target] = tokens.as_slice() else {
        return Err(ProviderError::validation(
            "value",
            "SRV value must be '<priority> <weight> <port> <target>'",
        ));
    };
    parse_u16_field(priority, "SRV priority", 0)?;
    parse_u16_field(weight, "SRV weight", 0)?;
    parse_u16_field(port, "SRV port", 1)?;
    check_domain_name(target, "value")
}

fn validate_txt(value: &str) -> Result<()> {
    let len = value.chars().count();
    if len > MAX_TXT_LEN {
        return Err(ProviderError::validation(
            "value",
            format!("TXT value exceeds {MAX_TXT_LEN} characters (got {len})"),
        ));
    }
    let lower = value.to_lowercase();
    if let Some(pattern) = TXT_DANGEROUS_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ProviderError::validation(
            "value",
            format!("TXT value contains forbidden content '{pattern}'"),
        ));
    }
    Ok(())
}

fn validate_caa(value: &str) -> Result<()> {
    let mut parts = value.trim().splitn(3, char::is_whitespace);
    let (Some(flags), Some(tag), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ProviderError::validation(
            "value",
            "CAA value must be '<flags> <tag> <value>'",
        ));
    };

    let flags_ok = flags.bytes().all(|b| b.is_ascii_digit()) && flags.parse::<u8>().is_ok();
    if !flags_ok {
        return Err(ProviderError::validation(
            "value",
            format!("CAA flags must be an integer in [0, 255] (got '{flags}')"),
        ));
    }
    if !CAA_TAGS.contains(&tag) {
        return Err(ProviderError::validation(
            "value",
            format!("CAA tag must be one of {} (got '{tag}')", CAA_TAGS.join(", ")),
        ));
    }

    let rest = rest.trim();
    let inner = match (rest.strip_prefix('"'), rest.ends_with('"')) {
        (Some(stripped), true) => stripped.strip_suffix('"').unwrap_or_default(),
        (None, false) => rest,
        _ => {
            return Err(ProviderError::validation(
                "value",
                "CAA value has unbalanced quotes",
            ));
        }
    };
    if inner.is_empty() {
        return Err(ProviderError::validation("value", "CAA value must not be empty"));
    }
    Ok(())
}
