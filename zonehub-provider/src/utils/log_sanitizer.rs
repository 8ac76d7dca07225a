//! Log sanitization utilities
//!
//! Response bodies may echo TXT/DKIM values and request bodies of the legacy
//! API carry the login token, so nothing is logged without passing through
//! one of these helpers.

/// Maximum number of characters kept by [`truncate_for_log`].
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters [`mask_secret`] leaves visible.
const MASK_VISIBLE_PREFIX: usize = 4;

/// Truncate a string for logging.
///
/// Strings of at most `TRUNCATE_LIMIT` characters are returned unchanged;
/// longer ones are cut on a character boundary and suffixed with the
/// original byte length.
pub fn truncate_for_log(s: &str) -> String {
    match s.char_indices().nth(TRUNCATE_LIMIT) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}... [truncated, total {} bytes]", &s[..cut], s.len()),
    }
}

/// Mask a credential for display: `"AKIDz8kr..."` becomes `"AKID***"`.
///
/// Values too short to show a prefix safely are fully masked.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= MASK_VISIBLE_PREFIX * 2 {
        return "***".to_string();
    }
    let prefix: String = secret.chars().take(MASK_VISIBLE_PREFIX).collect();
    format!("{prefix}***")
}

/// Replace the value of `login_token` in a form-encoded body with a mask.
pub fn redact_form_body(body: &str) -> String {
    body.split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("login_token", _)) => "login_token=***".to_string(),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}
