//! Username derivation for provider-created accounts.

use ideahub_entity::account::MAX_USERNAME_LEN;

/// Derives a username base from provider claims.
///
/// Preference order: display name, then the local part of the email, then
/// `user<first6(google_id)>`. The result is stripped to `[A-Za-z0-9_]`
/// and truncated to the username length bound; it is never empty as long
/// as `google_id` is non-empty.
pub fn derive_base(name: Option<&str>, email: Option<&str>, google_id: &str) -> String {
    let from_name = name.map(sanitize).filter(|s| !s.is_empty());
    let from_email = email
        .and_then(|e| e.split('@').next())
        .map(sanitize)
        .filter(|s| !s.is_empty());

    let base = from_name.or(from_email).unwrap_or_else(|| {
        let prefix: String = google_id.chars().take(6).collect();
        format!("user{prefix}")
    });

    truncate(&base, MAX_USERNAME_LEN)
}

/// Appends a numeric suffix, truncating the base so the whole candidate
/// stays within the username length bound.
pub fn with_suffix(base: &str, suffix: u32) -> String {
    let suffix = suffix.to_string();
    let room = MAX_USERNAME_LEN.saturating_sub(suffix.len());
    format!("{}{}", truncate(base, room), suffix)
}

fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
